//! Scan request and response shapes of the registry adapter protocol.

use serde::{Deserialize, Serialize};

/// Registry the artifact lives in. Received with every scan request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub authorization: String,
}

/// Identity of the image being scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Artifact {
    /// Image reference handed to the upstream scanner, `repository:tag`.
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }
}

/// Body of `POST /api/scan`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub registry: Registry,
    #[serde(default)]
    pub artifact: Artifact,
}

/// Body of the 202 response to `POST /api/scan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub id: String,
}
