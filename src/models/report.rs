//! Vulnerability report and scanner metadata returned to the registry.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::artifact::Artifact;
use crate::services::severity::Severity;

/// Identity of this scanner adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scanner {
    pub name: String,
    pub vendor: String,
    pub version: String,
}

impl Scanner {
    pub fn current() -> Self {
        Self {
            name: "Harbor Snyk Scanner".to_string(),
            vendor: "Snyk".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvssDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_v2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_v3: Option<f64>,
    pub vector_v2: String,
    pub vector_v3: String,
}

/// One vulnerability item of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub package: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fix_version: String,
    pub severity: Severity,
    pub description: String,
    pub links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_cvss: Option<CvssDetails>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cwe_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vendor_attributes: BTreeMap<String, serde_json::Value>,
}

/// Aggregated report for one artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    pub artifact: Artifact,
    pub scanner: Scanner,
    pub severity: Severity,
    pub vulnerabilities: Vec<Vulnerability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capability {
    pub consumes_mime_types: Vec<String>,
    pub produces_mime_types: Vec<String>,
}

/// Body of `GET /api/metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerAdapterMetadata {
    pub scanner: Scanner,
    pub capabilities: Vec<Capability>,
    pub properties: BTreeMap<String, String>,
}
