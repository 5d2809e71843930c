//! Scanner adapter capability descriptor.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::config::SnykConfig;
use crate::models::media_type::{
    DOCKER_MANIFEST_V2, OCI_IMAGE_MANIFEST, SCANNER_ADAPTER_METADATA,
    SECURITY_VULNERABILITY_REPORT,
};
use crate::models::report::{Capability, Scanner, ScannerAdapterMetadata};
use crate::render::VendorJson;
use crate::AppState;

/// Scanner identity, consumed and produced media types, and the non-secret
/// upstream settings in effect.
pub fn describe(snyk: &SnykConfig) -> ScannerAdapterMetadata {
    let mut properties = BTreeMap::new();
    properties.insert(
        "harbor.scanner-adapter/scanner-type".to_string(),
        "os-package-vulnerability".to_string(),
    );
    properties.insert("env.SNYK_BASE_URL".to_string(), snyk.base_url.clone());
    properties.insert(
        "env.SNYK_TIMEOUT_SECS".to_string(),
        snyk.timeout.as_secs().to_string(),
    );

    ScannerAdapterMetadata {
        scanner: Scanner::current(),
        capabilities: vec![Capability {
            consumes_mime_types: vec![
                OCI_IMAGE_MANIFEST.to_string(),
                DOCKER_MANIFEST_V2.to_string(),
            ],
            produces_mime_types: vec![SECURITY_VULNERABILITY_REPORT.to_string()],
        }],
        properties,
    }
}

/// GET /api/metadata
pub async fn get(State(state): State<AppState>) -> Response {
    VendorJson(
        StatusCode::OK,
        SCANNER_ADAPTER_METADATA,
        describe(&state.config.snyk),
    )
    .into_response()
}
