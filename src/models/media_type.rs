//! Vendor media types of the scanner adapter API.

pub const SCANNER_ADAPTER_ERROR: &str = "application/vnd.scanner.adapter.error+json; version=1.0";
pub const SCANNER_ADAPTER_SCAN_RESPONSE: &str =
    "application/vnd.scanner.adapter.scan.response+json; version=1.0";
pub const SCANNER_ADAPTER_METADATA: &str =
    "application/vnd.scanner.adapter.metadata+json; version=1.0";
pub const SCANNER_ADAPTER_VULN_REPORT: &str =
    "application/vnd.scanner.adapter.vuln.report.harbor+json; version=1.0";

pub const OCI_IMAGE_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json";
pub const DOCKER_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
pub const SECURITY_VULNERABILITY_REPORT: &str =
    "application/vnd.security.vulnerability.report; version=1.1";
