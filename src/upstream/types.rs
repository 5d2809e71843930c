//! Snyk v1 API payloads (subset).

use serde::{Deserialize, Deserializer, Serialize};

/// Error body returned by the Snyk API on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    /// Either a message string or a bare `true` flag, depending on the endpoint.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Most specific message available.
    pub fn into_message(self) -> Option<String> {
        self.message.filter(|m| !m.is_empty()).or_else(|| {
            self.error
                .as_ref()
                .and_then(|e| e.as_str())
                .filter(|e| !e.is_empty())
                .map(str::to_string)
        })
    }
}

/// Body of `POST .../integrations/{id}/import`.
#[derive(Debug, Serialize)]
pub struct ImportRequest<'a> {
    pub target: ImportTarget<'a>,
}

#[derive(Debug, Serialize)]
pub struct ImportTarget<'a> {
    pub name: &'a str,
}

/// Read an explicit JSON `null` as the field's default value.
///
/// Snyk sends `null` for absent strings and lists in some payloads.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Import job status returned when polling the job location.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<ImportLog>,
}

impl ImportJob {
    pub fn is_complete(&self) -> bool {
        self.status == "complete"
    }

    /// Ids of projects successfully imported for exactly `image`.
    ///
    /// Failed sub-imports are skipped; they are an expected partial outcome.
    pub fn successful_project_ids(&self, image: &str) -> Vec<String> {
        self.logs
            .iter()
            .filter(|log| log.name == image)
            .flat_map(|log| log.projects.iter())
            .filter(|project| project.success)
            .filter_map(|project| project.project_id.clone())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

/// Per-target entry of an import job.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<ImportedProject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedProject {
    #[serde(default)]
    pub target_file: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_url: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Body of `POST .../project/{id}/aggregated-issues`.
#[derive(Debug, Default, Deserialize)]
pub struct IssuesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<Issue>,
}

/// One aggregated vulnerability issue of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Issue {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub issue_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pkg_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pkg_versions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub priority_score: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub issue_data: IssueData,
    #[serde(deserialize_with = "null_as_default")]
    pub is_patched: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_ignored: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub fix_info: FixInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub links: IssueLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueData {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub severity: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifiers: Identifiers,
    #[serde(deserialize_with = "null_as_default")]
    pub exploit_maturity: String,
    #[serde(rename = "CVSSv3")]
    pub cvss_v3: Option<String>,
    pub cvss_score: Option<f64>,
    pub nearest_fixed_in_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifiers {
    #[serde(deserialize_with = "null_as_default", rename = "CVE")]
    pub cve: Vec<String>,
    #[serde(deserialize_with = "null_as_default", rename = "CWE")]
    pub cwe: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub is_upgradable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_pinnable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_patchable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_fixable: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_partially_fixable: bool,
    pub nearest_fixed_in_version: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub fixed_in: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueLinks {
    #[serde(deserialize_with = "null_as_default")]
    pub paths: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = r#"{
        "id": "dce061f7-ce0f-4ccf-b49b-4335d1205bd9",
        "status": "complete",
        "created": "2026-03-01T12:00:00.000Z",
        "logs": [
            {
                "name": "lib/nginx:1.25",
                "created": "2026-03-01T12:00:01.000Z",
                "status": "complete",
                "projects": [
                    {"targetFile": "Dockerfile", "success": true, "projectUrl": "https://snyk.io/p/1", "projectId": "p-1"},
                    {"success": false, "userMessage": "Could not access image", "projectUrl": ""},
                    {"success": true, "projectUrl": "https://snyk.io/p/2", "projectId": "p-2"}
                ]
            },
            {
                "name": "lib/nginx:1.25-alpine",
                "status": "complete",
                "projects": [
                    {"success": true, "projectUrl": "https://snyk.io/p/3", "projectId": "p-3"}
                ]
            }
        ]
    }"#;

    #[test]
    fn selects_successful_projects_of_exact_image() {
        let job: ImportJob = serde_json::from_str(JOB).unwrap();
        assert!(job.is_complete());
        assert_eq!(job.successful_project_ids("lib/nginx:1.25"), vec!["p-1", "p-2"]);
        assert_eq!(job.successful_project_ids("lib/nginx:1.25-alpine"), vec!["p-3"]);
        assert!(job.successful_project_ids("lib/nginx").is_empty());
    }

    #[test]
    fn pending_job_is_not_complete() {
        let job: ImportJob = serde_json::from_str(r#"{"id":"x","status":"pending"}"#).unwrap();
        assert!(!job.is_complete());
        assert!(job.logs.is_empty());
    }

    #[test]
    fn issue_decodes_with_missing_fields() {
        let issue: Issue = serde_json::from_str(
            r#"{
                "id": "SNYK-DEBIAN12-OPENSSL-1",
                "pkgName": "openssl",
                "pkgVersions": ["3.0.11-1"],
                "issueData": {
                    "severity": "high",
                    "CVSSv3": "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:N/A:N",
                    "cvssScore": 7.5,
                    "identifiers": {"CVE": ["CVE-2024-0001"], "CWE": ["CWE-20"]}
                },
                "fixInfo": {"fixedIn": ["3.0.13-1"]}
            }"#,
        )
        .unwrap();
        assert_eq!(issue.pkg_name, "openssl");
        assert_eq!(issue.issue_data.cvss_score, Some(7.5));
        assert_eq!(issue.issue_data.identifiers.cwe, vec!["CWE-20"]);
        assert_eq!(issue.fix_info.fixed_in, vec!["3.0.13-1"]);
        assert_eq!(issue.links.paths, "");
    }

    #[test]
    fn null_strings_in_failed_sub_import_are_tolerated() {
        let job: ImportJob = serde_json::from_str(
            r#"{
                "id": "job-1",
                "status": "complete",
                "logs": [{
                    "name": "lib/nginx:1.25",
                    "status": "complete",
                    "projects": [
                        {"success": false, "userMessage": "Could not access image", "projectUrl": null, "projectId": null},
                        {"success": true, "projectUrl": "https://snyk.io/p/1", "projectId": "p-1"}
                    ]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(job.logs[0].projects[0].project_url, "");
        assert_eq!(job.successful_project_ids("lib/nginx:1.25"), vec!["p-1"]);
    }

    #[test]
    fn null_job_fields_read_as_empty() {
        let job: ImportJob =
            serde_json::from_str(r#"{"id":"x","status":"pending","logs":null}"#).unwrap();
        assert!(job.logs.is_empty());
    }

    #[test]
    fn issue_with_null_fields_decodes() {
        let issue: Issue = serde_json::from_str(
            r#"{
                "id": "SNYK-1",
                "pkgName": "openssl",
                "pkgVersions": null,
                "issueData": {
                    "severity": "high",
                    "title": null,
                    "description": null,
                    "url": null,
                    "identifiers": {"CVE": null, "CWE": ["CWE-20"]}
                },
                "fixInfo": {"fixedIn": null},
                "links": {"paths": null}
            }"#,
        )
        .unwrap();
        assert_eq!(issue.issue_data.severity, "high");
        assert_eq!(issue.issue_data.description, "");
        assert_eq!(issue.issue_data.url, "");
        assert!(issue.pkg_versions.is_empty());
        assert!(issue.issue_data.identifiers.cve.is_empty());
        assert!(issue.fix_info.fixed_in.is_empty());
        assert_eq!(issue.links.paths, "");
    }

    #[test]
    fn null_issue_list_is_empty() {
        let body: IssuesResponse = serde_json::from_str(r#"{"issues": null}"#).unwrap();
        assert!(body.issues.is_empty());
    }

    #[test]
    fn error_message_preference() {
        let with_message: ErrorResponse = serde_json::from_str(
            r#"{"code": 401, "message": "Invalid auth token", "error": true}"#,
        )
        .unwrap();
        assert_eq!(with_message.into_message().as_deref(), Some("Invalid auth token"));

        let only_error: ErrorResponse =
            serde_json::from_str(r#"{"message": "", "error": "Unauthorized"}"#).unwrap();
        assert_eq!(only_error.into_message().as_deref(), Some("Unauthorized"));

        assert_eq!(ErrorResponse::default().into_message(), None);
    }
}
