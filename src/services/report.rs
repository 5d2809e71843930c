//! Conversion of upstream issues into the registry's vulnerability report.

use chrono::{DateTime, Utc};

use crate::models::artifact::Artifact;
use crate::models::report::{CvssDetails, ScanReport, Scanner, Vulnerability};
use crate::services::severity::{self, Severity};
use crate::upstream::Issue;

/// Map one upstream issue to a report vulnerability item.
pub fn to_vulnerability(issue: &Issue) -> Vulnerability {
    let data = &issue.issue_data;

    let links = [data.url.as_str(), issue.links.paths.as_str()]
        .into_iter()
        .filter(|link| !link.is_empty())
        .map(str::to_string)
        .collect();

    let preferred_cvss = match (data.cvss_score, data.cvss_v3.as_deref()) {
        (None, None) => None,
        (score, vector) => Some(CvssDetails {
            score_v2: None,
            score_v3: score,
            vector_v2: String::new(),
            vector_v3: vector.unwrap_or_default().to_string(),
        }),
    };

    Vulnerability {
        id: issue.id.clone(),
        package: issue.pkg_name.clone(),
        version: issue.pkg_versions.join(", "),
        fix_version: issue.fix_info.fixed_in.join(", "),
        severity: Severity::parse(&data.severity),
        description: data.description.clone(),
        links,
        preferred_cvss,
        cwe_ids: data.identifiers.cwe.clone(),
        vendor_attributes: Default::default(),
    }
}

/// Assemble the report for `artifact` from the merged findings of all projects.
pub fn build(
    scanner: Scanner,
    artifact: Artifact,
    issues: &[Issue],
    generated_at: DateTime<Utc>,
) -> ScanReport {
    let vulnerabilities: Vec<Vulnerability> = issues.iter().map(to_vulnerability).collect();
    let severity = severity::overall(vulnerabilities.iter().map(|v| v.severity));

    ScanReport {
        generated_at,
        artifact,
        scanner,
        severity,
        vulnerabilities,
    }
}
