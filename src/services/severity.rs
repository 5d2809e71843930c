//! Overall severity aggregation.
//!
//! Severities are totally ordered `Critical > High > Medium > Low > Unknown`.
//! The overall severity of a report is the maximum over its findings, folded
//! left to right starting from `Unknown`.

use serde::{Deserialize, Serialize};

/// Severity level of a finding or of a whole report.
///
/// Variant order defines the ranking; serialized names are the rendered
/// labels (`"Critical"`, `"High"`, ...).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map an upstream severity label to a level. Unrecognized labels are `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }

    /// Rendered label shown to the registry.
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Combine the running overall severity with one more finding's severity.
///
/// Highest wins; on a tie the current value is kept.
pub fn reduce(current: Severity, next: Severity) -> Severity {
    if next > current {
        next
    } else {
        current
    }
}

/// Overall severity of a sequence of finding severities.
pub fn overall<I>(severities: I) -> Severity
where
    I: IntoIterator<Item = Severity>,
{
    severities.into_iter().fold(Severity::Unknown, reduce)
}
