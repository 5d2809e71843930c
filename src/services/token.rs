//! Scan handle codec.
//!
//! A scan handle carries everything needed to resume a scan: the artifact,
//! the upstream import job location and the time the scan was accepted. It is
//! serialized to compact JSON and encoded as unpadded URL-safe base64 so it can
//! be used verbatim as a path segment. Nothing is kept server-side.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::artifact::Artifact;

/// Logical lifetime of a scan handle, in seconds.
pub const SCAN_HANDLE_TTL_SECS: i64 = 3600;

/// Decoded contents of a scan handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanHandle {
    /// Unix timestamp (seconds) at which the scan was accepted.
    pub timestamp: i64,
    /// Upstream import job URL to poll.
    pub location: String,
    pub artifact: Artifact,
}

impl ScanHandle {
    /// Seconds elapsed between acceptance and `now`.
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp() - self.timestamp
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.age_secs(now) > SCAN_HANDLE_TTL_SECS
    }
}

/// Encode a new scan handle stamped with the current time.
pub fn encode(artifact: &Artifact, location: &str) -> Result<String, AppError> {
    encode_at(artifact, location, Utc::now())
}

/// Encode a scan handle stamped with `accepted_at`.
pub fn encode_at(
    artifact: &Artifact,
    location: &str,
    accepted_at: DateTime<Utc>,
) -> Result<String, AppError> {
    let handle = ScanHandle {
        timestamp: accepted_at.timestamp(),
        location: location.to_string(),
        artifact: artifact.clone(),
    };
    let json = serde_json::to_vec(&handle)
        .map_err(|e| AppError::Internal(format!("Could not serialize scan handle: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a scan handle.
///
/// Handles minted with the standard padded alphabet are accepted as well.
pub fn decode(token: &str) -> Result<ScanHandle, AppError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::MalformedToken("scan request id is empty".to_string()));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .or_else(|_| STANDARD.decode(token))
        .map_err(|e| AppError::MalformedToken(format!("not valid base64: {e}")))?;

    let handle: ScanHandle = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::MalformedToken(format!("unexpected payload: {e}")))?;

    if handle.artifact.repository.is_empty() {
        return Err(AppError::MalformedToken(
            "artifact repository is missing".to_string(),
        ));
    }
    if handle.artifact.tag.is_empty() {
        return Err(AppError::MalformedToken("artifact tag is missing".to_string()));
    }
    if handle.location.is_empty() {
        return Err(AppError::MalformedToken("job location is missing".to_string()));
    }

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn nginx() -> Artifact {
        Artifact {
            repository: "lib/nginx".to_string(),
            digest: "sha256:6c3c624b58dbbcd3c0dd82b4c53f04194d1247c6eebdaab7c610cf7d66709b3b"
                .to_string(),
            tag: "1.25".to_string(),
            mime_type: Some("application/vnd.docker.distribution.manifest.v2+json".to_string()),
        }
    }

    const LOCATION: &str =
        "https://snyk.io/api/v1/org/org-1/integrations/int-1/import/6b4c4c1e-4d1f";

    #[test]
    fn round_trip_preserves_handle() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let token = encode_at(&nginx(), LOCATION, at).unwrap();
        let handle = decode(&token).unwrap();
        assert_eq!(handle.artifact, nginx());
        assert_eq!(handle.location, LOCATION);
        assert_eq!(handle.timestamp, at.timestamp());
    }

    #[test]
    fn encode_stamps_current_time() {
        let before = Utc::now().timestamp();
        let handle = decode(&encode(&nginx(), LOCATION).unwrap()).unwrap();
        let after = Utc::now().timestamp();
        assert!(handle.timestamp >= before && handle.timestamp <= after);
    }

    #[test]
    fn token_is_path_segment_safe() {
        let mut artifact = nginx();
        // Bytes that map to '+' and '/' in the standard alphabet.
        artifact.repository = "a/b?c>>>~~~".to_string();
        let token = encode(&artifact, LOCATION).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn distinct_inputs_give_distinct_tokens() {
        let at = Utc::now();
        let a = encode_at(&nginx(), LOCATION, at).unwrap();
        let b = encode_at(&nginx(), "https://snyk.io/other", at).unwrap();
        let mut other = nginx();
        other.tag = "1.26".to_string();
        let c = encode_at(&other, LOCATION, at).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let json = format!(
            r#"{{"timestamp":1700000000,"location":"{LOCATION}","artifact":{{"repository":"lib/nginx","tag":"1.25"}}}}"#
        );
        let handle = decode(&URL_SAFE_NO_PAD.encode(json)).unwrap();
        assert_eq!(handle.artifact.digest, "");
        assert_eq!(handle.artifact.mime_type, None);
    }

    #[test]
    fn standard_alphabet_accepted() {
        let json = serde_json::to_vec(&ScanHandle {
            timestamp: 1_700_000_000,
            location: LOCATION.to_string(),
            artifact: nginx(),
        })
        .unwrap();
        let handle = decode(&STANDARD.encode(json)).unwrap();
        assert_eq!(handle.artifact, nginx());
    }

    #[test]
    fn garbage_is_malformed() {
        let err = decode("not base64 at all!").unwrap_err();
        assert!(matches!(err, AppError::MalformedToken(_)));
    }

    #[test]
    fn empty_is_malformed() {
        assert!(matches!(decode(""), Err(AppError::MalformedToken(_))));
    }

    #[test]
    fn non_json_payload_is_malformed() {
        let token = URL_SAFE_NO_PAD.encode("hello world");
        assert!(matches!(decode(&token), Err(AppError::MalformedToken(_))));
    }

    #[test]
    fn missing_required_fields_are_malformed() {
        let no_location = URL_SAFE_NO_PAD
            .encode(r#"{"timestamp":1,"artifact":{"repository":"r","tag":"t"}}"#);
        assert!(matches!(decode(&no_location), Err(AppError::MalformedToken(_))));

        let no_tag =
            URL_SAFE_NO_PAD.encode(r#"{"timestamp":1,"location":"l","artifact":{"repository":"r"}}"#);
        assert!(matches!(decode(&no_tag), Err(AppError::MalformedToken(_))));

        let no_timestamp = URL_SAFE_NO_PAD
            .encode(r#"{"location":"l","artifact":{"repository":"r","tag":"t"}}"#);
        assert!(matches!(decode(&no_timestamp), Err(AppError::MalformedToken(_))));
    }

    #[test]
    fn expiry_after_one_hour() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let handle = decode(&encode_at(&nginx(), LOCATION, at).unwrap()).unwrap();
        assert!(!handle.is_expired(at));
        assert!(!handle.is_expired(at + Duration::seconds(SCAN_HANDLE_TTL_SECS)));
        assert!(handle.is_expired(at + Duration::seconds(SCAN_HANDLE_TTL_SECS + 1)));
        assert_eq!(handle.age_secs(at + Duration::minutes(5)), 300);
    }
}
