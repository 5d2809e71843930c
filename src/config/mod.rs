use std::env;
use std::time::Duration;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Console,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("console") {
            Self::Console
        } else {
            Self::Json
        }
    }
}

/// Connection settings for the Snyk API.
#[derive(Debug, Clone)]
pub struct SnykConfig {
    pub api_key: String,
    pub base_url: String,
    pub integration_id: String,
    pub organisation_id: String,
    pub timeout: Duration,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub snyk: SnykConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SCANNER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SCANNER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            log_format: LogFormat::parse(
                &env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
            snyk: SnykConfig {
                api_key: required("SNYK_API_KEY")?,
                base_url: normalize_base_url(
                    &env::var("SNYK_BASE_URL").unwrap_or_else(|_| "https://snyk.io".to_string()),
                ),
                integration_id: required("SNYK_INTEGRATION_ID")?,
                organisation_id: required("SNYK_ORGANISATION_ID")?,
                timeout: Duration::from_secs(
                    env::var("SNYK_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "60".to_string())
                        .parse()
                        .unwrap_or(60),
                ),
            },
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Strip trailing slashes so endpoint paths can be appended with `format!`.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        assert_eq!(normalize_base_url("https://snyk.io/"), "https://snyk.io");
        assert_eq!(normalize_base_url("https://snyk.io"), "https://snyk.io");
        assert_eq!(normalize_base_url(" http://localhost:9000// "), "http://localhost:9000");
    }

    #[test]
    fn log_format_defaults_to_json() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("CONSOLE"), LogFormat::Console);
        assert_eq!(LogFormat::parse("logfmt"), LogFormat::Json);
    }

    #[test]
    fn missing_error_names_variable() {
        let err = ConfigError::Missing("SNYK_API_KEY");
        assert_eq!(
            err.to_string(),
            "missing required environment variable SNYK_API_KEY"
        );
    }
}
