// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Console configuration (`console.yaml`).
//!
//! Parsed into raw structs first, then validated. Any invalid field is a
//! HardValidationError and the console refuses to start.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConsoleError, ConsoleResult, HardValidationError};
use crate::field::is_http_url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONSOLE_ROOT: &str = "/console";
/// Environment variable consulted when no token is configured.
pub const TOKEN_ENV: &str = "BENCHER_TOKEN";

const MAX_TIMEOUT_MS: u64 = 300_000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawApiConfig {
    #[serde(default = "default_api_url")]
    url: String,
    #[serde(default = "default_timeout")]
    timeout_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30000 // 30 seconds
}

impl Default for RawApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_ms: default_timeout(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAuthConfig {
    #[serde(default)]
    attach_header: bool,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    api: RawApiConfig,
    #[serde(default)]
    auth: RawAuthConfig,
    #[serde(default = "default_console_root")]
    console_root: String,
    #[serde(default)]
    schema: Option<String>,
}

fn default_console_root() -> String {
    DEFAULT_CONSOLE_ROOT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, without a trailing slash.
    pub url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    /// Send `Authorization: Bearer <token>` with every request.
    pub attach_header: bool,
    pub token: Option<String>,
}

impl AuthConfig {
    /// The configured token, falling back to `env_token`.
    pub fn resolve_token(&self, env_token: Option<String>) -> Option<String> {
        let blank = |token: &String| token.trim().is_empty();
        self.token
            .clone()
            .filter(|token| !blank(token))
            .or(env_token.filter(|token| !blank(token)))
    }
}

/// Complete validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    /// Route prefix every resource's console path lives under.
    pub console_root: String,
    /// Resource schema to load instead of the built-in one.
    pub schema: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                url: DEFAULT_API_URL.to_string(),
                timeout: Duration::from_millis(default_timeout()),
            },
            auth: AuthConfig::default(),
            console_root: DEFAULT_CONSOLE_ROOT.to_string(),
            schema: None,
        }
    }
}

impl ConsoleConfig {
    /// Replace the API base URL, validating it like a configured one.
    pub fn with_api_url(mut self, url: &str) -> Result<Self, HardValidationError> {
        self.api.url = validate_url(url)?;
        Ok(self)
    }
}

fn validate_url(url: &str) -> Result<String, HardValidationError> {
    let trimmed = url.trim().trim_end_matches('/');
    if is_http_url(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(HardValidationError::InvalidFieldValue {
            field: "api.url",
            value: url.to_string(),
            reason: "Must be an http:// or https:// URL".to_string(),
        })
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> ConsoleResult<ConsoleConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConsoleError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConsoleError::Io {
            context: "reading config file",
            source: e,
        })?;

        let mut config = Self::load_string(&content)?;

        // Relative schema paths are relative to the config file
        if let (Some(schema), Some(dir)) = (config.schema.as_mut(), path.parent()) {
            if schema.is_relative() {
                *schema = dir.join(&*schema);
            }
        }

        Ok(config)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> ConsoleResult<ConsoleConfig> {
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| ConsoleError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Ok(Self::validate(raw)?)
    }

    fn validate(raw: RawConfig) -> Result<ConsoleConfig, HardValidationError> {
        let url = validate_url(&raw.api.url)?;

        if raw.api.timeout_ms == 0 || raw.api.timeout_ms > MAX_TIMEOUT_MS {
            return Err(HardValidationError::InvalidFieldValue {
                field: "api.timeout_ms",
                value: raw.api.timeout_ms.to_string(),
                reason: format!("Must be between 1 and {}", MAX_TIMEOUT_MS),
            });
        }

        if !raw.console_root.starts_with('/') {
            return Err(HardValidationError::InvalidFieldValue {
                field: "console_root",
                value: raw.console_root,
                reason: "Must start with '/'".to_string(),
            });
        }
        let console_root = match raw.console_root.trim_end_matches('/') {
            "" => "/".to_string(),
            root => root.to_string(),
        };

        let schema = match raw.schema {
            Some(schema) if schema.trim().is_empty() => {
                return Err(HardValidationError::InvalidFieldValue {
                    field: "schema",
                    value: schema,
                    reason: "Schema path cannot be empty".to_string(),
                });
            }
            other => other.map(PathBuf::from),
        };

        Ok(ConsoleConfig {
            api: ApiConfig {
                url,
                timeout: Duration::from_millis(raw.api.timeout_ms),
            },
            auth: AuthConfig {
                attach_header: raw.auth.attach_header,
                token: raw.auth.token,
            },
            console_root,
            schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ConfigLoader::load_string("{}").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert!(!config.auth.attach_header);
        assert_eq!(config.api.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
api:
  url: https://api.bencher.dev/
  timeout_ms: 5000
auth:
  attach_header: true
  token: abc.def.ghi
console_root: /console/
schema: schema.yaml
"#;
        let config = ConfigLoader::load_string(yaml).unwrap();
        assert_eq!(config.api.url, "https://api.bencher.dev");
        assert_eq!(config.api.timeout, Duration::from_millis(5000));
        assert!(config.auth.attach_header);
        assert_eq!(config.console_root, "/console");
        assert_eq!(config.schema, Some(PathBuf::from("schema.yaml")));
    }

    #[test]
    fn test_invalid_url() {
        let result = ConfigLoader::load_string("api:\n  url: localhost:8000\n");
        assert!(matches!(
            result,
            Err(ConsoleError::HardValidation(
                HardValidationError::InvalidFieldValue { field: "api.url", .. }
            ))
        ));
    }

    #[test]
    fn test_invalid_timeout() {
        let result = ConfigLoader::load_string("api:\n  timeout_ms: 0\n");
        assert!(matches!(
            result,
            Err(ConsoleError::HardValidation(
                HardValidationError::InvalidFieldValue { field: "api.timeout_ms", .. }
            ))
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ConfigLoader::load_string("api:\n  uri: http://localhost\n");
        assert!(matches!(result, Err(ConsoleError::ConfigParse { .. })));
    }

    #[test]
    fn test_token_resolution() {
        let auth = AuthConfig {
            attach_header: true,
            token: None,
        };
        assert_eq!(auth.resolve_token(Some("env".to_string())), Some("env".to_string()));
        assert_eq!(auth.resolve_token(Some("  ".to_string())), None);

        let auth = AuthConfig {
            attach_header: true,
            token: Some("configured".to_string()),
        };
        assert_eq!(
            auth.resolve_token(Some("env".to_string())),
            Some("configured".to_string())
        );

        let auth = AuthConfig {
            attach_header: true,
            token: Some("  ".to_string()),
        };
        assert_eq!(
            auth.resolve_token(Some("envtok".to_string())),
            Some("envtok".to_string())
        );
    }

    #[test]
    fn test_api_url_override() {
        let config = ConsoleConfig::default()
            .with_api_url("http://127.0.0.1:61016/")
            .unwrap();
        assert_eq!(config.api.url, "http://127.0.0.1:61016");
        assert!(ConsoleConfig::default().with_api_url("ftp://nope").is_err());
        for malformed in ["http://[::1", "https://a:b:c:d", "http://", "not a url"] {
            assert!(
                ConsoleConfig::default().with_api_url(malformed).is_err(),
                "{malformed}"
            );
        }
    }
}
