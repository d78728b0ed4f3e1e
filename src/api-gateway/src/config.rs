//! Application Configuration
//!
//! Settings are layered with the `config` crate: built-in defaults, an optional
//! YAML file, `APP__*` environment variables and finally the legacy deployment
//! variables (`NOCODB_API_URL`, `NOCODB_AUTH_TOKEN`, `CF_API_TOKEN`,
//! `CF_ACCOUNT_ID`). Upstream credentials are optional here; a missing
//! credential is reported by the handler that needs it.

use serde::Deserialize;
use std::collections::HashMap;

/// Prefix of every hosting project; the full name is `<prefix>-<directoryId>`.
pub const DEPLOYMENT_PROJECT_PREFIX: &str = "ncstudio-directory";

/// Backend table identifiers.
pub mod tables {
    pub const DIRECTORIES: &str = "m823s0ww0l4mekb";
    pub const LISTINGS: &str = "mvy1lrp2wr35vo0";
    pub const LANDING_PAGES: &str = "mbrnluso1gxfwd4";
}

/// Hosting project name for a directory.
pub fn deployment_project_name(directory_id: &str) -> String {
    format!("{}-{}", DEPLOYMENT_PROJECT_PREFIX, directory_id)
}

const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("NOCODB_API_URL", "backend.api_url"),
    ("NOCODB_AUTH_TOKEN", "backend.api_token"),
    ("CF_API_TOKEN", "hosting.api_token"),
    ("CF_ACCOUNT_ID", "hosting.account_id"),
];

/// Main configuration for the application
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub environment: String,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub hosting: HostingConfig,
    pub http: HttpClientConfig,
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Low-code database backend (NocoDB v2 REST API)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL up to and including the API version, e.g. `https://db.example.com/api/v2`
    pub api_url: Option<String>,
    /// Value sent in the `xc-token` header
    pub api_token: Option<String>,
}

/// Static-site hosting platform (Cloudflare Pages)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostingConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub account_id: Option<String>,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub connect_timeout_seconds: u64,
    /// Unset means no overall request timeout
    pub request_timeout_seconds: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// One of `json`, `pretty` or `compact`
    pub log_format: String,
}

impl Config {
    /// Load configuration from `config_path` (optional file) and the process environment
    pub fn load(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::from_sources(config_path, std::env::vars().collect())
    }

    /// Load configuration from `config_path` and an explicit environment snapshot
    pub fn from_sources(
        config_path: &str,
        env: HashMap<String, String>,
    ) -> Result<Self, config::ConfigError> {
        let environment = env
            .get("APP_ENVIRONMENT")
            .cloned()
            .unwrap_or_else(|| "development".into());

        let mut builder = config::Config::builder()
            .set_default("environment", environment.clone())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::File::with_name(&format!("config/environments/{}", environment))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .source(Some(env.clone())),
            );

        for (var, key) in LEGACY_ENV_OVERRIDES {
            let value = env.get(*var).filter(|v| !v.trim().is_empty()).cloned();
            builder = builder.set_override_option(*key, value)?;
        }

        builder.build()?.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
        }
    }
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.cloudflare.com/client/v4".to_string(),
            api_token: None,
            account_id: None,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: 10,
            request_timeout_seconds: None,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = Config::from_sources("config/does-not-exist", HashMap::new()).unwrap();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.environment, "development");
        assert!(config.backend.api_url.is_none());
        assert!(config.hosting.api_token.is_none());
        assert_eq!(
            config.hosting.api_base_url,
            "https://api.cloudflare.com/client/v4"
        );
        assert_eq!(config.http.request_timeout_seconds, None);
    }

    #[test]
    fn test_legacy_variables_map_to_sections() {
        let config = Config::from_sources(
            "config/does-not-exist",
            env(&[
                ("NOCODB_API_URL", "https://db.example.com/api/v2"),
                ("NOCODB_AUTH_TOKEN", "xc"),
                ("CF_API_TOKEN", "cf-token"),
                ("CF_ACCOUNT_ID", "acct"),
            ]),
        )
        .unwrap();

        assert_eq!(
            config.backend.api_url.as_deref(),
            Some("https://db.example.com/api/v2")
        );
        assert_eq!(config.backend.api_token.as_deref(), Some("xc"));
        assert_eq!(config.hosting.api_token.as_deref(), Some("cf-token"));
        assert_eq!(config.hosting.account_id.as_deref(), Some("acct"));
    }

    #[test]
    fn test_blank_legacy_variable_is_treated_as_unset() {
        let config =
            Config::from_sources("config/does-not-exist", env(&[("NOCODB_AUTH_TOKEN", "  ")]))
                .unwrap();
        assert!(config.backend.api_token.is_none());
    }

    #[test]
    fn test_prefixed_environment_overrides_defaults() {
        let config = Config::from_sources(
            "config/does-not-exist",
            env(&[("APP__SERVER__PORT", "9000"), ("APP_ENVIRONMENT", "production")]),
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.environment, "production");
    }

    #[test]
    fn test_deployment_project_name() {
        assert_eq!(deployment_project_name("acme"), "ncstudio-directory-acme");
    }
}
