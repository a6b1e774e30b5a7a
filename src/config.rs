use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::warn;

use crate::models::status::TransitionPolicy;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Application configuration, loaded from `config/*.toml` files overridden by
/// `APP__*` environment variables (e.g. `APP__DATABASE_URL`).
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Maximum number of pooled connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// Minimum number of pooled connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// Server bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default = "default_true")]
    pub auto_migrate: bool,

    /// Comma-separated list of allowed CORS origins; unset means permissive
    /// CORS (development convenience)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Work-order status transition checking: "strict" or "permissive"
    #[serde(default = "default_transition_policy")]
    pub work_order_transition_policy: String,
}

fn default_database_url() -> String {
    "sqlite://autoshop.db?mode=rwc".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_min_connections() -> u32 {
    1
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_transition_policy() -> String {
    TransitionPolicy::default().to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: true,
            cors_allowed_origins: None,
            work_order_transition_policy: default_transition_policy(),
        }
    }
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Resolved transition policy; an unrecognized value falls back to the
    /// strict default with a warning rather than failing startup.
    pub fn transition_policy(&self) -> TransitionPolicy {
        self.work_order_transition_policy
            .parse()
            .unwrap_or_else(|_| {
                warn!(
                    value = %self.work_order_transition_policy,
                    "unrecognized work_order_transition_policy, using strict"
                );
                TransitionPolicy::Strict
            })
    }
}

/// Loads configuration from files and environment.
///
/// Precedence (lowest to highest): `config/default.toml`,
/// `config/{environment}.toml`, `APP__*` environment variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()
}

/// Initializes the global tracing subscriber. Called once at startup.
pub fn init_tracing(log_level: &str, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert!(cfg.auto_migrate);
        assert_eq!(cfg.transition_policy(), TransitionPolicy::Strict);
    }

    #[test]
    fn policy_parses_permissive() {
        let cfg = AppConfig {
            work_order_transition_policy: "permissive".into(),
            ..Default::default()
        };
        assert_eq!(cfg.transition_policy(), TransitionPolicy::Permissive);
    }

    #[test]
    fn unrecognized_policy_falls_back_to_strict() {
        let cfg = AppConfig {
            work_order_transition_policy: "yolo".into(),
            ..Default::default()
        };
        assert_eq!(cfg.transition_policy(), TransitionPolicy::Strict);
    }
}
