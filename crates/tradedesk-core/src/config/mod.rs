//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every field carries a serde default so a missing file still
//! yields a usable configuration.

pub mod api;
pub mod cache;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::cache::CacheConfig;
use self::logging::LoggingConfig;
use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST backend settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Push channel and polling settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Entity resolution cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `path` with an environment-specific overlay `config/{env}.toml`
    /// and environment variables prefixed with `TRADEDESK__`.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TRADEDESK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the client cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        url::Url::parse(&self.api.base_url)?;
        if !self.realtime.notifications_path.starts_with('/') {
            return Err(AppError::configuration(
                "realtime.notifications_path must start with '/'",
            ));
        }
        if self.realtime.backoff_step_ms == 0 || self.realtime.poll_interval_seconds == 0 {
            return Err(AppError::configuration(
                "realtime backoff step and poll interval must be non-zero",
            ));
        }
        match self.cache.provider.as_str() {
            "memory" | "bounded" => Ok(()),
            other => Err(AppError::configuration(format!(
                "Unknown cache provider: '{other}'. Supported: memory, bounded"
            ))),
        }
    }
}
