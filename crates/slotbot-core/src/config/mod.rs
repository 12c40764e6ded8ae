//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod chat;
pub mod database;
pub mod logging;
pub mod notify;
pub mod realtime;
pub mod reply;
pub mod session;
pub mod settings;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::chat::ChatConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::notify::NotifyConfig;
pub use self::realtime::RealtimeConfig;
pub use self::reply::ReplyConfig;
pub use self::session::SessionConfig;
pub use self::settings::SettingsSeed;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session rollover settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Chat feed and outbound reply settings.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Reply serializer settings.
    #[serde(default)]
    pub reply: ReplyConfig,
    /// External notification settings.
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Dashboard broadcast settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Settings written to the store when none exist yet.
    #[serde(default)]
    pub settings: SettingsSeed,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `SLOTBOT__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SLOTBOT")
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

    /// Reject combinations that cannot run.
    pub fn validate(&self) -> Result<(), AppError> {
        match self.database.provider.as_str() {
            "postgres" if self.database.url.is_empty() => {
                return Err(AppError::configuration(
                    "database.url is required when database.provider = \"postgres\"",
                ));
            }
            "postgres" | "memory" => {}
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown database provider: '{other}'"
                )));
            }
        }
        match self.chat.outbound.as_str() {
            "http" if self.chat.reply_url.is_none() => {
                return Err(AppError::configuration(
                    "chat.reply_url is required when chat.outbound = \"http\"",
                ));
            }
            "http" | "log" => {}
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown outbound channel: '{other}'"
                )));
            }
        }
        if self.session.inactivity_minutes == 0 {
            return Err(AppError::configuration(
                "session.inactivity_minutes must be greater than zero",
            ));
        }
        if self.chat.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(AppError::configuration(
                "chat.utc_offset_minutes must be within one day",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid_for_memory_provider() {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.inactivity_minutes, 120);
        assert_eq!(config.chat.command_prefix, "!");
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = AppConfig::default();
        config.database.provider = "postgres".to_string();
        config.database.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_http_outbound_requires_url() {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.chat.outbound = "http".to_string();
        config.chat.reply_url = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let mut config = AppConfig::default();
        config.database.provider = "sqlite".to_string();
        assert!(config.validate().is_err());
    }
}
