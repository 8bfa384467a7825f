//! Process configuration.
//!
//! All settings come from environment variables, layered over built-in
//! defaults with the `config` crate:
//!
//! - `DATABASE_URL` (required) - relational database DSN
//! - `REDIS_URL` - queue broker address (default `redis://127.0.0.1:6379`)
//! - `SECRET_KEY` (required) - 32-byte key for credential encryption
//! - `SHOPIFY_CLIENT_ID` / `SHOPIFY_CLIENT_SECRET` / `SHOPIFY_REDIRECT_URL` -
//!   OAuth app settings (consumed by the external OAuth handshake)
//! - `SHOPIFY_SCOPES` - comma-separated scope list
//! - `LOG_LEVEL` - debug|info|warn|error (default `info`)

use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

use crate::crypto::{CryptoError, SecretCipher};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A variable is missing or failed to deserialize.
    #[error("configuration error: {0}")]
    Source(#[from] config::ConfigError),

    /// `SECRET_KEY` has the wrong length.
    #[error("SECRET_KEY invalid: {0}")]
    SecretKey(#[from] CryptoError),

    /// `LOG_LEVEL` is not one of debug, info, warn, error.
    #[error("LOG_LEVEL must be one of debug, info, warn, error; got `{0}`")]
    LogLevel(String),
}

/// Immutable process settings, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Relational database DSN.
    pub database_url: String,

    /// Queue broker address.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// 32-byte symmetric key for credential encryption.
    pub secret_key: String,

    /// Shopify OAuth client id.
    #[serde(default)]
    pub shopify_client_id: String,

    /// Shopify OAuth client secret.
    #[serde(default)]
    pub shopify_client_secret: String,

    /// Shopify OAuth redirect URL.
    #[serde(default)]
    pub shopify_redirect_url: String,

    /// Comma-separated Shopify access scopes.
    #[serde(default = "default_shopify_scopes")]
    pub shopify_scopes: String,

    /// Log level for the process-wide subscriber.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_owned()
}

fn default_shopify_scopes() -> String {
    "read_products,read_locations,read_inventory,read_orders".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

const LOG_LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];

impl Settings {
    /// Load settings from the environment and validate them.
    ///
    /// Fails fast: a missing `DATABASE_URL`, a `SECRET_KEY` that is not
    /// exactly 32 bytes, or an unknown `LOG_LEVEL` abort startup.
    pub fn load() -> Result<Self, SettingsError> {
        let source = Config::builder()
            .add_source(Environment::default())
            .build()?;
        let settings: Settings = source.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        // Constructing the cipher enforces the 32-byte key requirement.
        SecretCipher::new(&self.secret_key)?;
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(SettingsError::LogLevel(self.log_level.clone()));
        }
        Ok(())
    }

    /// Build the credential cipher from the configured key.
    pub fn cipher(&self) -> Result<SecretCipher, CryptoError> {
        SecretCipher::new(&self.secret_key)
    }

    /// The configured Shopify scopes, split on commas.
    pub fn shopify_scopes(&self) -> Vec<&str> {
        self.shopify_scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> Settings {
        Settings {
            database_url: "postgres://localhost/stockroom".to_owned(),
            redis_url: default_redis_url(),
            secret_key: "0123456789abcdef0123456789abcdef".to_owned(),
            shopify_client_id: String::new(),
            shopify_client_secret: String::new(),
            shopify_redirect_url: String::new(),
            shopify_scopes: default_shopify_scopes(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn validate_accepts_well_formed_settings() {
        assert!(base_settings().validate().is_ok());
    }

    #[test]
    fn validate_rejects_short_secret_key() {
        let mut settings = base_settings();
        settings.secret_key = "short".to_owned();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::SecretKey(_))
        ));
    }

    #[test]
    fn validate_rejects_unknown_log_level() {
        let mut settings = base_settings();
        settings.log_level = "verbose".to_owned();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::LogLevel(level)) if level == "verbose"
        ));
    }

    #[test]
    fn scopes_split_on_commas_and_trim() {
        let mut settings = base_settings();
        settings.shopify_scopes = "read_products, read_orders,,read_inventory".to_owned();
        assert_eq!(
            settings.shopify_scopes(),
            vec!["read_products", "read_orders", "read_inventory"]
        );
    }

    #[test]
    fn defaults_are_sensible() {
        let settings = base_settings();
        assert_eq!(settings.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.shopify_scopes().len(), 4);
    }
}
