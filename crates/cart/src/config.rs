//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_PATH` - Storage file used by [`FileStorage`](crate::FileStorage)
//!   (default: `.go-marketplace/storage.json`)
//! - `CART_STORAGE_KEY` - Key of the cart slot inside the storage
//!   (default: `@GoMarketplace:cartProducts`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use thiserror::Error;

/// Storage key the mobile app has always used for the cart.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:cartProducts";

/// Default location of the storage file, relative to the working directory.
pub const DEFAULT_STORAGE_PATH: &str = ".go-marketplace/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// File backing the key-value storage
    pub storage_path: PathBuf,
    /// Key of the cart slot
    pub storage_key: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            sentry_dsn: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `CART_STORAGE_KEY` or
    /// `CART_STORAGE_PATH` is set but blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_path = match lookup("CART_STORAGE_PATH") {
            Some(path) if path.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "CART_STORAGE_PATH".to_string(),
                    "must not be empty".to_string(),
                ));
            }
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_STORAGE_PATH),
        };

        let storage_key = match lookup("CART_STORAGE_KEY") {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "CART_STORAGE_KEY".to_string(),
                    "must not be empty".to_string(),
                ));
            }
            Some(key) => key,
            None => DEFAULT_STORAGE_KEY.to_string(),
        };

        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty());

        Ok(Self {
            storage_path,
            storage_key,
            sentry_dsn,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CartConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "@GoMarketplace:cartProducts");
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("CART_STORAGE_PATH", "/tmp/cart.json"),
            ("CART_STORAGE_KEY", "@Test:cart"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ]))
        .unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/tmp/cart.json"));
        assert_eq!(config.storage_key, "@Test:cart");
        assert_eq!(
            config.sentry_dsn.as_deref(),
            Some("https://key@sentry.example.com/1")
        );
    }

    #[test]
    fn test_blank_values_rejected() {
        let err = CartConfig::from_lookup(lookup_from(&[("CART_STORAGE_KEY", "  ")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar(ref var, _) if var == "CART_STORAGE_KEY"
        ));

        let err = CartConfig::from_lookup(lookup_from(&[("CART_STORAGE_PATH", "")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar(ref var, _) if var == "CART_STORAGE_PATH"
        ));
    }

    #[test]
    fn test_empty_sentry_dsn_is_none() {
        let config = CartConfig::from_lookup(lookup_from(&[("SENTRY_DSN", "")])).unwrap();
        assert_eq!(config.sentry_dsn, None);
    }
}
