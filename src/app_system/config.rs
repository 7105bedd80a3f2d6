//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CART_API_URL` - Base URL of the stock/catalog API (default: http://localhost:3333)
//! - `CART_STORAGE_DIR` - Directory the cart snapshot is written to (default: .cart)
//! - `CART_LOOKUP_TIMEOUT_MS` - Per-request timeout for lookups (default: 5000)
//! - `CART_MAILBOX_SIZE` - Pending requests the cart service buffers (default: 32)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_DIR: &str = ".cart";
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5000;
const DEFAULT_MAILBOX_SIZE: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartConfig {
    /// Base URL for `/stock/{id}` and `/products/{id}`
    pub api_url: String,
    pub storage_dir: PathBuf,
    /// Lookups slower than this fail like any other lookup error
    pub lookup_timeout: Duration,
    pub mailbox_size: usize,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            lookup_timeout: Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS),
            mailbox_size: DEFAULT_MAILBOX_SIZE,
        }
    }
}

impl CartConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = lookup("CART_API_URL").unwrap_or(defaults.api_url);
        let storage_dir = lookup("CART_STORAGE_DIR").map_or(defaults.storage_dir, PathBuf::from);

        let lookup_timeout = match lookup("CART_LOOKUP_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(parse_positive(&raw, "CART_LOOKUP_TIMEOUT_MS")?),
            None => defaults.lookup_timeout,
        };

        let mailbox_size = match lookup("CART_MAILBOX_SIZE") {
            Some(raw) => {
                let size = parse_positive(&raw, "CART_MAILBOX_SIZE")?;
                usize::try_from(size)
                    .map_err(|e| ConfigError::InvalidEnvVar("CART_MAILBOX_SIZE".to_string(), e.to_string()))?
            }
            None => defaults.mailbox_size,
        };

        Ok(Self {
            api_url,
            storage_dir,
            lookup_timeout,
            mailbox_size,
        })
    }
}

fn parse_positive(raw: &str, name: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(name.to_string(), "must be greater than 0".to_string())),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidEnvVar(name.to_string(), e.to_string())),
    }
}
