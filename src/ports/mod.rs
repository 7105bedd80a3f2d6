//! Collaborators the cart service depends on.
//!
//! The service only sees these traits; the HTTP client, the stores and the
//! notifiers are wired in by the system at startup and replaced by fakes in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Product, ProductId, Stock};
use crate::notifications::Notice;

/// A stock or catalog lookup that did not produce a usable answer.
///
/// Transport errors, bad statuses and bad bodies are all treated alike.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupError {
    #[error("Lookup request failed: {0}")]
    Request(String),
    #[error("Lookup returned status {status} for product {product_id}")]
    Status { product_id: ProductId, status: u16 },
    #[error("Lookup response could not be parsed: {0}")]
    Parse(String),
    #[error("Lookup for product {requested} returned product {returned}")]
    Mismatch { requested: ProductId, returned: ProductId },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Store read failed: {0}")]
    Read(String),
    #[error("Store write failed: {0}")]
    Write(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockLookup: Send + Sync {
    async fn stock(&self, id: ProductId) -> Result<Stock, LookupError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError>;
}

/// Durable key-value store scoped to the session or device.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Sink for user-visible messages. Fire-and-forget: implementations must not
/// block and have nothing to report back.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
