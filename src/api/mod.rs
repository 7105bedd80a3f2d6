//! HTTP client for the stock and catalog endpoints.
//!
//! - `GET {base}/stock/{id}` returns `{ "id": 1, "amount": 3 }`
//! - `GET {base}/products/{id}` returns the product record

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::{Product, ProductId, Stock};
use crate::ports::{CatalogLookup, LookupError, StockLookup};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid base URL {0}: {1}")]
    InvalidBaseUrl(String, url::ParseError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the store API.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Builds a client whose every request gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` does not parse or the HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = normalize_base(base_url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, id: ProductId) -> Result<Url, LookupError> {
        self.base_url
            .join(&format!("{resource}/{id}"))
            .map_err(|e| LookupError::Request(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, id: ProductId) -> Result<T, LookupError> {
        debug!(%url, "Sending request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                product_id: id,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| LookupError::Parse(e.to_string()))
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn normalize_base(base_url: &str) -> Result<Url, ApiError> {
    let with_slash = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Url::parse(&with_slash).map_err(|e| ApiError::InvalidBaseUrl(base_url.to_string(), e))
}

#[async_trait]
impl StockLookup for ApiClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, LookupError> {
        let url = self.endpoint("stock", id)?;
        self.get_json(url, id).await
    }
}

#[async_trait]
impl CatalogLookup for ApiClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        let url = self.endpoint("products", id)?;
        self.get_json(url, id).await
    }
}
