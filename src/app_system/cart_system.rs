use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::api::{ApiClient, ApiError};
use crate::cart_actor::{CartService, Collaborators};
use crate::clients::CartClient;
use crate::notifications::TracingNotifier;
use crate::ports::Notifier;
use crate::storage::{load_cart, FileStore};

use super::config::CartConfig;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
    #[error("Cart client error: {0}")]
    Client(#[from] crate::cart_actor::CartError),
    #[error("Actor task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Owns the running cart service for one session.
///
/// Responsible for hydrating the cart, starting the actor, and shutting it down.
pub struct CartSystem {
    pub cart_client: CartClient,
    handle: tokio::task::JoinHandle<()>,
}

impl CartSystem {
    /// Hydrates the cart from `collaborators.store` and starts the service.
    pub async fn start(collaborators: Collaborators, config: &CartConfig) -> Self {
        info!("Starting cart system");

        let cart = load_cart(collaborators.store.as_ref()).await;
        let (service, cart_client) = CartService::new(config.mailbox_size, cart, collaborators);
        let handle = tokio::spawn(service.run());

        Self { cart_client, handle }
    }

    /// Starts a system backed by the HTTP API and the file store.
    ///
    /// Notices go to the log; use [`CartSystem::from_config_with_notifier`] to
    /// show them elsewhere.
    pub async fn from_config(config: &CartConfig) -> Result<Self, SystemError> {
        Self::from_config_with_notifier(config, Arc::new(TracingNotifier)).await
    }

    pub async fn from_config_with_notifier(
        config: &CartConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, SystemError> {
        let api = Arc::new(ApiClient::new(&config.api_url, config.lookup_timeout)?);
        info!(api_url = %api.base_url(), storage_dir = %config.storage_dir.display(), "Cart system configured");

        let collaborators = Collaborators {
            stock: api.clone(),
            catalog: api,
            store: Arc::new(FileStore::new(config.storage_dir.clone())),
            notifier,
        };
        Ok(Self::start(collaborators, config).await)
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down cart system...");
        self.cart_client.shutdown().await?;

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(e.into());
        }

        info!("Cart system shutdown complete.");
        Ok(())
    }
}
