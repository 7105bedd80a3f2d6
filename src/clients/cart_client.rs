use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument};

use crate::cart_actor::{CartError, CartRequest, Outcome};
use crate::domain::{Cart, ProductId, UpdateProductAmount};

use super::macros::client_method;

/// Handle to a running [`CartService`](crate::cart_actor::CartService).
///
/// Cheap to clone; pass it to whichever component needs the cart. Requests
/// from all clones are applied in arrival order.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
    watcher: watch::Receiver<Cart>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>, watcher: watch::Receiver<Cart>) -> Self {
        Self { sender, watcher }
    }

    /// Receiver that sees every committed cart, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.watcher.clone()
    }

    /// Last committed cart without a round trip to the service.
    pub fn snapshot(&self) -> Cart {
        self.watcher.borrow().clone()
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|e| CartError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(CartClient => fn cart() -> Cart as CartRequest::GetCart);
client_method!(CartClient => fn add_product(product_id: ProductId) -> Outcome as CartRequest::AddProduct);
client_method!(CartClient => fn remove_product(product_id: ProductId) -> Outcome as CartRequest::RemoveProduct);
client_method!(CartClient => fn update_product_amount(update: UpdateProductAmount) -> Outcome as CartRequest::UpdateProductAmount);
