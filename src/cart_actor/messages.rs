use tokio::sync::oneshot;

use crate::domain::{Cart, ProductId, UpdateProductAmount};

use super::error::{CartError, Rejection};

pub type ServiceResult<T> = std::result::Result<T, CartError>;
pub type ServiceResponse<T> = oneshot::Sender<ServiceResult<T>>;

/// Result of a mutating request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The new cart was persisted and published.
    Committed(Cart),
    /// Nothing to do; no notice was sent.
    Unchanged,
    /// The request was refused and the user was notified.
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// Messages accepted by [`CartService`](super::CartService). Each carries a
/// oneshot channel for the reply.
#[derive(Debug)]
pub enum CartRequest {
    GetCart {
        respond_to: ServiceResponse<Cart>,
    },
    AddProduct {
        product_id: ProductId,
        respond_to: ServiceResponse<Outcome>,
    },
    RemoveProduct {
        product_id: ProductId,
        respond_to: ServiceResponse<Outcome>,
    },
    UpdateProductAmount {
        update: UpdateProductAmount,
        respond_to: ServiceResponse<Outcome>,
    },
    Shutdown,
}
