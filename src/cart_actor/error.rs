use thiserror::Error;

use crate::domain::ProductId;
use crate::notifications::NoticeKind;
use crate::ports::{LookupError, StoreError};

/// Which operation a rejection came from. Decides the failure notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    pub fn failure_notice(self) -> NoticeKind {
        match self {
            Operation::Add => NoticeKind::AddFailed,
            Operation::Remove => NoticeKind::RemoveFailed,
            Operation::Update => NoticeKind::UpdateFailed,
        }
    }
}

/// Why a cart operation did not commit. The cart is unchanged in every case.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Rejection {
    #[error("Lookup failed during {operation:?}: {source}")]
    Lookup {
        operation: Operation,
        #[source]
        source: LookupError,
    },
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),
    #[error("Cart could not be persisted during {operation:?}: {source}")]
    Persistence {
        operation: Operation,
        #[source]
        source: StoreError,
    },
}

impl Rejection {
    /// The single notice the user sees for this rejection.
    pub fn notice_kind(&self) -> NoticeKind {
        match self {
            Rejection::StockExceeded { .. } => NoticeKind::StockExceeded,
            Rejection::NotFound(_) => NoticeKind::RemoveFailed,
            Rejection::Lookup { operation, .. } | Rejection::Persistence { operation, .. } => {
                operation.failure_notice()
            }
        }
    }
}

/// Errors reaching callers of the client. Business failures are reported as
/// [`Rejection`]s inside a successful reply; only a dead actor ends up here.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
