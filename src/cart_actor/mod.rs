//! The cart actor: message types, the service owning the cart, and the
//! rules each request is checked against.

pub mod error;
pub mod messages;
mod service;
mod stock;

pub use error::*;
pub use messages::*;
pub use service::{CartService, Collaborators};
pub use stock::check_stock;
