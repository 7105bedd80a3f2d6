//! # Cart Actor
//!
//! Client-side shopping cart state, kept by a single actor.
//!
//! - **Domain types** - [`Cart`](domain::Cart), [`CartLine`](domain::CartLine), [`Product`](domain::Product)
//! - **Cart service** - owns the cart and applies add / remove / update one request at a
//!   time, checking live stock and writing every commit through to the store
//!   → [`CartService`](cart_actor::CartService)
//! - **Client** - cloneable handle used by the rest of the application → [`CartClient`](clients::CartClient)
//! - **Collaborators** - stock and catalog lookups, the durable store and the notifier,
//!   all behind traits in [`ports`]
//! - **System** - hydration, startup and shutdown → [`CartSystem`](app_system::CartSystem)
//!
//! ## Example Usage
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use cart_actor::app_system::{CartConfig, CartSystem};
//! use cart_actor::domain::{ProductId, UpdateProductAmount};
//!
//! let system = CartSystem::from_config(&CartConfig::from_env()?).await?;
//!
//! system.cart_client.add_product(ProductId(1)).await?;
//! system.cart_client.update_product_amount(UpdateProductAmount::new(1, 3)).await?;
//! let cart = system.cart_client.cart().await?;
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app_system;
pub mod cart_actor;
pub mod clients;
pub mod domain;
pub mod notifications;
pub mod ports;
pub mod storage;

#[cfg(test)]
mod mock_framework;
