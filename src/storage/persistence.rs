//! Cart <-> durable store synchronization.
//!
//! The whole cart is stored as a JSON array under a single key and replaced
//! wholesale on every commit.

use tracing::{debug, info, instrument, warn};

use crate::domain::Cart;
use crate::ports::{KeyValueStore, StoreError};

/// Key the cart snapshot lives under. Bump the suffix when the format changes.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart:v1";

/// Reads the persisted cart. Never fails: a missing, unreadable or invalid
/// snapshot gives an empty cart.
#[instrument(skip(store))]
pub async fn load_cart(store: &dyn KeyValueStore) -> Cart {
    let raw = match store.get(CART_STORAGE_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored cart, starting empty");
            return Cart::new();
        }
        Err(e) => {
            warn!(error = %e, "Stored cart unreadable, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => {
            info!(lines = cart.len(), "Cart restored");
            cart
        }
        Err(e) => {
            warn!(error = %e, "Stored cart invalid, starting empty");
            Cart::new()
        }
    }
}

/// Overwrites the persisted snapshot with `cart`.
#[instrument(skip(store, cart), fields(lines = cart.len()))]
pub async fn save_cart(store: &dyn KeyValueStore, cart: &Cart) -> Result<(), StoreError> {
    let raw = serde_json::to_string(cart).map_err(|e| StoreError::Write(e.to_string()))?;
    store.set(CART_STORAGE_KEY, raw).await?;
    debug!("Cart persisted");
    Ok(())
}
