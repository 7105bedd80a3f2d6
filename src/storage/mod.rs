//! Durable stores and the cart snapshot format.

mod file;
mod memory;
pub mod persistence;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use persistence::{load_cart, save_cart, CART_STORAGE_KEY};
