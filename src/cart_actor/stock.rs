use crate::domain::{ProductId, Stock};

use super::error::Rejection;

/// Rejects a requested line amount that the live stock cannot cover.
pub fn check_stock(product_id: ProductId, requested: u32, stock: &Stock) -> Result<(), Rejection> {
    if requested > stock.amount {
        return Err(Rejection::StockExceeded {
            product_id,
            requested,
            available: stock.amount,
        });
    }
    Ok(())
}
