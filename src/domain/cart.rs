use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::product::{Product, ProductId};

/// One product's presence in the cart.
///
/// Serialized with the catalog fields flattened next to `amount`, e.g.
/// `{ "id": 1, "title": "...", "price": 179.9, "image": "...", "amount": 2 }`.
/// Build lines with [`CartLine::new`] so a catalog `amount` field cannot
/// shadow the line's own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartLine {
    pub fn new(mut product: Product, amount: u32) -> Self {
        product.extra.remove("amount");
        Self { product, amount }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

/// A stored snapshot that cannot be turned into a cart.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SnapshotError {
    #[error("Duplicate line for product {0}")]
    DuplicateLine(ProductId),
    #[error("Line for product {0} has zero amount")]
    EmptyLine(ProductId),
}

/// The user's current set of product lines.
///
/// Holds at most one line per product id and never a line with `amount == 0`.
/// Transitions return a new cart and leave `self` untouched, so a failed
/// operation can simply drop the candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from untrusted lines, e.g. a persisted snapshot.
    pub fn try_from_lines(lines: Vec<CartLine>) -> Result<Self, SnapshotError> {
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if line.amount == 0 {
                return Err(SnapshotError::EmptyLine(line.id()));
            }
            if !seen.insert(line.id()) {
                return Err(SnapshotError::DuplicateLine(line.id()));
            }
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn find(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.find(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line amounts.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.amount)).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines
            .iter()
            .map(|line| line.product.price * f64::from(line.amount))
            .sum()
    }

    /// Amount an add request would produce: one more than the existing line, or 1.
    pub fn next_amount(&self, id: ProductId) -> u32 {
        self.find(id).map_or(1, |line| line.amount.saturating_add(1))
    }

    /// Appends a fresh line for a product that is not yet in the cart.
    ///
    /// An existing line for the same product is replaced in place.
    pub fn with_line(&self, line: CartLine) -> Self {
        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|existing| existing.id() == line.id()) {
            Some(existing) => *existing = line,
            None => lines.push(line),
        }
        Self { lines }
    }

    /// Sets the amount of an existing line, keeping its catalog snapshot.
    ///
    /// Returns `None` when the product has no line or `amount` is zero.
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        if amount == 0 || !self.contains(id) {
            return None;
        }
        let lines = self
            .lines
            .iter()
            .map(|line| {
                if line.id() == id {
                    CartLine { amount, ..line.clone() }
                } else {
                    line.clone()
                }
            })
            .collect();
        Some(Self { lines })
    }

    /// Removes the line for `id`. Returns `None` when there is no such line.
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let lines = self.lines.iter().filter(|line| line.id() != id).cloned().collect();
        Some(Self { lines })
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let lines = Vec::<CartLine>::deserialize(deserializer)?;
        Cart::try_from_lines(lines).map_err(serde::de::Error::custom)
    }
}

/// Request to set a line's amount to an absolute value.
///
/// `amount` is signed so zero and negative requests reach the silent guard
/// rather than failing at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: impl Into<ProductId>, amount: i64) -> Self {
        Self {
            product_id: product_id.into(),
            amount,
        }
    }
}
