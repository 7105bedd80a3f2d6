//! # Mock Framework
//!
//! Test doubles for the cart's collaborators.
//!
//! Two flavours:
//! - [`create_mock_lookup`] hands back a lookup whose calls arrive on a channel the
//!   test controls. Use [`expect_stock`] / [`expect_product`] to assert each call
//!   and answer it (success, failure, or never).
//! - [`FakeInventory`], [`RecordingNotifier`] and [`RecordingStore`] answer on their
//!   own and count what they were asked, for scenario and property tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::cart_actor::Collaborators;
use crate::domain::{Product, ProductId, Stock};
use crate::notifications::{Notice, NoticeKind};
use crate::ports::{CatalogLookup, KeyValueStore, LookupError, Notifier, StockLookup, StoreError};
use crate::storage::MemoryStore;

pub fn sample_product(id: u64) -> Product {
    Product::new(id, format!("Tenis {id}"), 100.0 + id as f64, format!("https://img.example/{id}.jpg"))
}

// =============================================================================
// Channel-driven lookups
// =============================================================================

#[derive(Debug)]
pub enum LookupCall {
    Stock {
        id: ProductId,
        respond_to: oneshot::Sender<Result<Stock, LookupError>>,
    },
    Product {
        id: ProductId,
        respond_to: oneshot::Sender<Result<Product, LookupError>>,
    },
}

#[derive(Clone)]
pub struct ChannelLookup {
    sender: mpsc::Sender<LookupCall>,
}

/// Creates a lookup that forwards every call to the returned receiver.
pub fn create_mock_lookup(buffer_size: usize) -> (Arc<ChannelLookup>, mpsc::Receiver<LookupCall>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (Arc::new(ChannelLookup { sender }), receiver)
}

#[async_trait]
impl StockLookup for ChannelLookup {
    async fn stock(&self, id: ProductId) -> Result<Stock, LookupError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LookupCall::Stock { id, respond_to })
            .await
            .map_err(|_| LookupError::Request("Mock closed".to_string()))?;
        response
            .await
            .map_err(|_| LookupError::Request("Mock dropped".to_string()))?
    }
}

#[async_trait]
impl CatalogLookup for ChannelLookup {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LookupCall::Product { id, respond_to })
            .await
            .map_err(|_| LookupError::Request("Mock closed".to_string()))?;
        response
            .await
            .map_err(|_| LookupError::Request("Mock dropped".to_string()))?
    }
}

/// Helper to verify that the next call is a stock lookup
pub async fn expect_stock(
    receiver: &mut mpsc::Receiver<LookupCall>,
) -> Option<(ProductId, oneshot::Sender<Result<Stock, LookupError>>)> {
    match receiver.recv().await {
        Some(LookupCall::Stock { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a catalog lookup
pub async fn expect_product(
    receiver: &mut mpsc::Receiver<LookupCall>,
) -> Option<(ProductId, oneshot::Sender<Result<Product, LookupError>>)> {
    match receiver.recv().await {
        Some(LookupCall::Product { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

// =============================================================================
// Recording fakes
// =============================================================================

/// Stock and catalog backed by a table. Unknown products have zero stock.
#[derive(Default)]
pub struct FakeInventory {
    stock: Mutex<HashMap<ProductId, u32>>,
    failing: Mutex<HashSet<ProductId>>,
    catalog_failing: Mutex<HashSet<ProductId>>,
    stock_calls: AtomicUsize,
    catalog_calls: AtomicUsize,
}

impl FakeInventory {
    pub fn with_stock(entries: &[(u64, u32)]) -> Self {
        let inventory = Self::default();
        for &(id, amount) in entries {
            inventory.set_stock(id, amount);
        }
        inventory
    }

    pub fn set_stock(&self, id: u64, amount: u32) {
        self.stock.lock().unwrap().insert(ProductId(id), amount);
    }

    /// Every stock lookup for `id` fails from now on.
    pub fn fail_stock(&self, id: u64) {
        self.failing.lock().unwrap().insert(ProductId(id));
    }

    pub fn fail_catalog(&self, id: u64) {
        self.catalog_failing.lock().unwrap().insert(ProductId(id));
    }

    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StockLookup for FakeInventory {
    async fn stock(&self, id: ProductId) -> Result<Stock, LookupError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        // let other tasks run so interleavings get a chance to happen
        tokio::task::yield_now().await;
        if self.failing.lock().unwrap().contains(&id) {
            return Err(LookupError::Status { product_id: id, status: 500 });
        }
        let amount = self.stock.lock().unwrap().get(&id).copied().unwrap_or(0);
        Ok(Stock { id, amount })
    }
}

#[async_trait]
impl CatalogLookup for FakeInventory {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.catalog_failing.lock().unwrap().contains(&id) {
            return Err(LookupError::Request("connection refused".to_string()));
        }
        Ok(sample_product(id.0))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<NoticeKind> {
        self.notices().into_iter().map(|notice| notice.kind).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Memory store that counts writes and can be told to fail them.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl RecordingStore {
    pub fn with_entry(key: &str, value: &str) -> Self {
        Self {
            inner: MemoryStore::with_entry(key, value),
            ..Self::default()
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write("quota exceeded".to_string()));
        }
        self.inner.set(key, value).await
    }
}

/// The three recording fakes wired together.
pub struct Harness {
    pub inventory: Arc<FakeInventory>,
    pub store: Arc<RecordingStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new(stock: &[(u64, u32)]) -> Self {
        Self::with_store(stock, RecordingStore::default())
    }

    pub fn with_store(stock: &[(u64, u32)], store: RecordingStore) -> Self {
        Self {
            inventory: Arc::new(FakeInventory::with_stock(stock)),
            store: Arc::new(store),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            stock: self.inventory.clone(),
            catalog: self.inventory.clone(),
            store: self.store.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_lookup() {
        let (lookup, mut receiver) = create_mock_lookup(10);

        let stock_task = tokio::spawn(async move { lookup.stock(ProductId(3)).await });

        let (id, responder) = expect_stock(&mut receiver).await.expect("Expected stock lookup");
        assert_eq!(id, ProductId(3));
        responder.send(Ok(Stock::new(3, 7))).unwrap();

        let result = stock_task.await.unwrap();
        assert_eq!(result, Ok(Stock::new(3, 7)));
    }

    #[tokio::test]
    async fn test_fake_inventory_counts_calls() {
        let inventory = FakeInventory::with_stock(&[(1, 2)]);
        assert_eq!(inventory.stock(ProductId(1)).await.unwrap().amount, 2);
        assert_eq!(inventory.stock(ProductId(5)).await.unwrap().amount, 0);
        inventory.fail_stock(1);
        assert!(inventory.stock(ProductId(1)).await.is_err());
        assert_eq!(inventory.stock_calls(), 3);
        assert_eq!(inventory.catalog_calls(), 0);
    }
}
