use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use crate::clients::CartClient;
use crate::domain::{Cart, CartLine, ProductId, UpdateProductAmount};
use crate::notifications::Notice;
use crate::ports::{CatalogLookup, KeyValueStore, LookupError, Notifier, StockLookup};
use crate::storage::save_cart;

use super::error::{Operation, Rejection};
use super::messages::{CartRequest, Outcome, ServiceResponse};
use super::stock::check_stock;

/// External collaborators the cart service calls out to.
#[derive(Clone)]
pub struct Collaborators {
    pub stock: Arc<dyn StockLookup>,
    pub catalog: Arc<dyn CatalogLookup>,
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// Owns the cart and applies requests one at a time.
///
/// Each request runs to completion (lookups, persistence, publish) before the
/// next one is received, so two adds for the same product can never both read
/// the same starting amount.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    cart: Cart,
    collaborators: Collaborators,
    published: watch::Sender<Cart>,
}

impl CartService {
    pub fn new(buffer_size: usize, cart: Cart, collaborators: Collaborators) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (published, watcher) = watch::channel(cart.clone());
        let service = Self {
            receiver,
            cart,
            collaborators,
            published,
        };
        let client = CartClient::new(sender, watcher);
        (service, client)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!(lines = self.cart.len(), "CartService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::GetCart { respond_to } => {
                    self.handle_get_cart(respond_to);
                }
                CartRequest::AddProduct { product_id, respond_to } => {
                    self.handle_add_product(product_id, respond_to).await;
                }
                CartRequest::RemoveProduct { product_id, respond_to } => {
                    self.handle_remove_product(product_id, respond_to).await;
                }
                CartRequest::UpdateProductAmount { update, respond_to } => {
                    self.handle_update_product_amount(update, respond_to).await;
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }

        info!("CartService stopped");
    }

    fn handle_get_cart(&self, respond_to: ServiceResponse<Cart>) {
        debug!("Processing get_cart request");
        let _ = respond_to.send(Ok(self.cart.clone()));
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    async fn handle_add_product(&mut self, product_id: ProductId, respond_to: ServiceResponse<Outcome>) {
        debug!("Processing add_product request");
        let outcome = self.add_product(product_id).await;
        let _ = respond_to.send(Ok(outcome));
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    async fn handle_remove_product(&mut self, product_id: ProductId, respond_to: ServiceResponse<Outcome>) {
        debug!("Processing remove_product request");
        let outcome = self.remove_product(product_id).await;
        let _ = respond_to.send(Ok(outcome));
    }

    #[instrument(fields(product_id = %update.product_id, amount = update.amount), skip(self, update, respond_to))]
    async fn handle_update_product_amount(
        &mut self,
        update: UpdateProductAmount,
        respond_to: ServiceResponse<Outcome>,
    ) {
        debug!("Processing update_product_amount request");
        let outcome = self.update_product_amount(update).await;
        let _ = respond_to.send(Ok(outcome));
    }

    pub(crate) async fn add_product(&mut self, product_id: ProductId) -> Outcome {
        match self.plan_add(product_id).await {
            Ok(candidate) => self.commit(candidate, Operation::Add).await,
            Err(rejection) => self.reject(rejection),
        }
    }

    pub(crate) async fn remove_product(&mut self, product_id: ProductId) -> Outcome {
        match self.cart.without(product_id) {
            Some(candidate) => self.commit(candidate, Operation::Remove).await,
            None => self.reject(Rejection::NotFound(product_id)),
        }
    }

    pub(crate) async fn update_product_amount(&mut self, update: UpdateProductAmount) -> Outcome {
        if update.amount < 1 {
            debug!("Amount below 1, ignoring");
            return Outcome::Unchanged;
        }
        match self.plan_update(update).await {
            Ok(Some(candidate)) => self.commit(candidate, Operation::Update).await,
            Ok(None) => {
                debug!("Product not in cart, nothing to update");
                Outcome::Unchanged
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Computes the cart an add would produce. Stock is checked before the
    /// catalog is consulted; existing lines keep their catalog snapshot.
    async fn plan_add(&self, product_id: ProductId) -> Result<Cart, Rejection> {
        let lookup_failed = |source| Rejection::Lookup {
            operation: Operation::Add,
            source,
        };

        let found = self.cart.find(product_id).cloned();
        let stock = self.collaborators.stock.stock(product_id).await.map_err(lookup_failed)?;
        let amount = self.cart.next_amount(product_id);
        check_stock(product_id, amount, &stock)?;

        let line = match found {
            Some(line) => CartLine { amount, ..line },
            None => {
                let product = self.collaborators.catalog.product(product_id).await.map_err(lookup_failed)?;
                if product.id != product_id {
                    return Err(lookup_failed(LookupError::Mismatch {
                        requested: product_id,
                        returned: product.id,
                    }));
                }
                CartLine::new(product, 1)
            }
        };

        Ok(self.cart.with_line(line))
    }

    /// `Ok(None)` when the product has no line: the stock check still runs but
    /// nothing is created.
    async fn plan_update(&self, update: UpdateProductAmount) -> Result<Option<Cart>, Rejection> {
        // Anything past u32::MAX is out of stock anyway.
        let amount = u32::try_from(update.amount).unwrap_or(u32::MAX);
        let stock = self
            .collaborators
            .stock
            .stock(update.product_id)
            .await
            .map_err(|source| Rejection::Lookup {
                operation: Operation::Update,
                source,
            })?;
        check_stock(update.product_id, amount, &stock)?;

        Ok(self.cart.with_amount(update.product_id, amount))
    }

    /// Persists `candidate`, then makes it current. A failed write leaves the
    /// current cart as it was.
    async fn commit(&mut self, candidate: Cart, operation: Operation) -> Outcome {
        if let Err(source) = save_cart(self.collaborators.store.as_ref(), &candidate).await {
            return self.reject(Rejection::Persistence { operation, source });
        }

        self.cart = candidate.clone();
        self.published.send_replace(candidate.clone());
        info!(lines = candidate.len(), items = candidate.total_items(), "Cart committed");
        Outcome::Committed(candidate)
    }

    fn reject(&self, rejection: Rejection) -> Outcome {
        warn!(error = %rejection, "Cart operation rejected");
        self.collaborators.notifier.notify(Notice::new(rejection.notice_kind()));
        Outcome::Rejected(rejection)
    }
}
