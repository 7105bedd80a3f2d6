use std::sync::Arc;

use tracing::{error, info, Instrument};

use cart_actor::app_system::{setup_tracing, CartConfig, CartSystem};
use cart_actor::cart_actor::Outcome;
use cart_actor::domain::{ProductId, UpdateProductAmount};
use cart_actor::notifications::ChannelNotifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = CartConfig::from_env()?;
    info!(?config, "Starting cart demo");

    let (notifier, mut notices) = ChannelNotifier::new();
    let system = CartSystem::from_config_with_notifier(&config, Arc::new(notifier)).await?;

    // Stand-in for a toast component.
    let toasts = tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            info!(kind = %notice.kind, "Toast: {}", notice.message);
        }
    });

    let client = system.cart_client.clone();
    let span = tracing::info_span!("cart_session");
    async {
        report("add", client.add_product(ProductId(1)).await?);
        report("add", client.add_product(ProductId(1)).await?);
        report("update", client.update_product_amount(UpdateProductAmount::new(1, 3)).await?);
        report("remove", client.remove_product(ProductId(2)).await?);

        let cart = client.cart().await?;
        info!(lines = cart.len(), items = cart.total_items(), subtotal = cart.subtotal(), "Cart at end of session");
        Ok::<_, cart_actor::cart_actor::CartError>(())
    }
    .instrument(span)
    .await?;

    drop(client);
    system.shutdown().await?;
    // the service dropped the notifier on exit, so this drains and ends
    toasts.await?;

    info!("Cart demo completed");
    Ok(())
}

fn report(operation: &str, outcome: Outcome) {
    match outcome {
        Outcome::Committed(cart) => info!(operation, lines = cart.len(), "Committed"),
        Outcome::Unchanged => info!(operation, "Unchanged"),
        Outcome::Rejected(rejection) => error!(operation, error = %rejection, "Rejected"),
    }
}
