//! Checkout orchestration.
//!
//! Turns the viewer's cart rows into an order plus immutable line items.
//! The money math ([`order_total`], [`snapshot_items`]) is pure so it can
//! be tested without a store; the async part is plain sequential I/O.
//!
//! Order creation, line-item inserts, and cart clearing are separate store
//! requests - a failure mid-way leaves the earlier writes in place.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{info, instrument};

use velvet_muse_core::{OrderId, OrderStatus, PaymentStatus};

use crate::auth::Viewer;
use crate::error::AppError;
use crate::store::rows::{CartItemRow, NewOrder, NewOrderItem, OrderRow, ProductRow};
use crate::store::StoreClient;

/// One cart row joined with its catalog product.
#[derive(Debug, Clone)]
pub struct CheckoutLine {
    pub item: CartItemRow,
    pub product: ProductRow,
}

/// Total amount across every line: sum of price times quantity, at
/// current catalog prices.
#[must_use]
pub fn order_total(lines: &[CheckoutLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.product.price * Decimal::from(line.item.quantity))
        .sum()
}

/// Build the immutable line-item snapshots for an order.
///
/// Each snapshot captures the product's price at order time; later catalog
/// price changes must not affect it.
#[must_use]
pub fn snapshot_items(order_id: OrderId, lines: &[CheckoutLine]) -> Vec<NewOrderItem> {
    lines
        .iter()
        .map(|line| NewOrderItem {
            order_id,
            product_id: line.item.product_id,
            price: line.product.price,
            quantity: line.item.quantity,
            size: line.item.size.clone(),
            color: line.item.color.clone(),
        })
        .collect()
}

/// Check out the signed-in viewer's cart.
///
/// Creates the order, inserts one line item per cart row with the price
/// snapshot, then clears the cart.
///
/// # Errors
///
/// Returns `Unauthenticated` for an anonymous viewer, `NoInput` for an
/// empty cart, and `Persistence`/`Store` when the store rejects a step.
#[instrument(skip_all)]
pub async fn checkout(
    store: &StoreClient,
    viewer: &Viewer,
    shipping_address: Value,
) -> Result<OrderRow, AppError> {
    let auth = viewer.require()?;

    let items = store.cart_items(auth).await?;
    if items.is_empty() {
        return Err(AppError::NoInput("Your cart is empty.".to_string()));
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = store.get_product(item.product_id).await?;
        lines.push(CheckoutLine { item, product });
    }

    let order = store
        .create_order(
            auth,
            &NewOrder {
                user_id: auth.user_id(),
                status: OrderStatus::Pending,
                payment_status: PaymentStatus::Pending,
                shipping_address,
                total_amount: order_total(&lines),
            },
        )
        .await
        .map_err(AppError::Persistence)?;

    for snapshot in snapshot_items(order.id, &lines) {
        store
            .add_order_item(auth, &snapshot)
            .await
            .map_err(AppError::Persistence)?;
    }

    store
        .clear_cart(auth)
        .await
        .map_err(AppError::Persistence)?;

    info!(order_id = %order.id, lines = lines.len(), "checkout complete");
    Ok(order)
}
