//! Checkout route handler.
//!
//! Turns the session cart into an order: validate, price, store, then clear
//! the cart. The cart is only cleared once the order store has accepted the
//! order.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use emporium_core::{CartAction, CheckoutRequest, Order, OrderDraft, OrderNumber};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{CartHandle, SessionCartStorage};
use crate::error::{Result, add_breadcrumb};
use crate::orders::OrderStoreError;
use crate::state::AppState;

/// Attempts at drawing an unused order number.
const ORDER_NUMBER_ATTEMPTS: usize = 3;

/// Place an order for the session cart.
#[instrument(skip(state, session, request))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let mut cart = CartHandle::acquire(SessionCartStorage::new(session)).await;

    let draft = OrderDraft::from_cart(cart.state().items(), request, state.pricing())?;

    let order = place_order(&state, draft).await?;

    cart.dispatch(CartAction::ClearCart).await;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", order.order_number.as_str())]),
    );
    tracing::info!(
        order_number = %order.order_number,
        total = %order.draft.totals.total,
        "Order placed"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// Store `draft` under a fresh order number.
///
/// Numbers only carry a three-digit random suffix per millisecond, so a
/// collision draws a new one.
async fn place_order(state: &AppState, draft: OrderDraft) -> Result<Order> {
    let mut attempt = 1;
    loop {
        let created_at = Utc::now();
        let number = OrderNumber::generate(created_at, &mut rand::rng());

        match state
            .orders()
            .create(draft.clone().place(number, created_at))
            .await
        {
            Err(OrderStoreError::Duplicate(number)) if attempt < ORDER_NUMBER_ATTEMPTS => {
                tracing::warn!(%number, attempt, "Order number collision, retrying");
                attempt += 1;
            }
            result => return Ok(result?),
        }
    }
}
