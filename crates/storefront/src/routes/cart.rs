//! Cart route handlers.
//!
//! The cart lives in the shopper's session. Every handler restores it, applies
//! one [`CartAction`], and answers with the resulting [`CartView`].

use axum::{
    Json,
    extract::{Path, State},
};
use emporium_core::{
    CartAction, CartItem, CartState, OrderTotals, PricingPolicy, ProductId, format_money,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{CartHandle, SessionCartStorage};
use crate::catalog::Product;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    pub line_total: Decimal,
    pub formatted_line_total: String,
}

/// Cart display data, with the totals checkout would charge.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub is_open: bool,
    pub total_items: u32,
    pub total_price: Decimal,
    pub formatted_total_price: String,
    pub totals: OrderTotals,
}

impl CartView {
    #[must_use]
    pub fn new(state: &CartState, policy: &PricingPolicy) -> Self {
        Self {
            items: state
                .items()
                .iter()
                .map(|item| CartLineView {
                    item: item.clone(),
                    line_total: item.line_total(),
                    formatted_line_total: format_money(item.line_total()),
                })
                .collect(),
            is_open: state.is_open(),
            total_items: state.total_items(),
            total_price: state.total_price(),
            formatted_total_price: format_money(state.total_price()),
            totals: state.order_totals(policy),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

// =============================================================================
// Helpers
// =============================================================================

/// Restore the session's cart.
async fn session_cart(session: Session) -> CartHandle<SessionCartStorage> {
    CartHandle::acquire(SessionCartStorage::new(session)).await
}

/// Look up a product that can be sold in `quantity` more units on top of
/// what is already in the cart.
fn sellable<'a>(
    state: &'a AppState,
    cart: &CartState,
    product_id: &ProductId,
    quantity: u32,
) -> Result<&'a Product> {
    let product = state
        .catalog()
        .get(product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let in_cart = cart.item(product_id).map_or(0, |item| item.quantity);
    if !product.inventory.can_sell(in_cart.saturating_add(quantity)) {
        return Err(AppError::BadRequest(format!(
            "{} is out of stock",
            product.reference.title
        )));
    }

    Ok(product)
}

/// Check that raising a line to `quantity` stays within stock.
///
/// Lowering a quantity, or naming a product not in the cart, is always
/// allowed; the reducer handles both.
fn check_quantity(
    state: &AppState,
    cart: &CartState,
    product_id: &ProductId,
    quantity: i64,
) -> Result<()> {
    let Some(line) = cart.item(product_id) else {
        return Ok(());
    };
    let wanted = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
    if wanted > line.quantity {
        sellable(state, cart, product_id, wanted - line.quantity)?;
    }
    Ok(())
}

/// Apply `action` to the session cart and render the result.
async fn apply(
    state: &AppState,
    mut cart: CartHandle<SessionCartStorage>,
    action: CartAction,
) -> Json<CartView> {
    let next = cart.dispatch(action).await;
    Json(CartView::new(next, state.pricing()))
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the current cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let cart = session_cart(session).await;
    Json(CartView::new(cart.state(), state.pricing()))
}

/// Add a catalog product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let quantity = body.quantity.unwrap_or(1);
    let cart = session_cart(session).await;
    let product = sellable(&state, cart.state(), &body.product_id, quantity)?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", body.product_id.as_str())]),
    );

    let action = CartAction::add(product.reference.clone(), quantity);
    Ok(apply(&state, cart, action).await)
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<ProductId>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let cart = session_cart(session).await;
    check_quantity(&state, cart.state(), &product_id, body.quantity)?;

    Ok(apply(&state, cart, CartAction::update(product_id, body.quantity)).await)
}

/// Remove a line from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<ProductId>,
) -> Json<CartView> {
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", product_id.as_str())]),
    );
    let cart = session_cart(session).await;
    apply(&state, cart, CartAction::remove(product_id)).await
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let cart = session_cart(session).await;
    apply(&state, cart, CartAction::ClearCart).await
}

/// Open the cart drawer.
#[instrument(skip(state, session))]
pub async fn open(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let cart = session_cart(session).await;
    apply(&state, cart, CartAction::OpenCart).await
}

/// Close the cart drawer.
#[instrument(skip(state, session))]
pub async fn close(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let cart = session_cart(session).await;
    apply(&state, cart, CartAction::CloseCart).await
}

/// Flip the cart drawer.
#[instrument(skip(state, session))]
pub async fn toggle(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let cart = session_cart(session).await;
    apply(&state, cart, CartAction::ToggleCart).await
}

/// Dispatch a raw cart action.
///
/// Product data in `ADD_ITEM` is replaced with the catalog's copy, so clients
/// cannot set their own prices. `ADD_ITEM` and `UPDATE_QUANTITY` get the same
/// stock checks as the dedicated endpoints. `LOAD_CART` is reserved for restoring from
/// storage and is refused. Unrecognized action types leave the cart as is.
#[instrument(skip(state, session, action))]
pub async fn dispatch(
    State(state): State<AppState>,
    session: Session,
    Json(action): Json<CartAction>,
) -> Result<Json<CartView>> {
    let cart = session_cart(session).await;

    let action = match action {
        CartAction::AddItem { product, quantity } => {
            let product = sellable(&state, cart.state(), &product.id, quantity)?;
            CartAction::add(product.reference.clone(), quantity)
        }
        CartAction::UpdateQuantity {
            product_id,
            quantity,
        } => {
            check_quantity(&state, cart.state(), &product_id, quantity)?;
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            }
        }
        CartAction::LoadCart { .. } => {
            return Err(AppError::BadRequest(
                "LOAD_CART cannot be dispatched".to_string(),
            ));
        }
        CartAction::Unknown => {
            tracing::debug!("Ignoring unknown cart action");
            CartAction::Unknown
        }
        other => other,
    };

    Ok(apply(&state, cart, action).await)
}
