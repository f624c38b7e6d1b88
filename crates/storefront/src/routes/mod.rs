//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Health check
//!
//! # Products
//! GET    /api/products                 - Product listing (?category=)
//! GET    /api/products/{slug}          - Product detail
//!
//! # Cart (session-scoped)
//! GET    /api/cart                     - Cart with totals preview
//! DELETE /api/cart                     - Clear cart
//! POST   /api/cart/items               - Add {product_id, quantity?}
//! PATCH  /api/cart/items/{product_id}  - Set quantity {quantity}
//! DELETE /api/cart/items/{product_id}  - Remove line
//! POST   /api/cart/actions             - Dispatch a raw cart action
//! POST   /api/cart/open                - Open drawer
//! POST   /api/cart/close               - Close drawer
//! POST   /api/cart/toggle              - Toggle drawer
//!
//! # Checkout & Orders
//! POST   /api/checkout                 - Place order from cart
//! GET    /api/orders                   - Order listing (?page=&limit=)
//! GET    /api/orders/{order_number}    - Order detail
//!
//! # Contact
//! POST   /api/contact                  - Submit contact form
//!
//! # Pages
//! *      anything else                 - Localized page shell
//! ```

pub mod cart;
pub mod checkout;
pub mod contact;
pub mod health;
pub mod orders;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{product_id}",
            patch(cart::update).delete(cart::remove),
        )
        .route("/actions", post(cart::dispatch))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/toggle", post(cart::toggle))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{order_number}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(checkout::create))
        .nest("/api/orders", order_routes())
        .route("/api/contact", post(contact::submit))
        .fallback(pages::show)
}
