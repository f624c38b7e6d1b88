//! Emporium Core - storefront domain logic.
//!
//! This crate holds the pieces of the storefront that do not touch the
//! network, a database or a clock they did not receive as an argument:
//!
//! - [`cart`] - The cart reducer: line items, drawer state and derived totals
//! - [`locale`] - Locale resolution and the redirect/serve decision per request
//! - [`checkout`] - Order totals, line items and the checkout payload
//! - [`contact`] - Contact form validation
//! - [`types`] - Newtypes for ids, emails, money and statuses
//!
//! # Architecture
//!
//! Everything here is synchronous and deterministic. Persistence, HTTP and
//! logging live in `emporium-storefront`, which drives these types.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod contact;
pub mod locale;
pub mod types;

pub use cart::{CartAction, CartItem, CartState, CartTotals, ImageRef, ProductRef};
pub use checkout::{
    Address, BillingAddress, CheckoutError, CheckoutRequest, CustomerInfo, Order, OrderDraft,
    OrderLine, OrderTotals, PricingPolicy,
};
pub use contact::{ContactError, ContactMessage, ContactRequest};
pub use locale::{Locale, LocaleResolver, LocaleSettings, RouteDecision};
pub use types::*;
