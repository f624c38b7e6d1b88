//! Checkout: order totals and the order payload built from a cart.
//!
//! [`OrderTotals::compute`] is the only place tax and shipping are
//! calculated. The cart preview and order submission both call it, so the
//! totals a shopper sees are the totals that get stored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{CartItem, CartTotals};
use crate::types::{
    Email, OrderNumber, OrderStatus, PaymentMethod, PaymentStatus, ProductId, round_money,
};

/// Why a cart could not be turned into an order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("billing address is required when it differs from the shipping address")]
    BillingAddressRequired,
}

/// Tax and shipping rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Fraction of the subtotal charged as tax (`0.10` = 10%).
    pub tax_rate: Decimal,
    /// Shipping charged when the subtotal does not clear the threshold.
    pub flat_shipping: Decimal,
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            flat_shipping: Decimal::new(10, 0),
            free_shipping_threshold: Decimal::new(100, 0),
        }
    }
}

/// Subtotal, tax, shipping and grand total of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Apply `policy` to `subtotal`.
    ///
    /// ```
    /// use emporium_core::{OrderTotals, PricingPolicy};
    /// use rust_decimal::Decimal;
    ///
    /// let totals = OrderTotals::compute(Decimal::new(50, 0), &PricingPolicy::default());
    /// assert_eq!(totals.tax, Decimal::new(5, 0));
    /// assert_eq!(totals.shipping, Decimal::new(10, 0));
    /// assert_eq!(totals.total, Decimal::new(65, 0));
    /// ```
    #[must_use]
    pub fn compute(subtotal: Decimal, policy: &PricingPolicy) -> Self {
        let tax = round_money(subtotal * policy.tax_rate);
        let shipping = if subtotal > policy.free_shipping_threshold {
            Decimal::ZERO
        } else {
            policy.flat_shipping
        };
        Self {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}

/// One line of a placed order, priced at the time of purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: ProductId,
    pub quantity: u32,
    pub price: Decimal,
    pub total: Decimal,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.product.id.clone(),
            quantity: item.quantity,
            price: item.product.price,
            total: item.line_total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    fn validate(&self) -> Result<(), CheckoutError> {
        require(&self.street, "street")?;
        require(&self.city, "city")?;
        require(&self.state, "state")?;
        require(&self.postal_code, "postal_code")?;
        require(&self.country, "country")
    }
}

/// Billing details as entered: either "same as shipping" or a separate address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    #[serde(default = "default_true")]
    pub same_as_shipping: bool,
    #[serde(default)]
    pub address: Option<Address>,
}

impl Default for BillingAddress {
    fn default() -> Self {
        Self {
            same_as_shipping: true,
            address: None,
        }
    }
}

const fn default_true() -> bool {
    true
}

/// What the shopper submits at checkout. The items come from their cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer: CustomerInfo,
    pub shipping_address: Address,
    #[serde(default)]
    pub billing_address: BillingAddress,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A validated order ready to hand to the order store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer: CustomerInfo,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub items: Vec<OrderLine>,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub notes: Option<String>,
}

impl OrderDraft {
    /// Validate `request` and price `items` under `policy`.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the cart is empty, a required field is
    /// blank, or a separate billing address was asked for but not given.
    pub fn from_cart(
        items: &[CartItem],
        request: CheckoutRequest,
        policy: &PricingPolicy,
    ) -> Result<Self, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let CheckoutRequest {
            customer,
            shipping_address,
            billing_address,
            payment_method,
            notes,
        } = request;

        require(&customer.first_name, "first_name")?;
        require(&customer.last_name, "last_name")?;
        shipping_address.validate()?;

        let billing_address = if billing_address.same_as_shipping {
            shipping_address.clone()
        } else {
            let address = billing_address
                .address
                .ok_or(CheckoutError::BillingAddressRequired)?;
            address.validate()?;
            address
        };

        let subtotal = CartTotals::of(items).total_price;

        Ok(Self {
            customer,
            shipping_address,
            billing_address,
            items: items.iter().map(OrderLine::from).collect(),
            totals: OrderTotals::compute(subtotal, policy),
            payment_method,
            payment_status: PaymentStatus::Pending,
            status: OrderStatus::Pending,
            notes: notes.filter(|n| !n.trim().is_empty()),
        })
    }

    /// Stamp the draft with its order number and creation time.
    #[must_use]
    pub fn place(self, order_number: OrderNumber, created_at: DateTime<Utc>) -> Order {
        Order {
            order_number,
            created_at,
            draft: self,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: OrderNumber,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub draft: OrderDraft,
}

fn require(value: &str, field: &'static str) -> Result<(), CheckoutError> {
    if value.trim().is_empty() {
        Err(CheckoutError::MissingField(field))
    } else {
        Ok(())
    }
}
