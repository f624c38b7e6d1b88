//! Shopping cart state machine.
//!
//! The cart is a single [`CartState`] value changed only by applying a
//! [`CartAction`] through [`reduce`]. Every action that touches the line
//! items recomputes the totals with a full fold over the items, so the
//! derived fields can never drift from the items they summarize.
//!
//! ```
//! use emporium_core::{CartAction, CartState, ProductRef};
//! use rust_decimal::Decimal;
//!
//! let lamp = ProductRef::new("p1", "Desk Lamp", "desk-lamp", Decimal::new(10, 0));
//! let state = CartState::default()
//!     .apply(CartAction::add(lamp.clone(), 2))
//!     .apply(CartAction::add(lamp, 3));
//!
//! assert_eq!(state.items().len(), 1);
//! assert_eq!(state.total_items(), 5);
//! assert_eq!(state.total_price(), Decimal::new(50, 0));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::checkout::{OrderTotals, PricingPolicy};
use crate::types::ProductId;

/// An image attached to a product, carried for cart display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// The product data a cart line needs to render and price itself.
///
/// This is a snapshot taken when the product was added; later catalog
/// changes do not reach into existing carts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub sku: Option<String>,
    /// Unit price, never negative.
    #[serde(deserialize_with = "non_negative_price")]
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl ProductRef {
    /// Build a product reference with no SKU or images.
    ///
    /// Negative prices are clamped to zero.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        slug: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            sku: None,
            price: price.max(Decimal::ZERO),
            images: Vec::new(),
        }
    }
}

fn non_negative_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let price = <Decimal as Deserialize>::deserialize(deserializer)?;
    if price < Decimal::ZERO {
        return Err(de::Error::custom(format!("price {price} is negative")));
    }
    Ok(price)
}

/// A cart line: one product and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: ProductRef,
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line (`quantity × unit price`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// A request to change the cart.
///
/// On the wire this is tagged by `type`, e.g.
/// `{"type": "REMOVE_ITEM", "product_id": "p1"}`. Any tag not listed here
/// decodes to [`CartAction::Unknown`], which the reducer ignores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartAction {
    AddItem {
        product: ProductRef,
        quantity: u32,
    },
    RemoveItem {
        product_id: ProductId,
    },
    /// A quantity of zero or less removes the line.
    UpdateQuantity {
        product_id: ProductId,
        quantity: i64,
    },
    ClearCart,
    OpenCart,
    CloseCart,
    ToggleCart,
    /// Replace the items wholesale, e.g. when restoring from storage.
    LoadCart {
        items: Vec<CartItem>,
    },
    #[serde(other)]
    Unknown,
}

impl CartAction {
    /// Shorthand for [`CartAction::AddItem`].
    #[must_use]
    pub const fn add(product: ProductRef, quantity: u32) -> Self {
        Self::AddItem { product, quantity }
    }

    /// Shorthand for [`CartAction::RemoveItem`].
    #[must_use]
    pub fn remove(product_id: impl Into<ProductId>) -> Self {
        Self::RemoveItem {
            product_id: product_id.into(),
        }
    }

    /// Shorthand for [`CartAction::UpdateQuantity`].
    #[must_use]
    pub fn update(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self::UpdateQuantity {
            product_id: product_id.into(),
            quantity,
        }
    }

    /// Whether this action can change the line items (and therefore needs
    /// to be persisted).
    #[must_use]
    pub const fn changes_items(&self) -> bool {
        matches!(
            self,
            Self::AddItem { .. }
                | Self::RemoveItem { .. }
                | Self::UpdateQuantity { .. }
                | Self::ClearCart
                | Self::LoadCart { .. }
        )
    }

    /// Whether this action changes the drawer visibility.
    #[must_use]
    pub const fn changes_drawer(&self) -> bool {
        matches!(self, Self::OpenCart | Self::CloseCart | Self::ToggleCart)
    }
}

/// Totals derived from a list of cart items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartTotals {
    pub total_items: u32,
    pub total_price: Decimal,
}

impl CartTotals {
    /// Fold over `items` to compute item count and price.
    #[must_use]
    pub fn of(items: &[CartItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            total_items: acc.total_items.saturating_add(item.quantity),
            total_price: acc.total_price + item.line_total(),
        })
    }
}

/// The cart of one shopping session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CartState {
    items: Vec<CartItem>,
    is_open: bool,
    total_items: u32,
    total_price: Decimal,
}

impl CartState {
    /// Build a state from persisted items and drawer flag.
    #[must_use]
    pub fn restore(items: Vec<CartItem>, is_open: bool) -> Self {
        let state = Self {
            is_open,
            ..Self::default()
        };
        reduce(state, CartAction::LoadCart { items })
    }

    /// Apply an action, returning the next state.
    #[must_use]
    pub fn apply(self, action: CartAction) -> Self {
        reduce(self, action)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart drawer is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Sum of all quantities.
    #[must_use]
    pub const fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Sum of all line totals.
    #[must_use]
    pub const fn total_price(&self) -> Decimal {
        self.total_price
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }

    /// Tax, shipping and grand total the cart would check out at.
    #[must_use]
    pub fn order_totals(&self, policy: &PricingPolicy) -> OrderTotals {
        OrderTotals::compute(self.total_price, policy)
    }

    fn with_items(mut self, items: Vec<CartItem>) -> Self {
        let totals = CartTotals::of(&items);
        self.items = items;
        self.total_items = totals.total_items;
        self.total_price = totals.total_price;
        self
    }
}

/// The cart reducer: current state plus action gives the next state.
#[must_use]
pub fn reduce(mut state: CartState, action: CartAction) -> CartState {
    match action {
        CartAction::AddItem { quantity: 0, .. } | CartAction::Unknown => state,
        CartAction::AddItem { product, quantity } => {
            let mut items = std::mem::take(&mut state.items);
            match items.iter_mut().find(|item| item.product.id == product.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
                None => items.push(CartItem { product, quantity }),
            }
            state.with_items(items)
        }
        CartAction::RemoveItem { product_id } => {
            let items = std::mem::take(&mut state.items)
                .into_iter()
                .filter(|item| item.product.id != product_id)
                .collect();
            state.with_items(items)
        }
        CartAction::UpdateQuantity {
            product_id,
            quantity,
        } if quantity <= 0 => reduce(state, CartAction::RemoveItem { product_id }),
        CartAction::UpdateQuantity {
            product_id,
            quantity,
        } => {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            let mut items = std::mem::take(&mut state.items);
            if let Some(existing) = items.iter_mut().find(|item| item.product.id == product_id) {
                existing.quantity = quantity;
            }
            state.with_items(items)
        }
        CartAction::ClearCart => state.with_items(Vec::new()),
        CartAction::OpenCart => CartState {
            is_open: true,
            ..state
        },
        CartAction::CloseCart => CartState {
            is_open: false,
            ..state
        },
        CartAction::ToggleCart => {
            let is_open = !state.is_open;
            CartState { is_open, ..state }
        }
        CartAction::LoadCart { items } => state.with_items(normalize(items)),
    }
}

/// Drop empty lines and merge duplicate product ids, keeping first-seen
/// order.
fn normalize(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut merged: Vec<CartItem> = Vec::with_capacity(items.len());
    for item in items.into_iter().filter(|item| item.quantity > 0) {
        match merged.iter_mut().find(|m| m.product.id == item.product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => merged.push(item),
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn product(id: &str, price: i64) -> ProductRef {
        ProductRef::new(id, format!("Product {id}"), id, Decimal::new(price, 0))
    }

    fn assert_consistent(state: &CartState) {
        let quantity: u32 = state.items().iter().map(|i| i.quantity).sum();
        let price: Decimal = state
            .items()
            .iter()
            .map(|i| i.product.price * Decimal::from(i.quantity))
            .sum();
        assert_eq!(state.total_items(), quantity);
        assert_eq!(state.total_price(), price);

        let ids: HashSet<_> = state.items().iter().map(|i| &i.product.id).collect();
        assert_eq!(ids.len(), state.items().len(), "duplicate product ids");
    }

    #[test]
    fn test_add_item_merges_by_product_id() {
        let state = CartState::default()
            .apply(CartAction::add(product("p1", 10), 2))
            .apply(CartAction::add(product("p1", 10), 3));

        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].quantity, 5);
        assert_eq!(state.total_items(), 5);
        assert_eq!(state.total_price(), Decimal::new(50, 0));
    }

    #[test]
    fn test_add_item_appends_in_insertion_order() {
        let state = CartState::default()
            .apply(CartAction::add(product("b", 1), 1))
            .apply(CartAction::add(product("a", 2), 1))
            .apply(CartAction::add(product("b", 1), 1));

        let ids: Vec<_> = state.items().iter().map(|i| i.product.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_consistent(&state);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let state = CartState::default().apply(CartAction::add(product("p1", 10), 0));
        assert!(state.is_empty());
        assert_eq!(state.total_items(), 0);
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let base = CartState::default()
            .apply(CartAction::add(product("p1", 10), 2))
            .apply(CartAction::add(product("p2", 4), 1));

        let updated = base.clone().apply(CartAction::update("p1", 0));
        let removed = base.clone().apply(CartAction::remove("p1"));
        assert_eq!(updated, removed);
        assert!(updated.item(&ProductId::new("p1")).is_none());

        let negative = base.apply(CartAction::update("p1", -3));
        assert_eq!(negative, removed);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let state = CartState::default()
            .apply(CartAction::add(product("p1", 10), 2))
            .apply(CartAction::update("p1", 7));

        assert_eq!(state.total_items(), 7);
        assert_eq!(state.total_price(), Decimal::new(70, 0));
    }

    #[test]
    fn test_update_missing_product_is_noop() {
        let base = CartState::default().apply(CartAction::add(product("p1", 10), 2));
        let state = base.clone().apply(CartAction::update("nope", 4));
        assert_eq!(state, base);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let base = CartState::default().apply(CartAction::add(product("p1", 10), 1));
        assert_eq!(base.clone().apply(CartAction::remove("p9")), base);
    }

    #[test]
    fn test_clear_resets_totals_but_not_drawer() {
        let state = CartState::default()
            .apply(CartAction::OpenCart)
            .apply(CartAction::add(product("p1", 10), 2))
            .apply(CartAction::ClearCart);

        assert!(state.is_empty());
        assert_eq!(state.total_items(), 0);
        assert_eq!(state.total_price(), Decimal::ZERO);
        assert!(state.is_open());
    }

    #[test]
    fn test_drawer_actions_leave_items_alone() {
        let base = CartState::default().apply(CartAction::add(product("p1", 10), 2));

        let opened = base.clone().apply(CartAction::OpenCart);
        assert!(opened.is_open());
        assert_eq!(opened.items(), base.items());

        let toggled = opened.apply(CartAction::ToggleCart);
        assert!(!toggled.is_open());
        let toggled = toggled.apply(CartAction::ToggleCart);
        assert!(toggled.is_open());

        let closed = toggled.apply(CartAction::CloseCart);
        assert!(!closed.is_open());
        assert_eq!(closed.total_price(), base.total_price());
    }

    #[test]
    fn test_unknown_action_leaves_state_unchanged() {
        let base = CartState::default().apply(CartAction::add(product("p1", 10), 2));
        let action: CartAction = serde_json::from_str(r#"{"type": "APPLY_COUPON"}"#).unwrap();
        assert_eq!(action, CartAction::Unknown);
        assert_eq!(base.clone().apply(action), base);
    }

    #[test]
    fn test_action_wire_format() {
        let action: CartAction =
            serde_json::from_str(r#"{"type": "UPDATE_QUANTITY", "product_id": "p1", "quantity": 3}"#)
                .unwrap();
        assert_eq!(action, CartAction::update("p1", 3));
    }

    #[test]
    fn test_load_cart_round_trip_reproduces_totals() {
        let state = CartState::default()
            .apply(CartAction::add(product("p1", 10), 2))
            .apply(CartAction::add(product("p2", 3), 4))
            .apply(CartAction::update("p1", 5));

        let json = serde_json::to_string(state.items()).unwrap();
        let items: Vec<CartItem> = serde_json::from_str(&json).unwrap();
        let restored = CartState::default().apply(CartAction::LoadCart { items });

        assert_eq!(restored.items(), state.items());
        assert_eq!(restored.total_items(), state.total_items());
        assert_eq!(restored.total_price(), state.total_price());
    }

    #[test]
    fn test_load_cart_normalizes_corrupt_items() {
        let items = vec![
            CartItem { product: product("p1", 10), quantity: 1 },
            CartItem { product: product("p2", 5), quantity: 0 },
            CartItem { product: product("p1", 10), quantity: 2 },
        ];
        let state = CartState::restore(items, false);

        assert_eq!(state.items().len(), 1);
        assert_eq!(state.total_items(), 3);
        assert_consistent(&state);
    }

    #[test]
    fn test_negative_price_rejected_on_decode() {
        let ok: ProductRef =
            serde_json::from_str(r#"{"id": "p1", "title": "Lamp", "slug": "lamp", "price": "0"}"#)
                .unwrap();
        assert_eq!(ok.price, Decimal::ZERO);

        let err = serde_json::from_str::<ProductRef>(
            r#"{"id": "p1", "title": "Lamp", "slug": "lamp", "price": "-5.00"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("negative"));

        assert_eq!(
            ProductRef::new("p1", "Lamp", "lamp", Decimal::new(-5, 0)).price,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_quantities_saturate() {
        let state = CartState::default()
            .apply(CartAction::add(product("p1", 0), u32::MAX))
            .apply(CartAction::add(product("p1", 0), 5))
            .apply(CartAction::add(product("p2", 0), 1));
        assert_eq!(state.items()[0].quantity, u32::MAX);
        assert_eq!(state.total_items(), u32::MAX);
    }

    #[test]
    fn test_totals_hold_for_random_action_sequences() {
        let mut rng = StdRng::seed_from_u64(0x00C0_FFEE);
        let catalog: Vec<ProductRef> = (0..6)
            .map(|i| {
                ProductRef::new(
                    format!("p{i}"),
                    format!("Product {i}"),
                    format!("product-{i}"),
                    Decimal::new(rng.random_range(0..10_000), 2),
                )
            })
            .collect();

        for _ in 0..50 {
            let mut state = CartState::default();
            for _ in 0..40 {
                let product = catalog[rng.random_range(0..catalog.len())].clone();
                let action = match rng.random_range(0..4) {
                    0 => CartAction::add(product, rng.random_range(0..5)),
                    1 => CartAction::remove(product.id),
                    2 => CartAction::update(product.id, rng.random_range(-2..8)),
                    _ => CartAction::ToggleCart,
                };
                state = state.apply(action);
                assert_consistent(&state);
            }
        }
    }
}
