//! Cart persistence around the pure reducer in `emporium-core`.
//!
//! A [`CartHandle`] restores the shopper's cart from storage, applies actions
//! through [`CartState::apply`], and writes back whatever the action touched.
//! Storage problems never fail the request: reads fall back to an empty cart
//! and writes are logged and dropped.

pub mod storage;

use emporium_core::{CartAction, CartState};

pub use storage::{CartStorage, MemoryCartStorage, SessionCartStorage, StorageError, keys};

/// A cart bound to the storage it was restored from.
#[derive(Debug)]
pub struct CartHandle<S> {
    storage: S,
    state: CartState,
}

impl<S: CartStorage> CartHandle<S> {
    /// Restore the cart from `storage`.
    ///
    /// Missing, unreadable or corrupt data yields an empty, closed cart.
    pub async fn acquire(storage: S) -> Self {
        let items = match storage.load_items().await {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart, starting empty");
                Vec::new()
            }
        };

        let is_open = match storage.load_drawer().await {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart drawer state");
                false
            }
        };

        Self {
            storage,
            state: CartState::restore(items, is_open),
        }
    }

    /// Current cart state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Consume the handle, keeping only the state.
    #[must_use]
    pub fn into_state(self) -> CartState {
        self.state
    }

    /// Apply `action` and persist the parts of the cart it changed.
    pub async fn dispatch(&mut self, action: CartAction) -> &CartState {
        let persist_items = action.changes_items();
        let persist_drawer = action.changes_drawer();

        self.state = std::mem::take(&mut self.state).apply(action);

        if persist_items {
            if let Err(e) = self.storage.save_items(self.state.items()).await {
                tracing::warn!(error = %e, "Failed to persist cart items");
            }
        }

        if persist_drawer {
            if let Err(e) = self.storage.save_drawer(self.state.is_open()).await {
                tracing::warn!(error = %e, "Failed to persist cart drawer state");
            }
        }

        &self.state
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use emporium_core::ProductRef;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn lamp() -> ProductRef {
        ProductRef::new("p1", "Lamp", "lamp", Decimal::new(2500, 2))
    }

    #[tokio::test]
    async fn test_acquire_empty_storage() {
        let cart = CartHandle::acquire(MemoryCartStorage::new()).await;
        assert!(cart.state().is_empty());
        assert!(!cart.state().is_open());
    }

    #[tokio::test]
    async fn test_dispatch_persists_items_and_restores() {
        let storage = MemoryCartStorage::new();

        let mut cart = CartHandle::acquire(storage.clone()).await;
        cart.dispatch(CartAction::add(lamp(), 2)).await;
        cart.dispatch(CartAction::OpenCart).await;

        let restored = CartHandle::acquire(storage).await;
        assert_eq!(restored.state().total_items(), 2);
        assert_eq!(restored.state().total_price(), Decimal::new(5000, 2));
        assert!(restored.state().is_open());
    }

    #[tokio::test]
    async fn test_drawer_actions_leave_items_untouched() {
        let storage = MemoryCartStorage::new();
        let mut cart = CartHandle::acquire(storage.clone()).await;
        cart.dispatch(CartAction::ToggleCart).await;

        assert!(storage.get_raw(keys::CART_ITEMS).unwrap().is_none());
        assert_eq!(storage.get_raw(keys::CART_OPEN).unwrap(), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_corrupt_items_fall_back_to_empty() {
        let storage = MemoryCartStorage::new();
        storage
            .put_raw(keys::CART_ITEMS, json!({"not": "a list"}))
            .unwrap();

        let cart = CartHandle::acquire(storage).await;
        assert!(cart.state().is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_falls_back_to_empty() {
        let storage = MemoryCartStorage::new();
        let mut cart = CartHandle::acquire(storage.clone()).await;
        cart.dispatch(CartAction::add(lamp(), 1)).await;

        storage.fail_reads(true);
        let cart = CartHandle::acquire(storage).await;
        assert!(cart.state().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_in_memory_state() {
        let storage = MemoryCartStorage::new();
        storage.fail_writes(true);

        let mut cart = CartHandle::acquire(storage.clone()).await;
        let state = cart.dispatch(CartAction::add(lamp(), 3)).await;
        assert_eq!(state.total_items(), 3);

        storage.fail_writes(false);
        assert!(storage.get_raw(keys::CART_ITEMS).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restored_duplicates_are_merged() {
        let storage = MemoryCartStorage::new();
        let line = json!({
            "product": {"id": "p1", "title": "Lamp", "slug": "lamp", "price": "25.00"},
            "quantity": 1
        });
        storage
            .put_raw(keys::CART_ITEMS, json!([line.clone(), line]))
            .unwrap();

        let cart = CartHandle::acquire(storage).await;
        assert_eq!(cart.state().items().len(), 1);
        assert_eq!(cart.state().total_items(), 2);
    }
}
