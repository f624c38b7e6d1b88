//! Client-scoped cart persistence.
//!
//! The cart lives in the shopper's session: one key holds the serialized
//! line items, another the drawer flag. The session cookie scopes both to
//! a single client, so two tabs sharing a cookie share (and race on) the
//! same cart; the last write wins.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use emporium_core::CartItem;
use serde_json::Value;
use thiserror::Error;
use tower_sessions::Session;

/// Session keys for cart data.
pub mod keys {
    /// Serialized `Vec<CartItem>`, insertion order.
    pub const CART_ITEMS: &str = "ecommerce-cart";

    /// Whether the cart drawer is open.
    pub const CART_OPEN: &str = "ecommerce-cart-open";
}

/// Failure reading or writing persisted cart data.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("corrupt cart data: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable, client-local key-value storage for a cart.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Persisted line items, or `None` if nothing was ever saved.
    async fn load_items(&self) -> Result<Option<Vec<CartItem>>, StorageError>;

    /// Overwrite the persisted line items.
    async fn save_items(&self, items: &[CartItem]) -> Result<(), StorageError>;

    /// Persisted drawer flag, or `None` if nothing was ever saved.
    async fn load_drawer(&self) -> Result<Option<bool>, StorageError>;

    /// Overwrite the persisted drawer flag.
    async fn save_drawer(&self, is_open: bool) -> Result<(), StorageError>;
}

/// Cart storage backed by the request's `tower-sessions` session.
#[derive(Debug, Clone)]
pub struct SessionCartStorage {
    session: Session,
}

impl SessionCartStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CartStorage for SessionCartStorage {
    async fn load_items(&self) -> Result<Option<Vec<CartItem>>, StorageError> {
        let raw: Option<Value> = self.session.get(keys::CART_ITEMS).await?;
        raw.map(serde_json::from_value::<Vec<CartItem>>)
            .transpose()
            .map_err(Into::into)
    }

    async fn save_items(&self, items: &[CartItem]) -> Result<(), StorageError> {
        self.session.insert(keys::CART_ITEMS, items).await?;
        Ok(())
    }

    async fn load_drawer(&self) -> Result<Option<bool>, StorageError> {
        Ok(self.session.get(keys::CART_OPEN).await?)
    }

    async fn save_drawer(&self, is_open: bool) -> Result<(), StorageError> {
        self.session.insert(keys::CART_OPEN, is_open).await?;
        Ok(())
    }
}

/// In-process cart storage, with switches to simulate a failing backend.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    values: Arc<Mutex<HashMap<&'static str, Value>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Store a raw value under `key`, bypassing serialization.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the map lock is poisoned.
    pub fn put_raw(&self, key: &'static str, value: Value) -> Result<(), StorageError> {
        self.lock()?.insert(key, value);
        Ok(())
    }

    /// Read the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the map lock is poisoned.
    pub fn get_raw(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<&'static str, Value>>, StorageError> {
        self.values
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("{op} disabled")));
        }
        Ok(())
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        Self::check(&self.fail_reads, "reads")?;
        self.get_raw(key)?
            .map(serde_json::from_value::<T>)
            .transpose()
            .map_err(Into::into)
    }

    fn write<T>(&self, key: &'static str, value: &T) -> Result<(), StorageError>
    where
        T: serde::Serialize + ?Sized,
    {
        Self::check(&self.fail_writes, "writes")?;
        let value = serde_json::to_value(value)?;
        self.put_raw(key, value)
    }
}

#[async_trait]
impl CartStorage for MemoryCartStorage {
    async fn load_items(&self) -> Result<Option<Vec<CartItem>>, StorageError> {
        self.read(keys::CART_ITEMS)
    }

    async fn save_items(&self, items: &[CartItem]) -> Result<(), StorageError> {
        self.write(keys::CART_ITEMS, items)
    }

    async fn load_drawer(&self) -> Result<Option<bool>, StorageError> {
        self.read(keys::CART_OPEN)
    }

    async fn save_drawer(&self, is_open: bool) -> Result<(), StorageError> {
        self.write(keys::CART_OPEN, &is_open)
    }
}
