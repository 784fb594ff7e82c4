//! Key-value persistence for budget data
//!
//! The domain services never touch storage directly. They receive a [`Store`],
//! a namespaced, typed view over any [`KeyValueStore`] backend:
//! - `MemoryStore` - process-local map (tests, ephemeral sessions)
//! - `FileStore` - single JSON file in the platform data directory
//!
//! Every record lives under its own key and is replaced wholesale on write.
//! There are no cross-key transactions; last write wins.

mod file;
mod memory;

pub use file::{default_store_path, FileStore};
pub use memory::MemoryStore;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::Money;

/// Default key prefix, matching the browser storage layout of the web app
pub const DEFAULT_NAMESPACE: &str = "ai_budget_";

/// Raw string key-value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// The records Jarbook persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Monthly income, plain number text
    Income,
    /// Monthly expenses, plain number text
    Expenses,
    /// Jar override, JSON `{nec,edu,res,inv,play,give}`
    JarConfig,
    /// JSON array of transactions, newest first
    Transactions,
    /// JSON array of goals
    Goals,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expenses => "expenses",
            Self::JarConfig => "jar_config",
            Self::Transactions => "transactions",
            Self::Goals => "goals",
        }
    }
}

/// Namespaced, typed access on top of a [`KeyValueStore`]
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl Store {
    pub fn new(inner: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            inner,
            namespace: namespace.to_string(),
        }
    }

    /// Fresh in-memory store with the default namespace
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), DEFAULT_NAMESPACE)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn full_key(&self, key: StoreKey) -> String {
        format!("{}{}", self.namespace, key.as_str())
    }

    pub fn get_raw(&self, key: StoreKey) -> Result<Option<String>> {
        self.inner.get(&self.full_key(key))
    }

    pub fn set_raw(&self, key: StoreKey, value: &str) -> Result<()> {
        self.inner.set(&self.full_key(key), value)
    }

    pub fn remove(&self, key: StoreKey) -> Result<()> {
        self.inner.remove(&self.full_key(key))
    }

    pub fn contains(&self, key: StoreKey) -> Result<bool> {
        Ok(self.get_raw(key)?.is_some())
    }

    /// Read a plain-text number
    ///
    /// Decimal text is accepted and truncated toward zero.
    pub fn get_number(&self, key: StoreKey) -> Result<Option<Money>> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if let Ok(value) = raw.parse::<Money>() {
            return Ok(Some(value));
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value.trunc() as Money)),
            _ => Err(Error::InvalidData(format!(
                "Stored value for {} is not a number: {}",
                key.as_str(),
                raw
            ))),
        }
    }

    pub fn set_number(&self, key: StoreKey, value: Money) -> Result<()> {
        self.set_raw(key, &value.to_string())
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json)
    }

    /// Load a JSON record, falling back to `default` when missing or unreadable
    ///
    /// A corrupt record is logged and left in place; it is overwritten by the
    /// next successful write.
    pub fn load_json_or<T: DeserializeOwned>(&self, key: StoreKey, default: T) -> T {
        match self.get_json(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Unreadable stored record, using default");
                default
            }
        }
    }

    /// Load a plain number, falling back to `default` when missing or unreadable
    pub fn load_number_or(&self, key: StoreKey, default: Money) -> Money {
        match self.get_number(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Unreadable stored number, using default");
                default
            }
        }
    }
}
