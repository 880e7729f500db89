//! Key-value option backends
//!
//! The host persists plugin state as named options holding serialized values.
//! [`OptionStore`] is that seam; [`MemoryOptionStore`] backs tests and
//! one-shot tools.

use crate::error::StoreResult;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Named option storage
///
/// Each call is atomic per key. Callers get no isolation across calls; the
/// last write wins.
pub trait OptionStore: Send + Sync {
    /// Read an option; `None` when it was never written
    fn get_option(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Create or overwrite an option
    fn update_option(&self, key: &str, value: &Value) -> StoreResult<()>;

    /// Delete an option; `false` when it did not exist
    fn delete_option(&self, key: &str) -> StoreResult<bool>;
}

impl<S: OptionStore + ?Sized> OptionStore for Arc<S> {
    fn get_option(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).get_option(key)
    }

    fn update_option(&self, key: &str, value: &Value) -> StoreResult<()> {
        (**self).update_option(key, value)
    }

    fn delete_option(&self, key: &str) -> StoreResult<bool> {
        (**self).delete_option(key)
    }
}

/// In-process option store
#[derive(Debug, Default)]
pub struct MemoryOptionStore {
    options: RwLock<HashMap<String, Value>>,
}

impl MemoryOptionStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored options
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.read().len()
    }

    /// No options stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.read().is_empty()
    }

    /// Raw value of an option, bypassing the trait
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Value> {
        self.options.read().get(key).cloned()
    }
}

impl OptionStore for MemoryOptionStore {
    fn get_option(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.raw(key))
    }

    fn update_option(&self, key: &str, value: &Value) -> StoreResult<()> {
        self.options.write().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete_option(&self, key: &str) -> StoreResult<bool> {
        Ok(self.options.write().remove(key).is_some())
    }
}
