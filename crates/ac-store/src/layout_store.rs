//! Per-role layout persistence
//!
//! A role's layout lives in a single option, `{prefix}{role}`. It is written
//! whole on save and deleted whole on reset.

use crate::error::{StoreError, StoreResult};
use crate::option::OptionStore;
use ac_layout::{normalize_booleans, Layout};
use serde_json::Value;

/// Default option key prefix
pub const DEFAULT_PREFIX: &str = "ac_customize_";

/// Result of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// Record written
    Saved,
    /// Stored record already equal; nothing written
    Unchanged,
}

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Record removed
    Deleted,
    /// No record existed
    Missing,
}

/// Layout store over an option backend
#[derive(Debug)]
pub struct LayoutStore<S> {
    backend: S,
    prefix: String,
}

impl<S: OptionStore> LayoutStore<S> {
    /// Store using the default key prefix
    #[must_use]
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Set key prefix
    #[inline]
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Underlying backend
    #[inline]
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Option key for a role
    pub fn key(&self, role: &str) -> StoreResult<String> {
        if role.trim().is_empty() {
            return Err(StoreError::InvalidRole(role.to_string()));
        }
        Ok(format!("{}{}", self.prefix, role))
    }

    /// Stored layout for a role
    pub fn get(&self, role: &str) -> StoreResult<Option<Layout>> {
        let key = self.key(role)?;
        let Some(mut value) = self.backend.get_option(&key)? else {
            return Ok(None);
        };

        normalize_booleans(&mut value);
        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { key, source })
    }

    /// Write a role's layout
    ///
    /// Boolean-like strings are normalized before the comparison, so a
    /// payload differing from the stored record only in `"false"` versus
    /// `false` is [`PutOutcome::Unchanged`].
    pub fn put(&self, role: &str, layout: &Layout) -> StoreResult<PutOutcome> {
        let key = self.key(role)?;
        let mut layout = layout.clone();
        layout.normalize_booleans();

        match self.get(role) {
            Ok(Some(stored)) if stored == layout => {
                tracing::info!("Layout for role {} unchanged; skipping write", role);
                return Ok(PutOutcome::Unchanged);
            }
            Ok(_) => {}
            Err(StoreError::Corrupt { .. }) => {
                tracing::warn!("Overwriting corrupt layout record {}", key);
            }
            Err(e) => return Err(e),
        }

        let mut value = serde_json::to_value(&layout).map_err(|source| StoreError::Serialize {
            key: key.clone(),
            source,
        })?;
        normalize_booleans(&mut value);

        self.backend.update_option(&key, &value)?;
        tracing::info!("Saved layout for role {}", role);
        Ok(PutOutcome::Saved)
    }

    /// Delete a role's layout
    pub fn delete(&self, role: &str) -> StoreResult<DeleteOutcome> {
        let key = self.key(role)?;
        if self.backend.delete_option(&key)? {
            tracing::info!("Deleted layout for role {}", role);
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::Missing)
        }
    }

    /// Raw stored record, without decoding
    pub fn raw(&self, role: &str) -> StoreResult<Option<Value>> {
        self.backend.get_option(&self.key(role)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::MemoryOptionStore;
    use ac_layout::{MenuItem, WidgetArgs};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn layout() -> Layout {
        Layout::with_menu(vec![MenuItem::new("index.php", 1), MenuItem::new("edit.php", 0)])
            .with_widget(WidgetArgs::new("dashboard_activity").with_title("Recent"))
    }

    #[test]
    fn key_embeds_role() {
        let store = LayoutStore::new(MemoryOptionStore::new());
        assert_eq!(store.key("editor").unwrap(), "ac_customize_editor");
        assert!(matches!(store.key(" "), Err(StoreError::InvalidRole(_))));

        let custom = LayoutStore::new(MemoryOptionStore::new()).with_prefix("layout_");
        assert_eq!(custom.key("editor").unwrap(), "layout_editor");
    }

    #[test]
    fn put_get_delete() {
        let store = LayoutStore::new(MemoryOptionStore::new());

        assert_eq!(store.get("editor").unwrap(), None);
        assert_eq!(store.put("editor", &layout()).unwrap(), PutOutcome::Saved);
        assert_eq!(store.get("editor").unwrap(), Some(layout()));
        assert_eq!(store.get("author").unwrap(), None);

        assert_eq!(store.delete("editor").unwrap(), DeleteOutcome::Deleted);
        assert_eq!(store.delete("editor").unwrap(), DeleteOutcome::Missing);
    }

    #[test]
    fn identical_put_is_unchanged() {
        let store = LayoutStore::new(MemoryOptionStore::new());
        store.put("editor", &layout()).unwrap();
        assert_eq!(store.put("editor", &layout()).unwrap(), PutOutcome::Unchanged);

        let mut edited = layout();
        edited.menu[0].removed = true;
        assert_eq!(store.put("editor", &edited).unwrap(), PutOutcome::Saved);
    }

    #[test]
    fn string_flags_compare_equal_to_booleans() {
        let store = LayoutStore::new(MemoryOptionStore::new());
        let stored = Layout::default()
            .with_widget(WidgetArgs::new("w").with_extra("options", json!({ "wide": false })));
        store.put("editor", &stored).unwrap();

        let incoming = Layout::default()
            .with_widget(WidgetArgs::new("w").with_extra("options", json!({ "wide": "false" })));
        assert_eq!(store.put("editor", &incoming).unwrap(), PutOutcome::Unchanged);
    }

    #[test]
    fn persisted_shape_uses_real_booleans() {
        let store = LayoutStore::new(MemoryOptionStore::new());
        let incoming = Layout::default()
            .with_widget(WidgetArgs::new("w").with_extra("collapsed", json!("true")));
        store.put("editor", &incoming).unwrap();

        let raw = store.backend().raw("ac_customize_editor").unwrap();
        assert_eq!(raw["widgets"]["w"]["collapsed"], json!(true));
        assert_eq!(raw["widgets"]["w"]["trashed"], json!(false));
    }

    #[test]
    fn corrupt_record_surfaces_on_get_and_is_replaced_on_put() {
        let backend = MemoryOptionStore::new();
        backend
            .update_option("ac_customize_editor", &json!({ "menu": [{ "position": "x" }] }))
            .unwrap();
        let store = LayoutStore::new(backend);

        assert!(matches!(store.get("editor"), Err(StoreError::Corrupt { .. })));
        assert_eq!(store.put("editor", &layout()).unwrap(), PutOutcome::Saved);
        assert_eq!(store.get("editor").unwrap(), Some(layout()));
    }
}
