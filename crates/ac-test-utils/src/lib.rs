//! Testing utilities for the admin customizer workspace
//!
//! Shared host fixtures, stores and handler setups.

#![allow(missing_docs)]

use ac_interface::{Interface, Sha256Nonce, NONCE_ACTION};
use ac_layout::{build, HostMenuItem, Layout, LiveWidget, MenuItem, SubmenuItem, WidgetArgs};
use ac_store::{LayoutStore, MemoryOptionStore, OptionStore, StoreError, StoreResult};
use serde_json::{Map, Value};

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_ROLE: &str = "editor";

pub type TestInterface = Interface<MemoryOptionStore, Sha256Nonce>;

pub fn core_host_menu() -> Vec<HostMenuItem> {
    vec![
        HostMenuItem::new("index.php").with_children(["index.php", "update-core.php"]),
        HostMenuItem::anonymous(),
        HostMenuItem::new("edit.php").with_children(["edit.php", "post-new.php", "edit-tags.php"]),
        HostMenuItem::new("upload.php").with_children(["upload.php", "media-new.php"]),
        HostMenuItem::new("users.php"),
        HostMenuItem::new("tools.php"),
    ]
}

pub fn core_snapshot() -> Vec<MenuItem> {
    build(&core_host_menu())
}

/// Core menu with a plugin item registered at `index`
pub fn snapshot_with_plugin(slug: &str, index: usize) -> Vec<MenuItem> {
    let mut tree = core_host_menu();
    tree.insert(index.min(tree.len()), HostMenuItem::new(slug));
    build(&tree)
}

pub fn core_widgets() -> Vec<LiveWidget> {
    vec![
        LiveWidget::new("dashboard_right_now", "At a Glance"),
        LiveWidget::new("dashboard_activity", "Activity"),
        LiveWidget::new("dashboard_quick_press", "Quick Draft").in_context("side"),
        LiveWidget::new("dashboard_primary", "News").in_context("side"),
    ]
}

pub fn sample_layout() -> Layout {
    Layout::with_menu(vec![
        MenuItem::new("index.php", 1).with_submenu(vec![
            SubmenuItem::new("index.php", 0),
            SubmenuItem::new("update-core.php", 1).removed(),
        ]),
        MenuItem::anonymous(2),
        MenuItem::new("edit.php", 0).with_submenu(vec![
            SubmenuItem::new("edit.php", 1),
            SubmenuItem::new("post-new.php", 0),
            SubmenuItem::new("edit-tags.php", 2),
        ]),
        MenuItem::new("upload.php", 4).removed().with_submenu(vec![
            SubmenuItem::new("upload.php", 0),
            SubmenuItem::new("media-new.php", 1),
        ]),
        MenuItem::new("users.php", 3),
        MenuItem::new("tools.php", 5).removed(),
    ])
    .with_widget(WidgetArgs::new("dashboard_activity").trashed())
    .with_widget(WidgetArgs::new("dashboard_quick_press").with_title("Jot it down"))
    .with_widget(WidgetArgs::plugin("text_1", "text").with_extra("text", Value::from("Hello")))
}

/// Encode a value the way the form transport does: every scalar a string,
/// every list an object keyed by index, missing values as `"false"`
pub fn form_encode(value: &Value) -> Value {
    match value {
        Value::Null => Value::String("false".to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Number(n) => Value::String(n.to_string()),
        Value::String(_) => value.clone(),
        Value::Array(items) => Value::Object(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), form_encode(item)))
                .collect::<Map<_, _>>(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), form_encode(v)))
                .collect(),
        ),
    }
}

/// Layout as the `menu` and `widgets` form fields of a save request
pub fn form_fields(layout: &Layout) -> (Value, Value) {
    let value = serde_json::to_value(layout).unwrap();
    (form_encode(&value["menu"]), form_encode(&value["widgets"]))
}

pub fn test_interface() -> TestInterface {
    Interface::new(
        LayoutStore::new(MemoryOptionStore::new()),
        Sha256Nonce::new(TEST_SECRET),
    )
}

pub fn valid_nonce() -> String {
    Sha256Nonce::new(TEST_SECRET).issue(NONCE_ACTION)
}

/// Option store whose writes and deletes always fail
#[derive(Debug, Default)]
pub struct FailingStore {
    pub inner: MemoryOptionStore,
}

impl FailingStore {
    pub fn with_option(key: &str, value: Value) -> Self {
        let inner = MemoryOptionStore::new();
        inner.update_option(key, &value).unwrap();
        Self { inner }
    }
}

impl OptionStore for FailingStore {
    fn get_option(&self, key: &str) -> StoreResult<Option<Value>> {
        self.inner.get_option(key)
    }

    fn update_option(&self, key: &str, _value: &Value) -> StoreResult<()> {
        Err(StoreError::rejected(key, "write refused"))
    }

    fn delete_option(&self, key: &str) -> StoreResult<bool> {
        Err(StoreError::rejected(key, "delete refused"))
    }
}
