//! Layout data model
//!
//! The persisted record for one role:
//!
//! ```text
//! {
//!   "menu":    [ { "slug", "position", "remove", "submenu": [ ... ] | false }, ... ],
//!   "widgets": { "<widget_id>": { "title"?, "trashed"?, "ac_id"?, ... }, ... }
//! }
//! ```

use crate::de;
use crate::error::LayoutResult;
use crate::normalize::normalize_booleans;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entry that occupies a slot in an ordered sibling sequence
///
/// Implemented by both menu levels so the reconciler can treat them alike.
pub trait Slotted: Clone {
    /// Stable identifier, if the host exposes one
    fn slug(&self) -> Option<&str>;

    /// Presentation index
    fn position(&self) -> u32;

    /// Overwrite the presentation index
    fn set_position(&mut self, position: u32);

    /// Hidden by the administrator
    fn is_removed(&self) -> bool;
}

/// Top-level menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Host identifier; `None` when the host item has none
    #[serde(default, deserialize_with = "de::loose_opt_string")]
    pub slug: Option<String>,

    /// Zero-based presentation index
    #[serde(deserialize_with = "de::loose_position")]
    pub position: u32,

    /// Hidden by the administrator
    #[serde(
        rename = "remove",
        alias = "removed",
        default,
        deserialize_with = "de::loose_bool"
    )]
    pub removed: bool,

    /// Child entries; `None` when the host item owns no child list
    #[serde(
        default,
        deserialize_with = "de::loose_opt_seq",
        serialize_with = "de::opt_seq_or_false"
    )]
    pub submenu: Option<Vec<SubmenuItem>>,
}

impl MenuItem {
    /// Visible entry without children
    #[inline]
    #[must_use]
    pub fn new(slug: impl Into<String>, position: u32) -> Self {
        Self {
            slug: Some(slug.into()),
            position,
            removed: false,
            submenu: None,
        }
    }

    /// Entry for a host item with no stable identifier
    #[inline]
    #[must_use]
    pub fn anonymous(position: u32) -> Self {
        Self {
            slug: None,
            position,
            removed: false,
            submenu: None,
        }
    }

    /// Mark hidden
    #[inline]
    #[must_use]
    pub fn removed(mut self) -> Self {
        self.removed = true;
        self
    }

    /// Attach children
    #[inline]
    #[must_use]
    pub fn with_submenu(mut self, submenu: Vec<SubmenuItem>) -> Self {
        self.submenu = Some(submenu);
        self
    }
}

impl Slotted for MenuItem {
    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }

    fn is_removed(&self) -> bool {
        self.removed
    }
}

/// Child menu entry, owned by exactly one [`MenuItem`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmenuItem {
    /// Host identifier; `None` when the host item has none
    #[serde(default, deserialize_with = "de::loose_opt_string")]
    pub slug: Option<String>,

    /// Zero-based presentation index among siblings
    #[serde(deserialize_with = "de::loose_position")]
    pub position: u32,

    /// Hidden by the administrator
    #[serde(
        rename = "remove",
        alias = "removed",
        default,
        deserialize_with = "de::loose_bool"
    )]
    pub removed: bool,
}

impl SubmenuItem {
    /// Visible child
    #[inline]
    #[must_use]
    pub fn new(slug: impl Into<String>, position: u32) -> Self {
        Self {
            slug: Some(slug.into()),
            position,
            removed: false,
        }
    }

    /// Mark hidden
    #[inline]
    #[must_use]
    pub fn removed(mut self) -> Self {
        self.removed = true;
        self
    }
}

impl Slotted for SubmenuItem {
    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }

    fn is_removed(&self) -> bool {
        self.removed
    }
}

/// Stored customization of one dashboard widget
///
/// Fields the host or a widget type defines beyond the known ones are kept
/// verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetArgs {
    /// Dashboard-wide widget identifier
    #[serde(default)]
    pub id: String,

    /// Title override
    #[serde(
        default,
        deserialize_with = "de::loose_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    /// Suppressed from the dashboard, configuration retained
    #[serde(default, deserialize_with = "de::loose_bool")]
    pub trashed: bool,

    /// Widget type for plugin-defined widgets
    #[serde(
        default,
        deserialize_with = "de::loose_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub ac_id: Option<String>,

    /// Opaque widget settings
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WidgetArgs {
    /// Args for a host widget
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            trashed: false,
            ac_id: None,
            extra: Map::new(),
        }
    }

    /// Args for a plugin-defined widget of the given type
    #[inline]
    #[must_use]
    pub fn plugin(id: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            ac_id: Some(type_id.into()),
            ..Self::new(id)
        }
    }

    /// Set title override
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark trashed
    #[inline]
    #[must_use]
    pub fn trashed(mut self) -> Self {
        self.trashed = true;
        self
    }

    /// Set an opaque setting
    #[inline]
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Defined by this plugin rather than the host
    #[inline]
    #[must_use]
    pub fn is_plugin_widget(&self) -> bool {
        self.ac_id.is_some()
    }

    /// Plugin widget the administrator asked to delete
    #[inline]
    #[must_use]
    pub fn is_pending_deletion(&self) -> bool {
        self.is_plugin_widget() && self.trashed
    }
}

/// Customization record for one role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LayoutRecord")]
pub struct Layout {
    /// Menu entries in captured host order
    pub menu: Vec<MenuItem>,

    /// Widget customizations keyed by widget id
    pub widgets: IndexMap<String, WidgetArgs>,
}

#[derive(Deserialize)]
struct LayoutRecord {
    #[serde(default, deserialize_with = "de::loose_seq")]
    menu: Vec<MenuItem>,
    #[serde(default, deserialize_with = "de::loose_map")]
    widgets: IndexMap<String, WidgetArgs>,
}

impl From<LayoutRecord> for Layout {
    fn from(record: LayoutRecord) -> Self {
        let widgets = record
            .widgets
            .into_iter()
            .map(|(id, mut args)| {
                if args.id.is_empty() {
                    args.id.clone_from(&id);
                }
                (id, args)
            })
            .collect();

        Self {
            menu: record.menu,
            widgets,
        }
    }
}

impl Layout {
    /// Create layout
    #[inline]
    #[must_use]
    pub fn new(menu: Vec<MenuItem>, widgets: IndexMap<String, WidgetArgs>) -> Self {
        Self { menu, widgets }
    }

    /// Layout with menu customizations only
    #[inline]
    #[must_use]
    pub fn with_menu(menu: Vec<MenuItem>) -> Self {
        Self {
            menu,
            widgets: IndexMap::new(),
        }
    }

    /// Add a widget customization keyed by its id
    #[must_use]
    pub fn with_widget(mut self, args: WidgetArgs) -> Self {
        self.widgets.insert(args.id.clone(), args);
        self
    }

    /// Nothing customized
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.menu.is_empty() && self.widgets.is_empty()
    }

    /// Decode the form-encoded `menu` and `widgets` fields of a save request
    ///
    /// Boolean-like strings are normalized first, at every depth.
    pub fn from_form(menu: Option<Value>, widgets: Option<Value>) -> LayoutResult<Self> {
        let mut record = Map::new();
        record.insert("menu".to_string(), menu.unwrap_or(Value::Bool(false)));
        record.insert("widgets".to_string(), widgets.unwrap_or(Value::Bool(false)));

        let mut value = Value::Object(record);
        normalize_booleans(&mut value);
        Ok(serde_json::from_value(value)?)
    }

    /// Normalize boolean-like strings inside opaque widget settings
    pub fn normalize_booleans(&mut self) {
        for args in self.widgets.values_mut() {
            args.extra.values_mut().for_each(normalize_booleans);
        }
    }

    /// Menu entries sorted by `position`, ties kept in captured order
    #[must_use]
    pub fn presentation_order(&self) -> Vec<&MenuItem> {
        let mut ordered: Vec<_> = self.menu.iter().collect();
        ordered.sort_by_key(|item| item.position);
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn menu_item_wire_shape() {
        let item = MenuItem::new("index.php", 0);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({ "slug": "index.php", "position": 0, "remove": false, "submenu": false })
        );
    }

    #[test]
    fn decodes_loose_stored_record() {
        let layout: Layout = serde_json::from_value(json!({
            "menu": [
                { "slug": "index.php", "position": "1", "remove": "false", "submenu": [
                    { "slug": "update-core.php", "position": 0, "remove": false }
                ] },
                { "slug": false, "position": 0, "remove": true, "submenu": false }
            ],
            "widgets": {
                "dashboard_activity": { "trashed": true }
            }
        }))
        .unwrap();

        assert_eq!(layout.menu.len(), 2);
        assert_eq!(layout.menu[0].position, 1);
        assert_eq!(layout.menu[0].submenu.as_ref().map(Vec::len), Some(1));
        assert_eq!(layout.menu[1].slug, None);
        assert!(layout.menu[1].removed);
        assert_eq!(layout.widgets["dashboard_activity"].id, "dashboard_activity");
        assert!(layout.widgets["dashboard_activity"].trashed);
    }

    #[test]
    fn empty_php_array_widgets() {
        let layout: Layout =
            serde_json::from_value(json!({ "menu": false, "widgets": [] })).unwrap();
        assert!(layout.is_empty());
    }

    #[test]
    fn widget_extra_round_trips() {
        let args = WidgetArgs::plugin("text_1", "text")
            .with_title("Notes")
            .with_extra("text", json!("hello"));
        let layout = Layout::default().with_widget(args.clone());

        let value = serde_json::to_value(&layout).unwrap();
        assert_eq!(value["widgets"]["text_1"]["text"], json!("hello"));
        assert_eq!(value["widgets"]["text_1"]["ac_id"], json!("text"));

        let back: Layout = serde_json::from_value(value).unwrap();
        assert_eq!(back.widgets["text_1"], args);
    }

    #[test]
    fn from_form_normalizes_nested_flags() {
        let layout = Layout::from_form(
            Some(json!([{ "slug": "edit.php", "position": "0", "remove": "true", "submenu": "false" }])),
            Some(json!({ "w": { "trashed": "false", "options": { "wide": "false" } } })),
        )
        .unwrap();

        assert!(layout.menu[0].removed);
        assert_eq!(layout.menu[0].submenu, None);
        assert!(!layout.widgets["w"].trashed);
        assert_eq!(layout.widgets["w"].extra["options"], json!({ "wide": false }));
    }

    #[test]
    fn normalize_booleans_in_typed_layout() {
        let mut layout = Layout::default()
            .with_widget(WidgetArgs::new("w").with_extra("options", json!({ "wide": "true" })));
        layout.normalize_booleans();
        assert_eq!(layout.widgets["w"].extra["options"], json!({ "wide": true }));
    }

    #[test]
    fn presentation_order_is_stable() {
        let layout = Layout::with_menu(vec![
            MenuItem::new("c", 2),
            MenuItem::new("a", 0),
            MenuItem::new("b", 2),
        ]);
        let slugs: Vec<_> = layout
            .presentation_order()
            .into_iter()
            .map(|item| item.slug.as_deref())
            .collect();
        assert_eq!(slugs, vec![Some("a"), Some("c"), Some("b")]);
    }

    #[test]
    fn pending_deletion_only_for_plugin_widgets() {
        assert!(WidgetArgs::plugin("t", "text").trashed().is_pending_deletion());
        assert!(!WidgetArgs::new("dashboard_quick_press").trashed().is_pending_deletion());
    }
}
