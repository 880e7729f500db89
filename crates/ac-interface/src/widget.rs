//! Plugin-defined dashboard widget types
//!
//! A widget type renders two things: its dashboard output and its settings
//! form. Stored widgets reference their type through `ac_id`.

use ac_layout::{WidgetArgs, WidgetCatalog};
use indexmap::IndexMap;
use std::fmt::Write as _;
use std::sync::Arc;

/// Form field ids are `{type}_{instance}_{name}`
#[derive(Debug, Clone, Copy)]
pub struct FieldIds<'a> {
    type_id: &'a str,
    instance: u64,
}

impl FieldIds<'_> {
    /// Id of a named field
    #[must_use]
    pub fn id(&self, name: &str) -> String {
        format!("{}_{}_{}", self.type_id, self.instance, name)
    }
}

/// A kind of dashboard widget
pub trait WidgetType: Send + Sync {
    /// Type identifier stored in `ac_id`
    fn id(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    /// Dashboard HTML for one instance
    fn output(&self, args: &WidgetArgs) -> String;

    /// Settings form fields for one instance
    fn form(&self, _fields: FieldIds<'_>, _args: &WidgetArgs) -> String {
        "This widget has no options.".to_string()
    }
}

/// Registered widget types by id
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    types: IndexMap<String, Arc<dyn WidgetType>>,
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl WidgetRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in types
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(TextWidget);
        registry
    }

    /// Register a type, replacing any type with the same id
    pub fn register<W: WidgetType + 'static>(&mut self, widget: W) {
        let id = widget.id().to_string();
        if self.types.insert(id.clone(), Arc::new(widget)).is_some() {
            tracing::warn!("Widget type {} registered twice; keeping the latest", id);
        }
    }

    /// Look up a type
    #[must_use]
    pub fn get(&self, type_id: &str) -> Option<&Arc<dyn WidgetType>> {
        self.types.get(type_id)
    }

    /// Registered type ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of registered types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// No types registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl WidgetCatalog for WidgetRegistry {
    fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }
}

/// Wrap a type's form in the editor's form element
///
/// The instance number comes from the args' `widget_instance` field, which
/// the editor posts back with every form.
#[must_use]
pub fn render_form(widget: &dyn WidgetType, args: &WidgetArgs) -> String {
    let instance = args
        .extra
        .get("widget_instance")
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(0);
    let fields = FieldIds {
        type_id: widget.id(),
        instance,
    };

    let mut html = String::from("<form class=\"ac-widget-form\">");
    let _ = write!(
        html,
        "<input type=\"hidden\" name=\"widget_name\" value=\"{}\"/>\
         <input type=\"hidden\" name=\"widget_id\" value=\"{}\"/>\
         <input type=\"hidden\" name=\"widget_instance\" value=\"{}\"/>\
         <div class=\"ac-widget-form-custom\">{}</div></form>",
        escape_html(widget.name()),
        escape_html(widget.id()),
        instance,
        widget.form(fields, args)
    );
    html
}

/// Free-form text or HTML
#[derive(Debug, Clone, Copy, Default)]
pub struct TextWidget;

impl WidgetType for TextWidget {
    fn id(&self) -> &str {
        "text"
    }

    fn name(&self) -> &str {
        "Text"
    }

    fn output(&self, args: &WidgetArgs) -> String {
        args.extra
            .get("text")
            .and_then(|text| text.as_str())
            .unwrap_or_default()
            .to_string()
    }

    fn form(&self, fields: FieldIds<'_>, args: &WidgetArgs) -> String {
        let id = fields.id("text");
        format!(
            "<label for=\"{id}\">Text / HTML</label><br/><textarea id=\"{id}\" name=\"text\">{}</textarea>",
            escape_html(&self.output(args))
        )
    }
}

/// Escape text for an HTML attribute or element body
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}
