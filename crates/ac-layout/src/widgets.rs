//! Dashboard widget reconciliation
//!
//! Widgets are keyed by id rather than position, so reconciling them is a
//! merge: the host registry decides which widgets exist, stored args decide
//! how they look and whether they show.

use crate::model::WidgetArgs;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Widget the host registered for this request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveWidget {
    /// Dashboard-wide identifier
    pub id: String,
    /// Title the host registered
    pub title: String,
    /// Dashboard column (`normal`, `side`, ...)
    #[serde(default = "default_context")]
    pub context: String,
}

fn default_context() -> String {
    "normal".to_string()
}

impl LiveWidget {
    /// Widget in the main column
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            context: default_context(),
        }
    }

    /// Set column
    #[inline]
    #[must_use]
    pub fn in_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

/// Lookup of plugin-defined widget types
pub trait WidgetCatalog {
    /// A widget type with this id is registered
    fn contains(&self, type_id: &str) -> bool;
}

impl WidgetCatalog for [&str] {
    fn contains(&self, type_id: &str) -> bool {
        self.iter().any(|known| *known == type_id)
    }
}

/// Merge stored customizations into the live widget list
///
/// Every live widget appears once, in live order, starting from its live
/// `{id, title}`; stored fields override. Stored entries for widgets that are
/// not live are left out.
#[must_use]
pub fn reconcile_widgets(
    stored: &IndexMap<String, WidgetArgs>,
    live: &[LiveWidget],
) -> IndexMap<String, WidgetArgs> {
    live.iter()
        .map(|widget| {
            let mut args = WidgetArgs::new(widget.id.clone()).with_title(widget.title.clone());
            if let Some(saved) = stored.get(&widget.id) {
                if saved.title.is_some() {
                    args.title.clone_from(&saved.title);
                }
                args.trashed = saved.trashed;
                args.ac_id.clone_from(&saved.ac_id);
                args.extra.extend(saved.extra.clone());
            }
            (widget.id.clone(), args)
        })
        .collect()
}

/// Widget the host should render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShownWidget {
    /// Identifier
    pub id: String,
    /// Title after overrides
    pub title: String,
    /// Column
    pub context: String,
}

/// What to do with the dashboard for this request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardPlan {
    /// Live widgets to render, retitled where customized
    pub shown: Vec<ShownWidget>,
    /// Live widgets the administrator trashed
    pub suppressed: Vec<String>,
    /// Stored plugin widgets to add to the dashboard
    pub added: Vec<WidgetArgs>,
    /// Stored plugin widgets whose type is no longer registered
    pub skipped: Vec<String>,
}

/// Plan the dashboard from stored widget args
///
/// Stored entries that are neither live nor plugin-defined are ignored.
#[must_use]
pub fn plan_dashboard<C>(
    stored: &IndexMap<String, WidgetArgs>,
    live: &[LiveWidget],
    catalog: &C,
) -> DashboardPlan
where
    C: WidgetCatalog + ?Sized,
{
    let mut plan = DashboardPlan::default();

    for widget in live {
        let saved = stored.get(&widget.id);
        if saved.is_some_and(|args| args.trashed) {
            plan.suppressed.push(widget.id.clone());
            continue;
        }
        plan.shown.push(ShownWidget {
            id: widget.id.clone(),
            title: saved
                .and_then(|args| args.title.clone())
                .unwrap_or_else(|| widget.title.clone()),
            context: widget.context.clone(),
        });
    }

    let is_live = |id: &str| live.iter().any(|widget| widget.id == id);
    for (id, args) in stored {
        let Some(type_id) = args.ac_id.as_deref() else {
            continue;
        };
        if is_live(id) || args.trashed {
            continue;
        }
        if catalog.contains(type_id) {
            plan.added.push(args.clone());
        } else {
            tracing::warn!("Widget {} has unregistered type {}; skipping", id, type_id);
            plan.skipped.push(id.clone());
        }
    }

    plan
}

/// Drop plugin widgets the administrator trashed
///
/// Host widgets stay with `trashed = true` so they can be restored. Returns
/// the ids that were removed.
pub fn purge_trashed_plugin_widgets(widgets: &mut IndexMap<String, WidgetArgs>) -> Vec<String> {
    let purged: Vec<String> = widgets
        .iter()
        .filter(|(_, args)| args.is_pending_deletion())
        .map(|(id, _)| id.clone())
        .collect();

    widgets.retain(|_, args| !args.is_pending_deletion());
    if !purged.is_empty() {
        tracing::debug!("Purged trashed plugin widgets: {:?}", purged);
    }
    purged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn live() -> Vec<LiveWidget> {
        vec![
            LiveWidget::new("dashboard_right_now", "At a Glance"),
            LiveWidget::new("dashboard_activity", "Activity"),
            LiveWidget::new("dashboard_quick_press", "Quick Draft").in_context("side"),
        ]
    }

    fn stored() -> IndexMap<String, WidgetArgs> {
        [
            WidgetArgs::new("dashboard_activity").trashed(),
            WidgetArgs::new("dashboard_quick_press").with_title("Jot"),
            WidgetArgs::new("gone_widget").with_title("Old"),
            WidgetArgs::plugin("text_1", "text").with_extra("text", json!("hi")),
            WidgetArgs::plugin("chart_1", "chart"),
            WidgetArgs::plugin("text_2", "text").trashed(),
        ]
        .into_iter()
        .map(|args| (args.id.clone(), args))
        .collect()
    }

    #[test]
    fn reconcile_keeps_live_order_and_stored_overrides() {
        let merged = reconcile_widgets(&stored(), &live());

        assert_eq!(
            merged.keys().collect::<Vec<_>>(),
            vec!["dashboard_right_now", "dashboard_activity", "dashboard_quick_press"]
        );
        assert_eq!(merged["dashboard_right_now"].title.as_deref(), Some("At a Glance"));
        assert!(merged["dashboard_activity"].trashed);
        assert_eq!(merged["dashboard_activity"].title.as_deref(), Some("Activity"));
        assert_eq!(merged["dashboard_quick_press"].title.as_deref(), Some("Jot"));
    }

    #[test]
    fn plan_suppresses_retitles_and_adds() {
        let catalog: &[&str] = &["text"];
        let plan = plan_dashboard(&stored(), &live(), catalog);

        assert_eq!(plan.suppressed, vec!["dashboard_activity".to_string()]);
        assert_eq!(
            plan.shown
                .iter()
                .map(|w| (w.id.as_str(), w.title.as_str(), w.context.as_str()))
                .collect::<Vec<_>>(),
            vec![
                ("dashboard_right_now", "At a Glance", "normal"),
                ("dashboard_quick_press", "Jot", "side"),
            ]
        );
        assert_eq!(plan.added.len(), 1);
        assert_eq!(plan.added[0].id, "text_1");
        assert_eq!(plan.skipped, vec!["chart_1".to_string()]);
    }

    #[test]
    fn purge_removes_only_trashed_plugin_widgets() {
        let mut widgets = stored();
        widgets.insert("text_3".into(), WidgetArgs::plugin("text_3", "text"));

        let purged = purge_trashed_plugin_widgets(&mut widgets);

        assert_eq!(purged, vec!["text_2".to_string()]);
        assert!(widgets["dashboard_activity"].trashed);
        assert!(widgets.contains_key("text_3"));
        assert!(!widgets.contains_key("text_2"));
    }

    #[test]
    fn nothing_stored() {
        let empty = IndexMap::new();
        let catalog: &[&str] = &[];
        let plan = plan_dashboard(&empty, &live(), catalog);
        assert_eq!(plan.shown.len(), 3);
        assert!(plan.suppressed.is_empty() && plan.added.is_empty());
    }
}
