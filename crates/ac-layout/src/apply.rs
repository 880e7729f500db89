//! Applying a reconciled layout to the host menu
//!
//! Produces the order in which the host should render its menu and the items
//! it should hide. Customized entries come first, sorted by their stored
//! position; live items no entry covers keep their host order after them.

use crate::model::{Layout, MenuItem, Slotted};
use crate::reconcile::{reconcile_detailed, Reconciliation, Slot};
use serde::Serialize;

/// Child as it should be rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedSubmenuItem {
    /// Host identifier
    pub slug: Option<String>,
    /// Index among the live children
    pub live_index: usize,
}

/// Top-level item as it should be rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMenuItem {
    /// Host identifier
    pub slug: Option<String>,
    /// Index in the live snapshot
    pub live_index: usize,
    /// Visible children in render order
    pub submenu: Vec<PlannedSubmenuItem>,
}

/// Item the host should not render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiddenItem {
    /// Live index of the parent for hidden children
    pub parent: Option<usize>,
    /// Host identifier
    pub slug: Option<String>,
    /// Live index among its siblings
    pub live_index: usize,
}

/// Render instructions for the host menu
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuPlan {
    /// Visible items in render order
    pub items: Vec<PlannedMenuItem>,
    /// Items removed by the administrator
    pub hidden: Vec<HiddenItem>,
}

impl MenuPlan {
    /// Visible top-level slugs in render order
    #[must_use]
    pub fn order(&self) -> Vec<Option<&str>> {
        self.items.iter().map(|item| item.slug.as_deref()).collect()
    }

    /// Item is rendered
    #[must_use]
    pub fn is_visible(&self, slug: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.slug.as_deref() == Some(slug))
    }
}

/// Plan the host menu from a stored layout and a live snapshot
#[must_use]
pub fn plan(stored: Option<&Layout>, live: &[MenuItem]) -> MenuPlan {
    let reconciliation = stored
        .filter(|layout| !layout.menu.is_empty())
        .map(|layout| reconcile_detailed(&layout.menu, live))
        .unwrap_or_default();
    plan_menu(&reconciliation, live)
}

/// Plan the host menu from a reconciliation against `live`
///
/// Slots that point past the end of `live` (a reconciliation built against
/// another snapshot) are skipped.
#[must_use]
pub fn plan_menu(reconciliation: &Reconciliation, live: &[MenuItem]) -> MenuPlan {
    let mut plan = MenuPlan::default();
    let (order, hidden) = plan_level(&reconciliation.slots, live);

    plan.hidden.extend(hidden.into_iter().filter_map(|live_index| {
        live.get(live_index).map(|item| HiddenItem {
            parent: None,
            slug: item.slug.clone(),
            live_index,
        })
    }));

    for live_index in order {
        let Some(item) = live.get(live_index) else {
            continue;
        };
        let children = item.submenu.as_deref().unwrap_or_default();
        let (child_order, child_hidden) = match reconciliation.submenu_at(live_index) {
            Some(slots) => plan_level(slots, children),
            None => ((0..children.len()).collect(), Vec::new()),
        };

        plan.hidden
            .extend(child_hidden.into_iter().filter_map(|child| {
                children.get(child).map(|entry| HiddenItem {
                    parent: Some(live_index),
                    slug: entry.slug.clone(),
                    live_index: child,
                })
            }));

        plan.items.push(PlannedMenuItem {
            slug: item.slug.clone(),
            live_index,
            submenu: child_order
                .into_iter()
                .filter_map(|child| {
                    children.get(child).map(|entry| PlannedSubmenuItem {
                        slug: entry.slug.clone(),
                        live_index: child,
                    })
                })
                .collect(),
        });
    }

    plan
}

/// Render order and hidden indices for one sibling sequence
fn plan_level<T: Slotted>(slots: &[Slot<T>], live: &[T]) -> (Vec<usize>, Vec<usize>) {
    let mut customized: Vec<_> = slots.iter().filter(|slot| !slot.item.is_removed()).collect();
    customized.sort_by_key(|slot| (slot.item.position(), slot.index));

    let hidden = slots
        .iter()
        .filter(|slot| slot.item.is_removed())
        .map(|slot| slot.index)
        .collect();

    let covered = |index: &usize| slots.iter().any(|slot| slot.index == *index);
    let order = customized
        .into_iter()
        .map(|slot| slot.index)
        .chain((0..live.len()).filter(|index| !covered(index)))
        .collect();

    (order, hidden)
}
