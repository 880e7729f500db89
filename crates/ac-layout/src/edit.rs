//! Turning an edited screen into a layout
//!
//! The editing UI never sends back the layout itself. It reports, for every
//! snapshot item (by index), which container the item ended up in and at
//! which on-screen index. [`apply_user_edit`] validates that report and
//! derives positions and removed flags from it.
//!
//! Conventions:
//!
//! - A visible item's position is its on-screen index.
//! - A trashed item's position is its index in the trash plus the number of
//!   visible items, and it is marked removed.
//! - Submenu lists on screen start with a host-injected placeholder child,
//!   which is subtracted before the same rules apply one level down.

use crate::error::{LayoutError, LayoutResult};
use crate::model::{Layout, MenuItem, SubmenuItem, WidgetArgs};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Where an item ended up on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "container", content = "index")]
pub enum Placement {
    /// Visible list, at this on-screen index
    Menu(usize),
    /// Trash container, at this index
    Trash(usize),
}

/// On-screen state of one snapshot item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenItem {
    /// Top-level placement
    pub placement: Placement,

    /// Placement of each snapshot child, in snapshot order
    #[serde(default)]
    pub submenu: Vec<Placement>,
}

impl ScreenItem {
    /// Item left where it was
    #[inline]
    #[must_use]
    pub fn at(index: usize) -> Self {
        Self {
            placement: Placement::Menu(index),
            submenu: Vec::new(),
        }
    }

    /// Item dropped into the trash
    #[inline]
    #[must_use]
    pub fn trashed(index: usize) -> Self {
        Self {
            placement: Placement::Trash(index),
            submenu: Vec::new(),
        }
    }

    /// Set child placements
    #[inline]
    #[must_use]
    pub fn with_submenu(mut self, submenu: Vec<Placement>) -> Self {
        self.submenu = submenu;
        self
    }
}

/// Everything the editing UI collected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenState {
    /// One entry per snapshot item, in snapshot order
    pub menu: Vec<ScreenItem>,

    /// Widget customizations as edited
    #[serde(default)]
    pub widgets: IndexMap<String, WidgetArgs>,
}

impl ScreenState {
    /// Screen showing the snapshot exactly as the host laid it out
    #[must_use]
    pub fn unchanged(snapshot: &[MenuItem], options: &EditOptions) -> Self {
        let offset = options.placeholder_offset();
        let menu = snapshot
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let children = item.submenu.as_deref().unwrap_or_default();
                ScreenItem::at(index).with_submenu(
                    (0..children.len())
                        .map(|child| Placement::Menu(child + offset))
                        .collect(),
                )
            })
            .collect();

        Self {
            menu,
            widgets: IndexMap::new(),
        }
    }
}

/// How screen state is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOptions {
    /// Submenu lists carry an invisible first child injected by the host
    pub submenu_placeholder: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            submenu_placeholder: true,
        }
    }
}

impl EditOptions {
    /// Set placeholder handling
    #[inline]
    #[must_use]
    pub fn with_submenu_placeholder(mut self, enabled: bool) -> Self {
        self.submenu_placeholder = enabled;
        self
    }

    /// On-screen slots taken by the placeholder
    #[inline]
    #[must_use]
    pub fn placeholder_offset(&self) -> usize {
        usize::from(self.submenu_placeholder)
    }
}

/// Build a layout from an edited screen
///
/// Entries come out in snapshot order; that order is what the reconciler
/// anchors on later, so it is never re-sorted here.
pub fn apply_user_edit(
    snapshot: &[MenuItem],
    screen: &ScreenState,
    options: &EditOptions,
) -> LayoutResult<Layout> {
    if screen.menu.len() != snapshot.len() {
        return Err(LayoutError::ScreenMismatch {
            expected: snapshot.len(),
            actual: screen.menu.len(),
        });
    }

    let placements: Vec<_> = screen.menu.iter().map(|item| item.placement).collect();
    let top = resolve_level("menu", &placements)?;

    let mut menu = Vec::with_capacity(snapshot.len());
    for (parent, ((item, shown), (position, removed))) in
        snapshot.iter().zip(&screen.menu).zip(top).enumerate()
    {
        let submenu = match item.submenu.as_deref() {
            Some(children) => Some(edit_submenu(parent, children, &shown.submenu, options)?),
            None if shown.submenu.is_empty() => None,
            None => {
                return Err(LayoutError::SubmenuMismatch {
                    parent,
                    expected: 0,
                    actual: shown.submenu.len(),
                })
            }
        };

        menu.push(MenuItem {
            slug: item.slug.clone(),
            position,
            removed,
            submenu,
        });
    }

    tracing::debug!(
        "Built layout from screen: {} items, {} removed",
        menu.len(),
        menu.iter().filter(|item| item.removed).count()
    );

    Ok(Layout::new(menu, screen.widgets.clone()))
}

fn edit_submenu(
    parent: usize,
    children: &[SubmenuItem],
    shown: &[Placement],
    options: &EditOptions,
) -> LayoutResult<Vec<SubmenuItem>> {
    if shown.len() != children.len() {
        return Err(LayoutError::SubmenuMismatch {
            parent,
            expected: children.len(),
            actual: shown.len(),
        });
    }

    let offset = options.placeholder_offset();
    let placements = shown
        .iter()
        .map(|placement| match *placement {
            Placement::Menu(index) if index < offset => {
                Err(LayoutError::PlaceholderSlot { parent, index })
            }
            Placement::Menu(index) => Ok(Placement::Menu(index - offset)),
            trash @ Placement::Trash(_) => Ok(trash),
        })
        .collect::<LayoutResult<Vec<_>>>()?;

    let resolved = resolve_level(&format!("submenu {parent}"), &placements)?;
    Ok(children
        .iter()
        .zip(resolved)
        .map(|(child, (position, removed))| SubmenuItem {
            slug: child.slug.clone(),
            position,
            removed,
        })
        .collect())
}

/// Check a decoded menu the way [`apply_user_edit`] checks a screen
///
/// Within every sibling list the positions must be distinct and lie in
/// `0..len`: visible entries take the first slots and trashed ones follow.
pub fn validate_positions(menu: &[MenuItem]) -> LayoutResult<()> {
    check_permutation(
        "menu",
        menu.iter().map(|item| slot_index(item.position)),
        menu.len(),
    )?;

    for (parent, item) in menu.iter().enumerate() {
        let Some(children) = item.submenu.as_deref() else {
            continue;
        };
        check_permutation(
            &format!("submenu {parent}"),
            children.iter().map(|child| slot_index(child.position)),
            children.len(),
        )?;
    }
    Ok(())
}

fn slot_index(position: u32) -> usize {
    usize::try_from(position).unwrap_or(usize::MAX)
}

/// Positions and removed flags for one sibling sequence
fn resolve_level(container: &str, placements: &[Placement]) -> LayoutResult<Vec<(u32, bool)>> {
    let (visible, trash): (Vec<_>, Vec<_>) = placements
        .iter()
        .partition(|placement| matches!(placement, Placement::Menu(_)));
    let index_of = |placement: &&Placement| match **placement {
        Placement::Menu(index) | Placement::Trash(index) => index,
    };
    check_permutation(container, visible.iter().map(index_of), visible.len())?;
    check_permutation(
        &format!("{container} trash"),
        trash.iter().map(index_of),
        trash.len(),
    )?;

    let visible_count = visible.len();
    placements
        .iter()
        .map(|placement| {
            let (index, removed) = match *placement {
                Placement::Menu(index) => (index, false),
                Placement::Trash(index) => (index + visible_count, true),
            };
            u32::try_from(index)
                .map(|position| (position, removed))
                .map_err(|_| LayoutError::inconsistent(container, format!("index {index} too large")))
        })
        .collect()
}

fn check_permutation(
    container: &str,
    indices: impl Iterator<Item = usize>,
    len: usize,
) -> LayoutResult<()> {
    let mut seen = vec![false; len];
    for index in indices {
        match seen.get_mut(index) {
            Some(taken) if *taken => {
                return Err(LayoutError::inconsistent(
                    container,
                    format!("index {index} used twice"),
                ))
            }
            Some(taken) => *taken = true,
            None => {
                return Err(LayoutError::inconsistent(
                    container,
                    format!("index {index} out of range for {len} items"),
                ))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn snapshot() -> Vec<MenuItem> {
        vec![
            MenuItem::new("index.php", 0),
            MenuItem::new("edit.php", 1).with_submenu(vec![
                SubmenuItem::new("edit.php", 0),
                SubmenuItem::new("post-new.php", 1),
            ]),
            MenuItem::new("upload.php", 2),
            MenuItem::new("tools.php", 3),
        ]
    }

    #[test]
    fn unchanged_screen_reproduces_snapshot() {
        let snapshot = snapshot();
        let options = EditOptions::default();
        let layout =
            apply_user_edit(&snapshot, &ScreenState::unchanged(&snapshot, &options), &options)
                .unwrap();
        assert_eq!(layout.menu, snapshot);
    }

    #[test]
    fn reorder_and_trash() {
        let screen = ScreenState {
            menu: vec![
                ScreenItem::at(1),
                ScreenItem::at(0).with_submenu(vec![Placement::Menu(2), Placement::Menu(1)]),
                ScreenItem::trashed(0),
                ScreenItem::trashed(1),
            ],
            widgets: IndexMap::new(),
        };

        let layout = apply_user_edit(&snapshot(), &screen, &EditOptions::default()).unwrap();
        assert_eq!(
            layout.menu,
            vec![
                MenuItem::new("index.php", 1),
                MenuItem::new("edit.php", 0).with_submenu(vec![
                    SubmenuItem::new("edit.php", 1),
                    SubmenuItem::new("post-new.php", 0),
                ]),
                MenuItem::new("upload.php", 2).removed(),
                MenuItem::new("tools.php", 3).removed(),
            ]
        );
    }

    #[test]
    fn trashed_submenu_child() {
        let mut screen = ScreenState::unchanged(&snapshot(), &EditOptions::default());
        screen.menu[1].submenu = vec![Placement::Trash(0), Placement::Menu(1)];

        let layout = apply_user_edit(&snapshot(), &screen, &EditOptions::default()).unwrap();
        let children = layout.menu[1].submenu.clone().unwrap();
        assert_eq!(
            children,
            vec![
                SubmenuItem::new("edit.php", 1).removed(),
                SubmenuItem::new("post-new.php", 0),
            ]
        );
    }

    #[test]
    fn without_placeholder_indices_are_direct() {
        let options = EditOptions::default().with_submenu_placeholder(false);
        let mut screen = ScreenState::unchanged(&snapshot(), &options);
        screen.menu[1].submenu = vec![Placement::Menu(1), Placement::Menu(0)];

        let layout = apply_user_edit(&snapshot(), &screen, &options).unwrap();
        let positions: Vec<_> = layout.menu[1]
            .submenu
            .iter()
            .flatten()
            .map(|child| child.position)
            .collect();
        assert_eq!(positions, vec![1, 0]);
    }

    #[test]
    fn rejects_wrong_item_count() {
        let screen = ScreenState {
            menu: vec![ScreenItem::at(0)],
            widgets: IndexMap::new(),
        };
        let err = apply_user_edit(&snapshot(), &screen, &EditOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::ScreenMismatch {
                expected: 4,
                actual: 1
            }
        ));
    }

    #[test]
    fn rejects_placeholder_slot() {
        let mut screen = ScreenState::unchanged(&snapshot(), &EditOptions::default());
        screen.menu[1].submenu = vec![Placement::Menu(0), Placement::Menu(1)];

        let err = apply_user_edit(&snapshot(), &screen, &EditOptions::default()).unwrap_err();
        assert!(matches!(err, LayoutError::PlaceholderSlot { parent: 1, index: 0 }));
    }

    #[test]
    fn rejects_children_on_childless_item() {
        let mut screen = ScreenState::unchanged(&snapshot(), &EditOptions::default());
        screen.menu[0].submenu = vec![Placement::Menu(1)];

        let err = apply_user_edit(&snapshot(), &screen, &EditOptions::default()).unwrap_err();
        assert!(matches!(err, LayoutError::SubmenuMismatch { parent: 0, .. }));
    }

    #[test]
    fn rejects_duplicate_and_out_of_range_indices() {
        let duplicate = ScreenState {
            menu: vec![
                ScreenItem::at(0),
                ScreenItem::at(0).with_submenu(vec![Placement::Menu(1), Placement::Menu(2)]),
                ScreenItem::at(1),
                ScreenItem::at(2),
            ],
            widgets: IndexMap::new(),
        };
        let err = apply_user_edit(&snapshot(), &duplicate, &EditOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "inconsistent placement in menu: index 0 used twice");

        let mut gap = ScreenState::unchanged(&snapshot(), &EditOptions::default());
        gap.menu[3] = ScreenItem::trashed(4);
        let err = apply_user_edit(&snapshot(), &gap, &EditOptions::default()).unwrap_err();
        assert!(matches!(err, LayoutError::InconsistentPlacement { .. }));
    }

    #[test]
    fn decoded_positions_are_checked_like_screens() {
        let edited = apply_user_edit(
            &snapshot(),
            &ScreenState::unchanged(&snapshot(), &EditOptions::default()),
            &EditOptions::default(),
        )
        .unwrap();
        assert!(validate_positions(&edited.menu).is_ok());
        assert!(validate_positions(&[]).is_ok());

        let duplicate = vec![MenuItem::new("index.php", 0), MenuItem::new("edit.php", 0)];
        let err = validate_positions(&duplicate).unwrap_err();
        assert_eq!(err.to_string(), "inconsistent placement in menu: index 0 used twice");

        let out_of_range = vec![MenuItem::new("index.php", 0), MenuItem::new("edit.php", 7)];
        assert!(matches!(
            validate_positions(&out_of_range),
            Err(LayoutError::InconsistentPlacement { .. })
        ));

        let bad_child = vec![MenuItem::new("edit.php", 0).with_submenu(vec![
            SubmenuItem::new("edit.php", 1),
            SubmenuItem::new("post-new.php", 1),
        ])];
        let err = validate_positions(&bad_child).unwrap_err();
        assert_eq!(
            err.to_string(),
            "inconsistent placement in submenu 0: index 1 used twice"
        );
    }

    #[test]
    fn widgets_pass_through() {
        let mut screen = ScreenState::unchanged(&snapshot(), &EditOptions::default());
        screen
            .widgets
            .insert("dashboard_activity".into(), WidgetArgs::new("dashboard_activity").trashed());

        let layout = apply_user_edit(&snapshot(), &screen, &EditOptions::default()).unwrap();
        assert!(layout.widgets["dashboard_activity"].trashed);
    }

    #[test]
    fn placement_wire_shape() {
        assert_eq!(
            serde_json::to_value(Placement::Trash(2)).unwrap(),
            json!({ "container": "trash", "index": 2 })
        );
        let item: ScreenItem = serde_json::from_value(json!({
            "placement": { "container": "menu", "index": 0 }
        }))
        .unwrap();
        assert_eq!(item, ScreenItem::at(0));
    }
}
