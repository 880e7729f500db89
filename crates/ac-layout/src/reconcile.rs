//! Layout reconciliation
//!
//! Merges a stored menu layout with a fresh snapshot of the host menu. The
//! host may have reordered, added or removed items since the layout was
//! saved (plugins activated, deactivated or re-registered), so every stored
//! entry is re-anchored before it is applied.
//!
//! # Rules
//!
//! Each stored entry is anchored at its index `i` in the stored sequence,
//! which is the host index it had when the layout was captured.
//!
//! - **Exact**: the live item at `i` carries the same slug. The entry is kept
//!   verbatim at `i`.
//! - **Relocated**: the slug lives at another index `k`. The entry moves to
//!   `k` with its `removed` flag and submenu overrides. A position still equal
//!   to `i` was never touched by the user and follows the host to `k`.
//! - **Dropped**: the slug is gone (or the entry has none and nothing sits at
//!   `i` without one).
//!
//! Placed entries are keyed by live index and compacted in ascending order.
//! Live items no stored entry maps onto are reported as additions but never
//! synthesized; the host places them by default.

use crate::model::{Layout, MenuItem, Slotted, SubmenuItem};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// How one stored entry maps onto the live sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Same slug at the entry's own index
    Exact(usize),

    /// Slug found at another index
    Relocated {
        /// Stored index
        from: usize,
        /// Live index
        to: usize,
    },
}

impl Resolution {
    /// Live index the entry lands on
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Exact(index) | Self::Relocated { to: index, .. } => index,
        }
    }
}

/// Slug lookup over one live sibling sequence
#[derive(Debug)]
pub struct SlugIndex<'a> {
    slugs: Vec<Option<&'a str>>,
    first: HashMap<&'a str, usize>,
}

impl<'a> SlugIndex<'a> {
    /// Index a live sequence; the first occurrence of a duplicated slug wins
    #[must_use]
    pub fn new<T: Slotted>(live: &'a [T]) -> Self {
        let slugs: Vec<_> = live.iter().map(Slotted::slug).collect();
        let mut first = HashMap::with_capacity(slugs.len());
        for (index, slug) in slugs.iter().enumerate() {
            if let Some(slug) = slug {
                first.entry(*slug).or_insert(index);
            }
        }
        Self { slugs, first }
    }

    /// Resolve an entry stored at `anchor`
    ///
    /// Entries without a slug only survive by positional carry-over: they
    /// match when the live item at the same index has no slug either.
    #[must_use]
    pub fn resolve(&self, anchor: usize, slug: Option<&str>) -> Option<Resolution> {
        if self.slugs.get(anchor).is_some_and(|live| *live == slug) {
            return Some(Resolution::Exact(anchor));
        }

        slug.and_then(|slug| self.first.get(slug))
            .map(|&to| Resolution::Relocated { from: anchor, to })
    }

    /// Number of live items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    /// No live items
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

/// Entry placed on a live index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot<T> {
    /// Live index
    pub index: usize,
    /// Reconciled entry
    pub item: T,
}

/// Why a stored entry did not survive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DropReason {
    /// Slug no longer in the live tree
    Missing,
    /// No slug, and no slug-less live item at the same index
    Anonymous,
    /// An earlier entry already took the live index
    Collision {
        /// Contested live index
        index: usize,
    },
}

/// Stored entry moved by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relocation {
    /// Parent slug for submenu entries
    pub parent: Option<String>,
    /// Entry slug
    pub slug: String,
    /// Stored index
    pub from: usize,
    /// Live index
    pub to: usize,
}

/// Stored entry that was discarded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedEntry {
    /// Parent slug for submenu entries
    pub parent: Option<String>,
    /// Entry slug
    pub slug: Option<String>,
    /// Stored index
    pub anchor: usize,
    /// Cause
    pub reason: DropReason,
}

/// Live item no stored entry maps onto
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedItem {
    /// Parent slug for submenu items
    pub parent: Option<String>,
    /// Item slug
    pub slug: Option<String>,
    /// Live index
    pub index: usize,
}

/// What changed between the stored layout and the live tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Entries kept at their own index
    pub kept: usize,
    /// Entries moved by the host
    pub relocated: Vec<Relocation>,
    /// Entries discarded
    pub dropped: Vec<DroppedEntry>,
    /// Live items left to host-default placement
    pub added: Vec<AddedItem>,
}

impl ReconcileReport {
    /// Host changes require no remapping
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.relocated.is_empty() && self.dropped.is_empty() && self.added.is_empty()
    }
}

/// Reconciled menu with the live index of every placed entry
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Top-level entries in ascending live index
    pub slots: Vec<Slot<MenuItem>>,

    /// Reconciled children, keyed by the live index of their parent
    pub submenu_slots: BTreeMap<usize, Vec<Slot<SubmenuItem>>>,

    /// Change summary
    pub report: ReconcileReport,
}

impl Reconciliation {
    /// Dense reconciled menu
    #[must_use]
    pub fn menu(&self) -> Vec<MenuItem> {
        self.slots.iter().map(|slot| slot.item.clone()).collect()
    }

    /// Dense reconciled menu, consuming the reconciliation
    #[must_use]
    pub fn into_menu(self) -> Vec<MenuItem> {
        self.slots.into_iter().map(|slot| slot.item).collect()
    }

    /// Reconciled entry placed on a live index
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&MenuItem> {
        self.slots
            .binary_search_by_key(&index, |slot| slot.index)
            .ok()
            .map(|found| &self.slots[found].item)
    }

    /// Reconciled children of the parent placed on a live index
    #[must_use]
    pub fn submenu_at(&self, index: usize) -> Option<&[Slot<SubmenuItem>]> {
        self.submenu_slots.get(&index).map(Vec::as_slice)
    }
}

/// Reconcile a stored layout against a live snapshot
///
/// Without a stored layout (or with an empty stored menu) the live snapshot
/// is returned unchanged.
#[must_use]
pub fn reconcile(stored: Option<&Layout>, live: &[MenuItem]) -> Vec<MenuItem> {
    match stored.filter(|layout| !layout.menu.is_empty()) {
        Some(layout) => reconcile_detailed(&layout.menu, live).into_menu(),
        None => live.to_vec(),
    }
}

/// Reconcile stored menu entries, keeping live indices and a change report
#[must_use]
pub fn reconcile_detailed(stored: &[MenuItem], live: &[MenuItem]) -> Reconciliation {
    let mut report = ReconcileReport::default();
    let mut placed = reconcile_level(stored, live, None, &mut report);
    let mut submenu_slots = BTreeMap::new();

    for (&index, item) in &mut placed {
        let Some(stored_children) = item.submenu.take() else {
            continue;
        };
        let live_children = live[index].submenu.as_deref();
        let children = reconcile_level(
            &stored_children,
            live_children.unwrap_or_default(),
            item.slug.clone(),
            &mut report,
        );

        item.submenu = if children.is_empty() && live_children.is_none() {
            None
        } else {
            Some(children.values().cloned().collect())
        };
        submenu_slots.insert(index, into_slots(children));
    }

    if !report.is_clean() {
        tracing::debug!(
            "Reconciled menu: {} kept, {} relocated, {} dropped, {} added",
            report.kept,
            report.relocated.len(),
            report.dropped.len(),
            report.added.len()
        );
    }

    Reconciliation {
        slots: into_slots(placed),
        submenu_slots,
        report,
    }
}

/// Apply the three-way rule to one sibling sequence
fn reconcile_level<T: Slotted>(
    stored: &[T],
    live: &[T],
    parent: Option<String>,
    report: &mut ReconcileReport,
) -> BTreeMap<usize, T> {
    let index = SlugIndex::new(live);
    let mut placed = BTreeMap::new();

    for (anchor, entry) in stored.iter().enumerate() {
        let Some(resolution) = index.resolve(anchor, entry.slug()) else {
            let reason = if entry.slug().is_some() {
                DropReason::Missing
            } else {
                DropReason::Anonymous
            };
            tracing::debug!("Dropping stale entry {:?} at {}", entry.slug(), anchor);
            report.dropped.push(DroppedEntry {
                parent: parent.clone(),
                slug: entry.slug().map(str::to_string),
                anchor,
                reason,
            });
            continue;
        };

        let target = resolution.index();
        if placed.contains_key(&target) {
            tracing::warn!(
                "Entry {:?} at {} collides on live index {}; earlier entry kept",
                entry.slug(),
                anchor,
                target
            );
            report.dropped.push(DroppedEntry {
                parent: parent.clone(),
                slug: entry.slug().map(str::to_string),
                anchor,
                reason: DropReason::Collision { index: target },
            });
            continue;
        }

        let mut item = entry.clone();
        match resolution {
            Resolution::Exact(_) => report.kept += 1,
            Resolution::Relocated { from, to } => {
                follow_host(&mut item, from, to);
                report.relocated.push(Relocation {
                    parent: parent.clone(),
                    slug: entry.slug().unwrap_or_default().to_string(),
                    from,
                    to,
                });
            }
        }
        placed.insert(target, item);
    }

    for (live_index, live_item) in live.iter().enumerate() {
        if !placed.contains_key(&live_index) {
            report.added.push(AddedItem {
                parent: parent.clone(),
                slug: live_item.slug().map(str::to_string),
                index: live_index,
            });
        }
    }

    placed
}

/// Move an untouched position along with the host
fn follow_host<T: Slotted>(item: &mut T, from: usize, to: usize) {
    let untouched = u32::try_from(from).is_ok_and(|from| from == item.position());
    if let (true, Ok(to)) = (untouched, u32::try_from(to)) {
        item.set_position(to);
    }
}

fn into_slots<T>(placed: BTreeMap<usize, T>) -> Vec<Slot<T>> {
    placed
        .into_iter()
        .map(|(index, item)| Slot { index, item })
        .collect()
}
