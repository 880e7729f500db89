//! Menu snapshots
//!
//! Converts the host's live navigation tree into a position-indexed,
//! slug-keyed sequence of [`MenuItem`]s. Snapshots are rebuilt on every
//! request and never cached.

use crate::model::{MenuItem, SubmenuItem};
use serde::{Deserialize, Serialize};

/// Top-level item as the host registers it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostMenuItem {
    /// Stable identifier (the page slug), if any
    #[serde(default)]
    pub slug: Option<String>,

    /// Display title
    #[serde(default)]
    pub title: Option<String>,

    /// Child list; `None` when the item owns none
    #[serde(default)]
    pub children: Option<Vec<HostSubmenuItem>>,
}

impl HostMenuItem {
    /// Item with a slug and no children
    #[inline]
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    /// Item without a stable identifier (separators and the like)
    #[inline]
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Attach children by slug
    #[must_use]
    pub fn with_children<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = Some(slugs.into_iter().map(HostSubmenuItem::new).collect());
        self
    }
}

/// Child item as the host registers it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostSubmenuItem {
    /// Stable identifier, if any
    #[serde(default)]
    pub slug: Option<String>,

    /// Display title
    #[serde(default)]
    pub title: Option<String>,
}

impl HostSubmenuItem {
    /// Child with a slug
    #[inline]
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            title: None,
        }
    }
}

/// Build a snapshot of the live tree
///
/// Positions are assigned per level in input order, starting at 0. Every
/// entry starts visible.
#[must_use]
pub fn build(live_tree: &[HostMenuItem]) -> Vec<MenuItem> {
    live_tree
        .iter()
        .zip(0u32..)
        .map(|(item, position)| MenuItem {
            slug: item.slug.clone(),
            position,
            removed: false,
            submenu: item.children.as_deref().map(build_submenu),
        })
        .collect()
}

fn build_submenu(children: &[HostSubmenuItem]) -> Vec<SubmenuItem> {
    children
        .iter()
        .zip(0u32..)
        .map(|(child, position)| SubmenuItem {
            slug: child.slug.clone(),
            position,
            removed: false,
        })
        .collect()
}
