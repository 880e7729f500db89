//! Error types for layout handling
//!
//! Reconciliation itself never fails: stale or malformed entries are dropped.
//! Errors come from turning untrusted input (screen state, form payloads)
//! into a [`Layout`](crate::Layout).

/// Errors while building or decoding a layout
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// Screen state does not describe the snapshot it claims to edit
    #[error("screen state has {actual} menu items, snapshot has {expected}")]
    ScreenMismatch {
        /// Items in the snapshot
        expected: usize,
        /// Items in the screen state
        actual: usize,
    },

    /// Screen state for one parent does not match its snapshot children
    #[error("submenu of item {parent} has {actual} entries on screen, snapshot has {expected}")]
    SubmenuMismatch {
        /// Snapshot index of the parent item
        parent: usize,
        /// Children in the snapshot
        expected: usize,
        /// Children on screen
        actual: usize,
    },

    /// A submenu entry claims the slot reserved for the host placeholder child
    #[error("submenu entry of item {parent} sits at {index}, inside the placeholder slot")]
    PlaceholderSlot {
        /// Snapshot index of the parent item
        parent: usize,
        /// Offending on-screen index
        index: usize,
    },

    /// Placements within one container are not a permutation of `0..n`
    #[error("inconsistent placement in {container}: {detail}")]
    InconsistentPlacement {
        /// Container name (`menu`, `trash`, `submenu 3`, ...)
        container: String,
        /// What went wrong
        detail: String,
    },

    /// Payload could not be decoded into a layout
    #[error("malformed layout payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl LayoutError {
    /// Create inconsistent placement error
    pub fn inconsistent(container: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InconsistentPlacement {
            container: container.into(),
            detail: detail.into(),
        }
    }
}

/// Result type alias for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_display() {
        let err = LayoutError::ScreenMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "screen state has 3 menu items, snapshot has 4");
    }

    #[test]
    fn malformed_from_serde() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: LayoutError = source.into();
        assert!(matches!(err, LayoutError::Malformed(_)));
    }
}
