//! Admin Customizer layout engine
//!
//! Maps the host's position-indexed navigation tree and dashboard widget
//! registry onto a per-role custom layout, and keeps that layout valid as the
//! host changes underneath it.
//!
//! # Flow
//!
//! ```text
//! host tree → snapshot::build → Vec<MenuItem> ─┐
//!                                              ├→ reconcile → apply::plan_menu → host
//! stored Layout ───────────────────────────────┘
//!
//! screen state → edit::apply_user_edit → Layout → storage
//! ```
//!
//! # Example
//!
//! ```rust
//! use ac_layout::prelude::*;
//!
//! let live = build(&[
//!     HostMenuItem::new("index.php"),
//!     HostMenuItem::new("edit.php"),
//! ]);
//! let stored = Layout::with_menu(vec![
//!     MenuItem::new("index.php", 1),
//!     MenuItem::new("edit.php", 0),
//! ]);
//!
//! let menu = reconcile(Some(&stored), &live);
//! assert_eq!(menu, stored.menu);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod de;

pub mod apply;
pub mod edit;
pub mod error;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod snapshot;
pub mod widgets;

// Re-exports for convenience
pub use apply::{plan, plan_menu, MenuPlan};
pub use edit::{
    apply_user_edit, validate_positions, EditOptions, Placement, ScreenItem, ScreenState,
};
pub use error::{LayoutError, LayoutResult};
pub use model::{Layout, MenuItem, Slotted, SubmenuItem, WidgetArgs};
pub use normalize::normalize_booleans;
pub use reconcile::{reconcile, reconcile_detailed, ReconcileReport, Reconciliation};
pub use snapshot::{build, HostMenuItem, HostSubmenuItem};
pub use widgets::{
    plan_dashboard, purge_trashed_plugin_widgets, reconcile_widgets, DashboardPlan, LiveWidget,
    WidgetCatalog,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with layouts
    pub use crate::apply::{plan, plan_menu, MenuPlan};
    pub use crate::edit::{apply_user_edit, EditOptions, Placement, ScreenItem, ScreenState};
    pub use crate::error::{LayoutError, LayoutResult};
    pub use crate::model::{Layout, MenuItem, SubmenuItem, WidgetArgs};
    pub use crate::reconcile::{reconcile, reconcile_detailed};
    pub use crate::snapshot::{build, HostMenuItem, HostSubmenuItem};
    pub use crate::widgets::{plan_dashboard, reconcile_widgets, LiveWidget, WidgetCatalog};
}
