//! Admin Customizer interface
//!
//! Request handlers behind the layout editor: save, reset, widget rendering,
//! and the per-request lookup that applies a role's stored layout to the
//! live host menu and dashboard.
//!
//! # Request flow
//!
//! ```text
//! SaveRequest ─→ role? ─→ nonce? ─→ menu? ─→ decode + normalize + check positions ─→ purge trashed plugin widgets ─→ LayoutStore::put
//! ResetRequest ─→ role? ─→ nonce? ─→ LayoutStore::delete
//! WidgetHtmlRequest ─→ widget? ─→ nonce? ─→ WidgetRegistry ─→ output | form
//! ```
//!
//! Every failure is a `fail` [`Response`] with a fixed message; nothing is
//! retried.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod interface;
pub mod nonce;
pub mod request;
pub mod widget;

// Re-exports for convenience
pub use config::CustomizerConfig;
pub use error::{ConfigError, InterfaceError, InterfaceResult};
pub use interface::{Customizations, Interface};
pub use nonce::{NonceVerifier, Sha256Nonce, TrustedCaller, NONCE_ACTION};
pub use request::{
    AdminView, OutputKind, ResetRequest, Response, SaveEditRequest, SaveRequest, Status,
    WidgetHtmlRequest,
};
pub use widget::{render_form, TextWidget, WidgetRegistry, WidgetType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for handling customizer requests
    pub use crate::config::CustomizerConfig;
    pub use crate::error::{InterfaceError, InterfaceResult};
    pub use crate::interface::{Customizations, Interface};
    pub use crate::nonce::{NonceVerifier, Sha256Nonce, NONCE_ACTION};
    pub use crate::request::{ResetRequest, Response, SaveRequest, Status, WidgetHtmlRequest};
    pub use crate::widget::{WidgetRegistry, WidgetType};
}
