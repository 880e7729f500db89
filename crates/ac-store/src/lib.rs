//! Admin Customizer storage
//!
//! Persists one [`Layout`](ac_layout::Layout) per role through an
//! [`OptionStore`], the host's named key-value option table.
//!
//! # Backends
//!
//! - [`MemoryOptionStore`]: process-local map behind a `parking_lot` lock
//! - [`FileOptionStore`]: one JSON file per option, atomically replaced

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod file;
pub mod layout_store;
pub mod option;

// Re-exports for convenience
pub use error::{StoreError, StoreResult};
pub use file::FileOptionStore;
pub use layout_store::{DeleteOutcome, LayoutStore, PutOutcome, DEFAULT_PREFIX};
pub use option::{MemoryOptionStore, OptionStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
