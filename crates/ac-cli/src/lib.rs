//! Admin Customizer command line
//!
//! Operator commands over a role's stored layout. Host state (the live menu
//! tree and the dashboard's registered widgets) is read from a JSON file, so
//! reconciliation can be inspected without a running host.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;

pub use cli::{apply_overrides, command, load_config, NONCE_SECRET_ENV};
pub use commands::HostState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
