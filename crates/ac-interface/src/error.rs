//! Error types for the transport handlers
//!
//! Every handler failure becomes a `fail` response. The message a client sees
//! is fixed per variant ([`InterfaceError::response_message`]); the `Display`
//! text carries the detail for logs.

use ac_layout::LayoutError;
use ac_store::StoreError;
use std::path::PathBuf;

/// Errors from save, reset and widget rendering
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    /// Request names no role
    #[error("request has no role")]
    MissingRole,

    /// Save request carries no menu field
    #[error("request has no menu")]
    MissingMenu,

    /// Anti-forgery token missing or invalid
    #[error("nonce verification failed for action {action}")]
    Security {
        /// Action the token was checked against
        action: String,
    },

    /// Payload could not be turned into a layout
    #[error("invalid layout payload: {0}")]
    InvalidPayload(#[from] LayoutError),

    /// New layout equals the stored one
    #[error("layout for role {0} already saved")]
    AlreadySaved(String),

    /// Backend write failed
    #[error("could not save layout: {0}")]
    Save(#[source] StoreError),

    /// Reset of a role with no stored layout
    #[error("no stored layout for role {0}")]
    NotFound(String),

    /// Backend delete failed
    #[error("could not delete layout: {0}")]
    Delete(#[source] StoreError),

    /// Stored layout could not be read
    #[error("could not load layout: {0}")]
    Load(#[source] StoreError),

    /// Request carries no widget, or one of an unregistered type
    #[error("widget unavailable: {0}")]
    Widget(String),

    /// Render kind is neither `widget` nor `form`
    #[error("unsupported output kind: {0:?}")]
    OutputKind(Option<String>),
}

impl InterfaceError {
    /// Create security error for an action
    pub fn security(action: impl Into<String>) -> Self {
        Self::Security {
            action: action.into(),
        }
    }

    /// Create widget error
    pub fn widget(detail: impl Into<String>) -> Self {
        Self::Widget(detail.into())
    }

    /// Message sent back in `error_msg`
    #[must_use]
    pub fn response_message(&self) -> &'static str {
        match self {
            Self::MissingRole => "Could not get role",
            Self::MissingMenu => "Could not get menu",
            Self::Security { .. } => "Could not verify security",
            Self::InvalidPayload(_) => "Could not read layout",
            Self::AlreadySaved(_) => "Option already saved.",
            Self::Save(_) => "Could not save to database",
            Self::NotFound(_) => "Option does not exist.",
            Self::Delete(_) => "Could not delete from database",
            Self::Load(_) => "Could not load from database",
            Self::Widget(_) => "Could not get widget",
            Self::OutputKind(_) => "No output type or incorrect output type specified.",
        }
    }
}

/// Result type alias for handler operations
pub type InterfaceResult<T> = Result<T, InterfaceError>;

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`CustomizerConfig`](crate::CustomizerConfig)
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Nonce secret is empty
    #[error("nonce secret must not be empty")]
    EmptySecret,
}
