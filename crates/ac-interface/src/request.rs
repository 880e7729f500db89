//! Request and response shapes of the transport

use crate::error::InterfaceError;
use ac_layout::{MenuItem, ScreenState, WidgetArgs};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Save a role's layout from form-encoded fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Role being customized
    #[serde(default)]
    pub role: Option<String>,
    /// Menu entries as posted; absent when the menu was not edited
    #[serde(default)]
    pub menu: Option<Value>,
    /// Widget args as posted
    #[serde(default)]
    pub widgets: Option<Value>,
    /// Anti-forgery token
    #[serde(default, rename = "ac_nonce", alias = "nonce")]
    pub nonce: Option<String>,
}

/// Save a role's layout from an edited screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEditRequest {
    /// Role being customized
    #[serde(default)]
    pub role: Option<String>,
    /// Snapshot the screen was built from
    pub snapshot: Vec<MenuItem>,
    /// What the editor collected
    pub screen: ScreenState,
    /// Anti-forgery token
    #[serde(default, rename = "ac_nonce", alias = "nonce")]
    pub nonce: Option<String>,
}

/// Delete a role's layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    /// Role to reset
    #[serde(default)]
    pub role: Option<String>,
    /// Anti-forgery token
    #[serde(default, rename = "ac_nonce", alias = "nonce")]
    pub nonce: Option<String>,
}

/// What to render for a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Dashboard output
    Widget,
    /// Settings form
    Form,
}

impl OutputKind {
    /// Parse the transport's `output` field
    #[must_use]
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "widget" => Some(Self::Widget),
            "form" => Some(Self::Form),
            _ => None,
        }
    }
}

/// Render a widget's output or form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetHtmlRequest {
    /// Widget args, `ac_id` naming the type
    #[serde(default)]
    pub widget: Option<WidgetArgs>,
    /// `widget` or `form`
    #[serde(default)]
    pub output: Option<String>,
    /// Anti-forgery token
    #[serde(default, rename = "ac_nonce", alias = "nonce")]
    pub nonce: Option<String>,
}

/// Outcome tag of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Request handled
    Success,
    /// Request refused; see `error_msg`
    Fail,
}

/// Reply sent to the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Outcome
    pub status: Status,
    /// Client-facing failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
    /// Rendered HTML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Response {
    /// Plain success
    #[inline]
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            error_msg: None,
            output: None,
        }
    }

    /// Success carrying HTML
    #[inline]
    #[must_use]
    pub fn with_output(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            ..Self::success()
        }
    }

    /// Failure with a client-facing message
    #[inline]
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            error_msg: Some(message.into()),
            output: None,
        }
    }

    /// Request succeeded
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

impl From<InterfaceError> for Response {
    fn from(err: InterfaceError) -> Self {
        Self::fail(err.response_message())
    }
}

impl From<Result<Response, InterfaceError>> for Response {
    fn from(result: Result<Response, InterfaceError>) -> Self {
        result.unwrap_or_else(Self::from)
    }
}

/// Layout data handed to the editor on launch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminView {
    /// Role being edited
    pub role: String,
    /// Reconciled menu, one entry per live item it covers
    pub menu: Vec<MenuItem>,
    /// Live widgets merged with stored args
    pub widgets: IndexMap<String, WidgetArgs>,
    /// Token for the editor's requests
    pub nonce: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn response_shapes() {
        assert_eq!(
            serde_json::to_value(Response::success()).unwrap(),
            json!({ "status": "success" })
        );
        assert_eq!(
            serde_json::to_value(Response::fail("Could not get role")).unwrap(),
            json!({ "status": "fail", "error_msg": "Could not get role" })
        );
        assert_eq!(
            serde_json::to_value(Response::with_output("<p/>")).unwrap(),
            json!({ "status": "success", "output": "<p/>" })
        );
    }

    #[test]
    fn error_becomes_fail() {
        let response: Response = Err::<Response, _>(InterfaceError::MissingRole).into();
        assert!(!response.is_success());
        assert_eq!(response.error_msg.as_deref(), Some("Could not get role"));
    }

    #[test]
    fn requests_accept_transport_field_names() {
        let request: SaveRequest = serde_json::from_value(json!({
            "role": "editor",
            "menu": [],
            "ac_nonce": "abc"
        }))
        .unwrap();
        assert_eq!(request.nonce.as_deref(), Some("abc"));
        assert_eq!(request.widgets, None);

        let reset: ResetRequest = serde_json::from_value(json!({ "nonce": "abc" })).unwrap();
        assert_eq!(reset.role, None);
        assert_eq!(reset.nonce.as_deref(), Some("abc"));
    }

    #[test]
    fn output_kind_parse() {
        assert_eq!(OutputKind::parse("form"), Some(OutputKind::Form));
        assert_eq!(OutputKind::parse("html"), None);
    }
}
