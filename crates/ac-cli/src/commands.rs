//! Subcommand implementations
//!
//! Each command returns the JSON document printed on stdout.

use ac_interface::{Interface, NonceVerifier, ResetRequest, SaveRequest, Sha256Nonce, NONCE_ACTION};
use ac_layout::{build, HostMenuItem, LiveWidget, MenuItem};
use ac_store::OptionStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// Live host state as captured for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostState {
    /// Registered menu tree in host order
    pub menu: Vec<HostMenuItem>,
    /// Dashboard widgets registered for this request
    pub widgets: Vec<LiveWidget>,
}

impl HostState {
    /// Read host state from a JSON file
    ///
    /// A bare array is taken as the menu tree with no widgets.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read host state {}", path.display()))?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("Host state {} is not JSON", path.display()))?;
        Self::from_value(value)
    }

    /// Decode host state from JSON
    pub fn from_value(value: Value) -> Result<Self> {
        let state = match value {
            Value::Array(_) => Self {
                menu: serde_json::from_value(value).context("Invalid menu tree")?,
                widgets: Vec::new(),
            },
            other => serde_json::from_value(other).context("Invalid host state")?,
        };
        Ok(state)
    }

    /// Menu snapshot of this state
    #[must_use]
    pub fn snapshot(&self) -> Vec<MenuItem> {
        build(&self.menu)
    }
}

/// `snapshot`: the menu snapshot the editor would be handed
pub fn snapshot(host: &HostState) -> Result<Value> {
    Ok(serde_json::to_value(host.snapshot())?)
}

/// `reconcile`: stored menu against the live snapshot, with the report
pub fn reconcile<S, N>(interface: &Interface<S, N>, role: &str, host: &HostState) -> Result<Value>
where
    S: OptionStore,
    N: NonceVerifier,
{
    let custom = interface
        .load_customizations(role, &host.snapshot(), &host.widgets)
        .with_context(|| format!("Failed to load layout for role {role}"))?;

    Ok(json!({
        "role": role,
        "stored": custom.stored.is_some(),
        "menu": custom.reconciliation.menu(),
        "report": custom.reconciliation.report,
    }))
}

/// `plan`: what the host would render for the role
pub fn plan<S, N>(interface: &Interface<S, N>, role: &str, host: &HostState) -> Result<Value>
where
    S: OptionStore,
    N: NonceVerifier,
{
    let custom = interface
        .load_customizations(role, &host.snapshot(), &host.widgets)
        .with_context(|| format!("Failed to load layout for role {role}"))?;

    Ok(json!({
        "role": role,
        "menu": custom.menu,
        "dashboard": custom.dashboard,
    }))
}

/// `show`: the record as stored, `null` when there is none
pub fn show<S, N>(interface: &Interface<S, N>, role: &str) -> Result<Value>
where
    S: OptionStore,
    N: NonceVerifier,
{
    let raw = interface
        .store()
        .raw(role)
        .with_context(|| format!("Failed to read layout for role {role}"))?;
    Ok(raw.unwrap_or(Value::Null))
}

/// `save`: store a `{ "menu", "widgets" }` payload through the save handler
///
/// The operator is trusted, so the command issues its own token.
pub fn save<S: OptionStore>(
    interface: &Interface<S, Sha256Nonce>,
    role: &str,
    payload: &Value,
) -> Result<Value> {
    let request = SaveRequest {
        role: Some(role.to_string()),
        menu: payload.get("menu").cloned(),
        widgets: payload.get("widgets").cloned(),
        nonce: Some(interface.nonce().issue(NONCE_ACTION)),
    };
    Ok(serde_json::to_value(interface.save_interface(&request))?)
}

/// `reset`: delete the role's layout through the reset handler
pub fn reset<S: OptionStore>(interface: &Interface<S, Sha256Nonce>, role: &str) -> Result<Value> {
    let request = ResetRequest {
        role: Some(role.to_string()),
        nonce: Some(interface.nonce().issue(NONCE_ACTION)),
    };
    Ok(serde_json::to_value(interface.reset_interface(&request))?)
}

/// `nonce`: a token for the given action
pub fn nonce<S: OptionStore>(interface: &Interface<S, Sha256Nonce>, action: &str) -> Value {
    json!({
        "action": action,
        "token": interface.nonce().issue(action),
    })
}
