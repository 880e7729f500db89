//! Transport handlers
//!
//! [`Interface`] owns the layout store, the nonce verifier and the widget
//! registry, and answers the editor's save, reset and render requests as
//! well as the per-request customization lookup.

use crate::config::CustomizerConfig;
use crate::error::{ConfigError, InterfaceError, InterfaceResult};
use crate::nonce::{NonceVerifier, Sha256Nonce, NONCE_ACTION};
use crate::request::{
    AdminView, OutputKind, ResetRequest, Response, SaveEditRequest, SaveRequest,
    WidgetHtmlRequest,
};
use crate::widget::{render_form, WidgetRegistry};
use ac_layout::{
    apply_user_edit, plan_dashboard, plan_menu, purge_trashed_plugin_widgets, reconcile_detailed,
    reconcile_widgets, validate_positions, DashboardPlan, EditOptions, Layout, LiveWidget,
    MenuItem, MenuPlan, Reconciliation, WidgetArgs,
};
use ac_store::{DeleteOutcome, FileOptionStore, LayoutStore, OptionStore, PutOutcome, StoreError};
use indexmap::IndexMap;

/// Everything one admin request needs from the stored layout
#[derive(Debug, Clone, Default)]
pub struct Customizations {
    /// Layout as stored, if any
    pub stored: Option<Layout>,
    /// Stored menu reconciled against the live snapshot
    pub reconciliation: Reconciliation,
    /// Host menu render plan
    pub menu: MenuPlan,
    /// Live widgets merged with stored args
    pub widgets: IndexMap<String, WidgetArgs>,
    /// Dashboard render plan
    pub dashboard: DashboardPlan,
}

/// Customizer request handlers
#[derive(Debug)]
pub struct Interface<S, N> {
    store: LayoutStore<S>,
    nonce: N,
    widgets: WidgetRegistry,
    edit_options: EditOptions,
}

impl Interface<FileOptionStore, Sha256Nonce> {
    /// File-backed handlers built from configuration
    ///
    /// Fails when the configuration has no nonce secret.
    pub fn from_config(config: &CustomizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = LayoutStore::new(FileOptionStore::new(&config.storage_dir))
            .with_prefix(config.option_prefix.clone());
        let nonce = Sha256Nonce::new(&config.nonce_secret).with_lifetime(config.nonce_lifetime_secs);
        Ok(Self::new(store, nonce).with_edit_options(config.edit_options()))
    }
}

impl<S: OptionStore, N: NonceVerifier> Interface<S, N> {
    /// Handlers with the built-in widget types
    #[must_use]
    pub fn new(store: LayoutStore<S>, nonce: N) -> Self {
        Self {
            store,
            nonce,
            widgets: WidgetRegistry::with_builtin(),
            edit_options: EditOptions::default(),
        }
    }

    /// With widget registry
    #[inline]
    #[must_use]
    pub fn with_widgets(mut self, widgets: WidgetRegistry) -> Self {
        self.widgets = widgets;
        self
    }

    /// With screen-state interpretation
    #[inline]
    #[must_use]
    pub fn with_edit_options(mut self, options: EditOptions) -> Self {
        self.edit_options = options;
        self
    }

    /// Layout store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &LayoutStore<S> {
        &self.store
    }

    /// Nonce verifier
    #[inline]
    #[must_use]
    pub fn nonce(&self) -> &N {
        &self.nonce
    }

    /// Widget registry
    #[inline]
    #[must_use]
    pub fn widgets(&self) -> &WidgetRegistry {
        &self.widgets
    }

    /// Role to customize: the requested one, else the user's first role
    #[must_use]
    pub fn resolve_role(requested: Option<&str>, user_roles: &[String]) -> Option<String> {
        requested
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .or_else(|| user_roles.first().cloned())
    }

    /// Save form-encoded menu and widget fields for a role
    pub fn save_interface(&self, request: &SaveRequest) -> Response {
        self.try_save(request).into()
    }

    /// Save an edited screen for a role
    pub fn save_edit(&self, request: &SaveEditRequest) -> Response {
        self.try_save_edit(request).into()
    }

    /// Delete a role's layout
    pub fn reset_interface(&self, request: &ResetRequest) -> Response {
        self.try_reset(request).into()
    }

    /// Render a plugin widget's output or settings form
    pub fn get_widget_html(&self, request: &WidgetHtmlRequest) -> Response {
        self.try_widget_html(request).into()
    }

    fn try_save(&self, request: &SaveRequest) -> InterfaceResult<Response> {
        let role = required_role(request.role.as_deref())?;
        self.check_nonce(request.nonce.as_deref())?;

        let menu = request.menu.clone().ok_or(InterfaceError::MissingMenu)?;

        let layout = Layout::from_form(Some(menu), request.widgets.clone())?;
        validate_positions(&layout.menu)?;
        self.persist(role, layout)
    }

    fn try_save_edit(&self, request: &SaveEditRequest) -> InterfaceResult<Response> {
        let role = required_role(request.role.as_deref())?;
        self.check_nonce(request.nonce.as_deref())?;

        let layout = apply_user_edit(&request.snapshot, &request.screen, &self.edit_options)?;
        self.persist(role, layout)
    }

    fn persist(&self, role: &str, mut layout: Layout) -> InterfaceResult<Response> {
        layout.normalize_booleans();
        purge_trashed_plugin_widgets(&mut layout.widgets);

        match self.store.put(role, &layout) {
            Ok(PutOutcome::Saved) => Ok(Response::success()),
            Ok(PutOutcome::Unchanged) => Err(InterfaceError::AlreadySaved(role.to_string())),
            Err(e @ StoreError::InvalidRole(_)) => {
                tracing::warn!("Rejected role on save: {}", e);
                Err(InterfaceError::MissingRole)
            }
            Err(e) => {
                tracing::warn!("Could not save layout for role {}: {}", role, e);
                Err(InterfaceError::Save(e))
            }
        }
    }

    fn try_reset(&self, request: &ResetRequest) -> InterfaceResult<Response> {
        let role = required_role(request.role.as_deref())?;
        self.check_nonce(request.nonce.as_deref())?;

        match self.store.delete(role) {
            Ok(DeleteOutcome::Deleted) => Ok(Response::success()),
            Ok(DeleteOutcome::Missing) => Err(InterfaceError::NotFound(role.to_string())),
            Err(e) => {
                tracing::warn!("Could not delete layout for role {}: {}", role, e);
                Err(InterfaceError::Delete(e))
            }
        }
    }

    fn try_widget_html(&self, request: &WidgetHtmlRequest) -> InterfaceResult<Response> {
        let widget = request
            .widget
            .as_ref()
            .ok_or_else(|| InterfaceError::widget("request has no widget"))?;
        self.check_nonce(request.nonce.as_deref())?;

        let type_id = widget
            .ac_id
            .as_deref()
            .ok_or_else(|| InterfaceError::widget(format!("{} has no widget type", widget.id)))?;
        let widget_type = self
            .widgets
            .get(type_id)
            .ok_or_else(|| InterfaceError::widget(format!("unregistered type {type_id}")))?;

        let mut args = widget.clone();
        args.ac_id = None;

        let kind = request
            .output
            .as_deref()
            .and_then(OutputKind::parse)
            .ok_or_else(|| InterfaceError::OutputKind(request.output.clone()))?;
        let html = match kind {
            OutputKind::Widget => widget_type.output(&args),
            OutputKind::Form => render_form(&**widget_type, &args),
        };
        Ok(Response::with_output(html))
    }

    fn check_nonce(&self, token: Option<&str>) -> InterfaceResult<()> {
        match token {
            Some(token) if self.nonce.verify(NONCE_ACTION, token) => Ok(()),
            _ => {
                tracing::warn!("Nonce check failed for {}", NONCE_ACTION);
                Err(InterfaceError::security(NONCE_ACTION))
            }
        }
    }

    /// Stored layout for a role, reconciled against this request's host state
    ///
    /// A stored record that no longer decodes is logged and treated as
    /// absent, so the host renders its defaults.
    pub fn load_customizations(
        &self,
        role: &str,
        live_menu: &[MenuItem],
        live_widgets: &[LiveWidget],
    ) -> InterfaceResult<Customizations> {
        let stored = match self.store.get(role) {
            Ok(stored) => stored,
            Err(e @ StoreError::Corrupt { .. }) => {
                tracing::warn!("Ignoring unreadable layout for role {}: {}", role, e);
                None
            }
            Err(e) => return Err(InterfaceError::Load(e)),
        };

        let reconciliation = stored
            .as_ref()
            .filter(|layout| !layout.menu.is_empty())
            .map(|layout| reconcile_detailed(&layout.menu, live_menu))
            .unwrap_or_default();
        let menu = plan_menu(&reconciliation, live_menu);

        let stored_widgets = stored
            .as_ref()
            .map(|layout| layout.widgets.clone())
            .unwrap_or_default();

        Ok(Customizations {
            menu,
            reconciliation,
            widgets: reconcile_widgets(&stored_widgets, live_widgets),
            dashboard: plan_dashboard(&stored_widgets, live_widgets, &self.widgets),
            stored,
        })
    }

    /// Data the editor starts from
    pub fn admin_view(
        &self,
        role: &str,
        live_menu: &[MenuItem],
        live_widgets: &[LiveWidget],
        token: String,
    ) -> InterfaceResult<AdminView> {
        let customizations = self.load_customizations(role, live_menu, live_widgets)?;
        let menu = editor_menu(&customizations.reconciliation, live_menu);

        Ok(AdminView {
            role: role.to_string(),
            menu,
            widgets: customizations.widgets,
            nonce: token,
        })
    }
}

/// Reconciled menu with uncovered live items filled in from the snapshot
///
/// The editor needs one entry per live item, in live order.
fn editor_menu(reconciliation: &Reconciliation, live: &[MenuItem]) -> Vec<MenuItem> {
    live.iter()
        .enumerate()
        .map(|(index, item)| reconciliation.at(index).cloned().unwrap_or_else(|| item.clone()))
        .collect()
}

fn required_role(role: Option<&str>) -> InterfaceResult<&str> {
    role.filter(|role| !role.trim().is_empty())
        .ok_or(InterfaceError::MissingRole)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonce::TrustedCaller;
    use ac_store::MemoryOptionStore;

    type Handlers = Interface<MemoryOptionStore, TrustedCaller>;

    #[test]
    fn resolve_role_prefers_request() {
        let roles = vec!["editor".to_string(), "author".to_string()];
        assert_eq!(
            Handlers::resolve_role(Some("administrator"), &roles).as_deref(),
            Some("administrator")
        );
        assert_eq!(Handlers::resolve_role(None, &roles).as_deref(), Some("editor"));
        assert_eq!(Handlers::resolve_role(Some(""), &roles).as_deref(), Some("editor"));
        assert_eq!(Handlers::resolve_role(None, &[]), None);
    }

    #[test]
    fn editor_menu_fills_gaps_from_live() {
        let live = vec![MenuItem::new("new", 0), MenuItem::new("a", 1)];
        let stored = vec![MenuItem::new("a", 0).removed()];
        let menu = editor_menu(&reconcile_detailed(&stored, &live), &live);
        assert_eq!(menu, vec![MenuItem::new("new", 0), MenuItem::new("a", 1).removed()]);
    }

    #[test]
    fn from_config_needs_a_secret() {
        let dir = tempfile::tempdir().unwrap();
        let config = CustomizerConfig::new().with_storage_dir(dir.path());
        assert!(matches!(
            Interface::from_config(&config),
            Err(ConfigError::EmptySecret)
        ));

        let handlers = Interface::from_config(&config.with_nonce_secret("s3cret")).unwrap();
        let forged = Sha256Nonce::new("").issue(NONCE_ACTION);
        assert!(!handlers.nonce().verify(NONCE_ACTION, &forged));
        assert_eq!(handlers.store().backend().dir(), dir.path());
    }

    #[test]
    fn blank_role_is_missing() {
        assert!(matches!(required_role(Some("  ")), Err(InterfaceError::MissingRole)));
        assert!(matches!(required_role(None), Err(InterfaceError::MissingRole)));
        assert_eq!(required_role(Some("editor")).unwrap(), "editor");
    }
}
