//! Customizer configuration
//!
//! Loaded from a TOML file. Every field has a default except the nonce
//! secret, which must be configured before handlers are built.
//!
//! ```toml
//! storage_dir = "/var/lib/admin-customizer"
//! option_prefix = "ac_customize_"
//! nonce_secret = "change-me"
//! nonce_lifetime_secs = 86400
//! submenu_placeholder = true
//! ```

use crate::error::ConfigError;
use ac_layout::EditOptions;
use ac_store::DEFAULT_PREFIX;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the handlers and their storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomizerConfig {
    /// Directory of the file-backed option store
    pub storage_dir: PathBuf,
    /// Prefix of per-role option keys
    pub option_prefix: String,
    /// Secret mixed into anti-forgery tokens
    pub nonce_secret: String,
    /// How long an issued token stays valid
    pub nonce_lifetime_secs: u64,
    /// Submenu lists on screen start with a host placeholder child
    pub submenu_placeholder: bool,
}

impl Default for CustomizerConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".admin-customizer"),
            option_prefix: DEFAULT_PREFIX.to_string(),
            nonce_secret: String::new(),
            nonce_lifetime_secs: 86_400,
            submenu_placeholder: true,
        }
    }
}

impl CustomizerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// Values may still be overridden afterwards, so nothing is validated
    /// here; see [`CustomizerConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Check values that have no usable default
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nonce_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(())
    }

    /// With storage directory
    #[inline]
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// With option key prefix
    #[inline]
    #[must_use]
    pub fn with_option_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.option_prefix = prefix.into();
        self
    }

    /// With nonce secret
    #[inline]
    #[must_use]
    pub fn with_nonce_secret(mut self, secret: impl Into<String>) -> Self {
        self.nonce_secret = secret.into();
        self
    }

    /// With nonce lifetime
    #[inline]
    #[must_use]
    pub fn with_nonce_lifetime(mut self, secs: u64) -> Self {
        self.nonce_lifetime_secs = secs;
        self
    }

    /// With submenu placeholder handling
    #[inline]
    #[must_use]
    pub fn with_submenu_placeholder(mut self, enabled: bool) -> Self {
        self.submenu_placeholder = enabled;
        self
    }

    /// Screen-state interpretation derived from this config
    #[must_use]
    pub fn edit_options(&self) -> EditOptions {
        EditOptions::default().with_submenu_placeholder(self.submenu_placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config = CustomizerConfig::from_toml_str(
            r#"
            storage_dir = "/tmp/ac"
            submenu_placeholder = false
            "#,
        )
        .unwrap();

        assert_eq!(config.storage_dir, PathBuf::from("/tmp/ac"));
        assert_eq!(config.option_prefix, "ac_customize_");
        assert!(!config.edit_options().submenu_placeholder);
    }

    #[test]
    fn secret_has_no_default() {
        assert!(matches!(
            CustomizerConfig::default().validate(),
            Err(ConfigError::EmptySecret)
        ));

        let config = CustomizerConfig::from_toml_str(r#"nonce_secret = """#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::EmptySecret)));

        let config = CustomizerConfig::from_toml_str(r#"nonce_secret = "s3cret""#).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_types_are_parse_errors() {
        let err = CustomizerConfig::from_toml_str("nonce_lifetime_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customizer.toml");
        std::fs::write(&path, "option_prefix = \"layout_\"\n").unwrap();

        let config = CustomizerConfig::load(&path).unwrap();
        assert_eq!(config.option_prefix, "layout_");

        let missing = CustomizerConfig::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn builders() {
        let config = CustomizerConfig::new()
            .with_storage_dir("data")
            .with_option_prefix("p_")
            .with_nonce_secret("s")
            .with_nonce_lifetime(60);
        assert_eq!(config.storage_dir, PathBuf::from("data"));
        assert_eq!(config.nonce_lifetime_secs, 60);
    }
}
