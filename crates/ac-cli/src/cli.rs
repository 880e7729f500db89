//! Command line definition and configuration loading
//!
//! Settings come from the optional `--config` file; flags given on the
//! command line override the file.

use ac_interface::{CustomizerConfig, NONCE_ACTION};
use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Environment variable read when `--nonce-secret` is not given
pub const NONCE_SECRET_ENV: &str = "AC_NONCE_SECRET";

fn role_arg() -> Arg {
    Arg::new("role")
        .long("role")
        .required(true)
        .help("Role whose layout is used")
}

fn host_arg() -> Arg {
    Arg::new("host")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON file with the live menu tree and dashboard widgets")
}

/// The `admin-customizer` command
#[must_use]
pub fn command() -> Command {
    Command::new("admin-customizer")
        .version(crate::VERSION)
        .about("Per-role admin menu and dashboard layouts")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("storage-dir")
                .long("storage-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory of the option store"),
        )
        .arg(
            Arg::new("option-prefix")
                .long("option-prefix")
                .global(true)
                .help("Prefix of per-role option keys"),
        )
        .arg(
            Arg::new("nonce-secret")
                .long("nonce-secret")
                .global(true)
                .env(NONCE_SECRET_ENV)
                .hide_env_values(true)
                .help("Secret mixed into anti-forgery tokens"),
        )
        .arg(
            Arg::new("no-submenu-placeholder")
                .long("no-submenu-placeholder")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Submenu lists on screen have no placeholder child"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Write logs to stderr as JSON"),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Print the menu snapshot of a host tree")
                .arg(host_arg()),
        )
        .subcommand(
            Command::new("reconcile")
                .about("Reconcile a role's stored menu against a host tree")
                .arg(role_arg())
                .arg(host_arg()),
        )
        .subcommand(
            Command::new("plan")
                .about("Show what the host would render for a role")
                .arg(role_arg())
                .arg(host_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Print a role's stored record")
                .arg(role_arg()),
        )
        .subcommand(
            Command::new("save")
                .about("Save a form-encoded { menu, widgets } payload for a role")
                .arg(role_arg())
                .arg(
                    Arg::new("payload")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON payload file"),
                ),
        )
        .subcommand(
            Command::new("reset")
                .about("Delete a role's layout")
                .arg(role_arg()),
        )
        .subcommand(
            Command::new("nonce")
                .about("Issue an anti-forgery token")
                .arg(
                    Arg::new("action")
                        .long("action")
                        .default_value(NONCE_ACTION)
                        .help("Action the token is bound to"),
                ),
        )
}

/// Configuration file (if any) with command line overrides applied
pub fn load_config(matches: &ArgMatches) -> Result<CustomizerConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => CustomizerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CustomizerConfig::default(),
    };
    Ok(apply_overrides(config, matches))
}

/// Override file values with the flags present in `matches`
#[must_use]
pub fn apply_overrides(mut config: CustomizerConfig, matches: &ArgMatches) -> CustomizerConfig {
    if let Some(dir) = matches.get_one::<PathBuf>("storage-dir") {
        config = config.with_storage_dir(dir.clone());
    }
    if let Some(prefix) = matches.get_one::<String>("option-prefix") {
        config = config.with_option_prefix(prefix.clone());
    }
    if let Some(secret) = matches.get_one::<String>("nonce-secret") {
        config = config.with_nonce_secret(secret.clone());
    }
    if matches.get_flag("no-submenu-placeholder") {
        config = config.with_submenu_placeholder(false);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> ArgMatches {
        command()
            .try_get_matches_from(std::iter::once("admin-customizer").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customizer.toml");
        std::fs::write(
            &path,
            "storage_dir = \"from-file\"\noption_prefix = \"file_\"\nnonce_secret = \"file-secret\"\n",
        )
        .unwrap();
        let path = path.to_string_lossy().into_owned();

        let from_file = load_config(&parse(&["--config", &path, "show", "--role", "editor"])).unwrap();
        assert_eq!(from_file.storage_dir, PathBuf::from("from-file"));
        assert_eq!(from_file.option_prefix, "file_");
        assert!(from_file.submenu_placeholder);

        let overridden = load_config(&parse(&[
            "--config",
            &path,
            "show",
            "--role",
            "editor",
            "--storage-dir",
            "from-flag",
            "--option-prefix",
            "flag_",
            "--nonce-secret",
            "flag-secret",
            "--no-submenu-placeholder",
        ]))
        .unwrap();
        assert_eq!(overridden.storage_dir, PathBuf::from("from-flag"));
        assert_eq!(overridden.option_prefix, "flag_");
        assert_eq!(overridden.nonce_secret, "flag-secret");
        assert!(!overridden.submenu_placeholder);
    }

    #[test]
    fn unset_flags_leave_defaults() {
        let config = apply_overrides(
            CustomizerConfig::default().with_nonce_secret("kept"),
            &parse(&["nonce"]),
        );
        assert_eq!(config.option_prefix, "ac_customize_");
        assert!(config.submenu_placeholder);
        if std::env::var_os(NONCE_SECRET_ENV).is_none() {
            assert_eq!(config.nonce_secret, "kept");
        }
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let matches = parse(&["--config", path.to_str().unwrap(), "nonce"]);
        assert!(load_config(&matches).is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(command().try_get_matches_from(["admin-customizer"]).is_err());
    }
}
