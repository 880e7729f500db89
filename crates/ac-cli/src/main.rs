use ac_cli::{command, commands, load_config, HostState, NONCE_SECRET_ENV};
use ac_interface::Interface;
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(args: &'a ArgMatches, name: &str) -> Result<&'a T> {
    args.get_one::<T>(name)
        .with_context(|| format!("Missing argument {name}"))
}

fn run(matches: &ArgMatches) -> Result<serde_json::Value> {
    let config = load_config(matches)?;

    if let Some(("snapshot", args)) = matches.subcommand() {
        let host = HostState::load(required::<PathBuf>(args, "host")?)?;
        return commands::snapshot(&host);
    }

    let interface = Interface::from_config(&config).with_context(|| {
        format!("Set nonce_secret in the config file, --nonce-secret or {NONCE_SECRET_ENV}")
    })?;
    tracing::debug!(
        "Running {} against {}",
        matches.subcommand_name().unwrap_or_default(),
        config.storage_dir.display()
    );

    match matches.subcommand() {
        Some(("reconcile", args)) => {
            let role = required::<String>(args, "role")?;
            let host = HostState::load(required::<PathBuf>(args, "host")?)?;
            commands::reconcile(&interface, role, &host)
        }
        Some(("plan", args)) => {
            let role = required::<String>(args, "role")?;
            let host = HostState::load(required::<PathBuf>(args, "host")?)?;
            commands::plan(&interface, role, &host)
        }
        Some(("show", args)) => commands::show(&interface, required::<String>(args, "role")?),
        Some(("save", args)) => {
            let role = required::<String>(args, "role")?;
            let path = required::<PathBuf>(args, "payload")?;
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read payload {}", path.display()))?;
            let payload = serde_json::from_str(&text)
                .with_context(|| format!("Payload {} is not JSON", path.display()))?;
            commands::save(&interface, role, &payload)
        }
        Some(("reset", args)) => commands::reset(&interface, required::<String>(args, "role")?),
        Some(("nonce", args)) => Ok(commands::nonce(
            &interface,
            required::<String>(args, "action")?,
        )),
        _ => anyhow::bail!("Unknown command"),
    }
}

fn main() -> Result<()> {
    let matches = command().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let output = run(&matches)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    let failed = output.get("status").and_then(|s| s.as_str()) == Some("fail");
    std::process::exit(i32::from(failed));
}
