//! # modsetting-demo
//!
//! Runs the example client mod against the in-process ModSetting host.
//!
//! The demo simulates one of the two load orders a real game can produce:
//!
//! - host first: the host module is loaded before the client finishes
//!   setup, so binding succeeds in `on_after_setup`
//! - client first: binding fails in `on_after_setup` and succeeds when the
//!   host's activation is announced
//!
//! It then plays a few user edits through the host and prints the client's
//! settings mirror.
//!
//! ## Running
//!
//! ```bash
//! cargo run --bin modsetting-demo
//!
//! # Client loads before the host, with debug logging
//! RUST_LOG=debug cargo run --bin modsetting-demo -- --client-first
//! ```

use anyhow::{Context, Result};
use modsetting_binding::{KeyCode, ModDescriptor, ModuleDirectory, SettingsApi, Value};
use modsetting_demo::{Config, ExampleMod, LoadOrder};
use modsetting_host::{ModSettingHost, MODULE_NAME};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Args {
    config: Option<PathBuf>,
    client_first: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        client_first: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--client-first" => args.client_first = true,
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                args.config = Some(PathBuf::from(path));
            }
            other => anyhow::bail!("Unknown argument: {other}"),
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let (config, load_error) = match &args.config {
        Some(path) => (Config::load(path)?, None),
        None => match Config::load_default() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        },
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting modsetting-demo v{}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {:#}", e);
    }

    let load_order = if args.client_first {
        LoadOrder::ClientFirst
    } else {
        config.load_order
    };

    let directory = Arc::new(ModuleDirectory::new());
    let host = ModSettingHost::new();
    let api = Arc::new(SettingsApi::with_config(
        Arc::clone(&directory),
        config.binding.clone(),
    ));
    let example = ExampleMod::new(ModDescriptor::new("Example Mod", "example_mod"), api);
    example.on_enable();

    let bound = match load_order {
        LoadOrder::HostFirst => {
            info!("Simulating load order: host first");
            host.install(&directory);
            example.on_after_setup()
        }
        LoadOrder::ClientFirst => {
            info!("Simulating load order: client first");
            if example.on_after_setup() {
                anyhow::bail!("Client bound before the host was loaded");
            }
            host.install(&directory);
            example.on_mod_activated(&ModDescriptor::new(MODULE_NAME, MODULE_NAME))
        }
    };

    if !bound {
        anyhow::bail!("Client failed to bind to the settings host");
    }

    let owner = example.descriptor().name.clone();
    info!(
        controls = host.control_count(&owner),
        handles = example.api().cached_handles(),
        "Client bound"
    );

    // Edits a user would make in the settings menu
    host.user_change(&owner, "D1", Value::Str("Option 3".into()));
    host.user_change(&owner, "T1", Value::Bool(true));
    host.user_change(&owner, "S1", Value::Float(42.5));
    host.user_change(&owner, "K2", Value::KeyCode(KeyCode::F5));
    host.user_change(&owner, "T3", Value::Bool(true));

    info!(
        controls = host.control_count(&owner),
        saved = host.store().has_config(&owner),
        "User edits applied"
    );

    example.on_disable();

    println!("{:#?}", example.settings().snapshot());
    Ok(())
}
