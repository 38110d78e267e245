//! Config command implementation.
//!
//! View and initialize konto configuration.

use crate::cli::{Cli, ConfigAction, ConfigArgs};
use crate::config::{default_config_path, Config, StalePolicy};
use crate::error::Result;
use crate::util::mask_secret;

/// Run the config command.
pub fn run(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Path => show_config_path(),
        ConfigAction::Init { force } => init_config(*force),
    }
}

/// Show the effective configuration.
fn show_config(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;

    if cli.json {
        let json = serde_json::to_string_pretty(&config)?;
        println!("{json}");
        return Ok(());
    }

    println!("Konto Configuration");
    println!("===================\n");

    println!("[server]");
    println!("  url = \"{}\"", config.server.url);
    println!("  command_path = \"{}\"", config.server.command_path);
    println!("  timeout_secs = {}", config.server.timeout_secs);
    println!("  user_agent = \"{}\"", config.server.user_agent);
    println!();

    println!("[session]");
    let policy = match config.session.stale_replies {
        StalePolicy::Apply => "apply",
        StalePolicy::Ignore => "ignore",
    };
    println!("  stale_replies = \"{policy}\"");
    println!();

    println!("[export]");
    if let Some(dir) = &config.export.directory {
        println!("  directory = \"{}\"", dir.display());
    } else {
        println!("  directory = # not set (current directory)");
    }
    println!("  file_name = \"{}\"", config.export.file_name);
    println!();

    match cli.auth() {
        Some(token) => println!("token: {}", mask_secret(token.expose())),
        None => println!("token: (not set)"),
    }

    Ok(())
}

/// Show configuration file path.
fn show_config_path() -> Result<()> {
    let path = default_config_path()?;
    println!("{}", path.display());
    Ok(())
}

/// Write a configuration file with defaults.
fn init_config(force: bool) -> Result<()> {
    let path = default_config_path()?;

    if path.exists() && !force {
        println!("Configuration file already exists at: {}", path.display());
        println!("Use 'konto config init --force' to overwrite it.");
        return Ok(());
    }

    Config::default().save_to(&path)?;
    println!("Created configuration file at: {}", path.display());
    Ok(())
}
