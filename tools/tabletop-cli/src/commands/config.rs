//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[database]");
    let db_path = if config.database.path == ":memory:" {
        config.database.path.clone()
    } else {
        ctx.base_dir().join(&config.database.path).display().to_string()
    };
    ctx.output.kv("path", &db_path);
    ctx.output
        .kv("busy_timeout_ms", &config.database.busy_timeout_ms.to_string());

    ctx.output.info("[store]");
    ctx.output.kv("currency", &config.store.currency);

    ctx.output.info("[auth]");
    ctx.output.kv(
        "min_password_length",
        &config.auth.min_password_length.to_string(),
    );
    ctx.output
        .kv("session_ttl_hours", &config.auth.session_ttl_hours.to_string());
    ctx.output.kv("seed_admin", &config.auth.seed_admin.to_string());
    if config.auth.seed_admin {
        ctx.output.kv("admin_username", &config.auth.admin_username);
        ctx.output.kv("admin_email", &config.auth.admin_email);
    }

    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level);

    ctx.output.info("[session]");
    ctx.output
        .kv("file", &ctx.session_file()?.display().to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}
