//! Configuration management commands.

use anyhow::{bail, Result};
use gomarket_cart::ZeroQuantity;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[cart]");
    ctx.output.kv("storage_key", &ctx.config.cart.storage_key);
    ctx.output
        .kv("legacy_keys", &ctx.config.cart.legacy_keys.join(", "));
    ctx.output.kv(
        "zero_quantity",
        match ctx.config.cart.zero_quantity {
            ZeroQuantity::Remove => "remove",
            ZeroQuantity::Keep => "keep",
        },
    );

    ctx.output.info("[storage]");
    ctx.output
        .kv("path", &ctx.storage_path().display().to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    let Some(ref path) = ctx.config_path else {
        ctx.output.warn("No config file found, using defaults");
        return Ok(());
    };

    let config = CliConfig::load(path)?;

    if config.cart.storage_key.trim().is_empty() {
        bail!("cart.storage_key must not be empty");
    }
    if config.cart.legacy_keys.contains(&config.cart.storage_key) {
        bail!(
            "cart.legacy_keys must not contain the storage key {}",
            config.cart.storage_key
        );
    }

    ctx.output
        .success(&format!("{} is valid", path.display()));
    Ok(())
}
