use std::io::IsTerminal;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use inquire::Password;
use promoctl_core::PromoConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with default values
    Init(InitArgs),
    /// Get a config value by dot-notation key
    Get(GetArgs),
    /// List all config values
    List,
    /// Show config file path
    Path,
    /// Store the admin bearer token
    SetToken(SetTokenArgs),
    /// Remove the stored admin token
    ClearToken,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Promotions API root to write into the new config
    #[arg(long)]
    pub base_url: Option<String>,

    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Dot-notation key (e.g., "api.base_url")
    pub key: String,
}

#[derive(Parser, Debug)]
pub struct SetTokenArgs {
    /// Token value; prompted for when omitted
    pub token: Option<String>,
}

/// Load ~/.promoctl/config.toml (defaults when missing)
pub fn load() -> Result<PromoConfig> {
    PromoConfig::load()
        .with_context(|| format!("Failed to load {}", PromoConfig::config_path().display()))
}

/// `init` and `path` work even when the existing file is broken
pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Get(args) => run_get(args, &load()?),
        ConfigCommands::List => run_list(&load()?),
        ConfigCommands::Path => run_path(),
        ConfigCommands::SetToken(args) => run_set_token(args, &load()?),
        ConfigCommands::ClearToken => run_clear_token(&load()?),
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    let config_path = PromoConfig::config_path();

    if config_path.exists() && !args.force {
        return Err(anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    let mut config = PromoConfig::default();
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }
    config.validate().context("Refusing to write an invalid config")?;
    config
        .save_to(&config_path)
        .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

    println!("✅ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Store your admin token: promoctl config set-token");
    println!("  3. Run: promoctl list");

    Ok(())
}

fn run_get(args: GetArgs, config: &PromoConfig) -> Result<()> {
    println!("{}", config.get(&args.key)?);
    Ok(())
}

fn run_list(config: &PromoConfig) -> Result<()> {
    let toml_str = config.to_toml().context("Failed to serialize config to TOML")?;
    println!("{}", toml_str);
    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", PromoConfig::config_path().display());
    Ok(())
}

fn run_set_token(args: SetTokenArgs, config: &PromoConfig) -> Result<()> {
    let token = match args.token {
        Some(token) => token,
        None if std::io::stdin().is_terminal() => Password::new("Admin token:")
            .without_confirmation()
            .prompt()
            .context("Failed to read token")?,
        None => bail!("No token given. Pass it as an argument or run interactively"),
    };
    if token.trim().is_empty() {
        bail!("Token is empty");
    }

    let store = config.token_store();
    store.save(&token)?;
    println!("✓ Token saved to {}", store.path().display());
    Ok(())
}

fn run_clear_token(config: &PromoConfig) -> Result<()> {
    let store = config.token_store();
    if store.clear()? {
        println!("✓ Removed {}", store.path().display());
    } else {
        println!("No token stored at {}", store.path().display());
    }
    Ok(())
}
