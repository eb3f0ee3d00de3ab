//! Command implementations for promoctl

pub mod mutate;
pub mod read;
pub mod render;
pub mod review;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use promoctl_core::{ClientOverrides, PromoConfig, PromotionClient};

pub use mutate::{run_approve, run_bulk, run_delete, run_reject, run_single};
pub use read::{run_active, run_list, run_show, run_stats};
pub use review::run_review;

/// Backend connection flags, shared by every command
#[derive(Parser, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Promotions API root (default: http://localhost:8080/admin/auth/promotions)
    #[arg(long, env = "PROMOCTL_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Admin bearer token (default: contents of the token file)
    #[arg(long, env = "PROMOCTL_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,
}

impl ConnectionArgs {
    /// Build a client. Priority: flag/env > config.toml > default
    pub fn connect(&self, config: &PromoConfig) -> Result<PromotionClient> {
        let client_config = config
            .client_config(ClientOverrides {
                base_url: self.base_url.clone(),
                token: self.token.clone(),
                insecure: self.insecure,
            })
            .context("Failed to resolve connection settings")?;
        if client_config.token.is_none() {
            tracing::debug!("no admin token configured; requests are sent without Authorization");
        }
        PromotionClient::new(client_config).context("Failed to build HTTP client")
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (for piping to jq)
    Json,
    /// Quiet mode - IDs only
    Quiet,
}

/// `--json` wins over `--output`
pub fn get_output_format(output: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        OutputFormat::Json
    } else {
        output
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag_overrides_output() {
        assert_eq!(get_output_format(OutputFormat::Quiet, true), OutputFormat::Json);
        assert_eq!(get_output_format(OutputFormat::Quiet, false), OutputFormat::Quiet);
        assert_eq!(get_output_format(OutputFormat::Human, false), OutputFormat::Human);
    }
}
