//! promoctl - admin tooling for provider-submitted promotions
//!
//! Entry point for the `promoctl` binary:
//! - Read commands (`list`, `show`, `active`, `stats`) with human/JSON output
//! - Lifecycle actions (`approve`, `reject`, `advertise`, `toggle-active`, `delete`, `bulk`)
//! - Interactive `review` prompt and the full-screen `dashboard`
//! - Local configuration and admin token storage (`config`)

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use promoctl_core::{Action, PromoConfig, SortOrder, Tab};
use tracing::debug;

mod commands;
mod config;
mod tracing_setup;
mod tui;
mod ui;

use commands::ConnectionArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "promoctl",
    author,
    version,
    about = "Review, approve and manage provider promotions from the terminal",
    long_about = "Admin client for the promotions API. List and filter promotions by status, \
                  approve or reject submissions with a review comment, pause live campaigns, \
                  and run bulk actions, from scripts or the interactive dashboard."
)]
struct Cli {
    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(flatten)]
    conn: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List promotions for a status tab, with search, service filter and sort
    List(commands::read::ListArgs),
    /// Show one promotion in full
    Show(commands::read::ShowArgs),
    /// List currently running campaigns
    Active(commands::read::ActiveArgs),
    /// Header and performance figures for a tab
    Stats(commands::read::StatsArgs),
    /// Approve a pending promotion
    Approve(commands::mutate::ReviewCommentArgs),
    /// Reject a pending promotion
    Reject(commands::mutate::ReviewCommentArgs),
    /// Start advertising an approved promotion
    Advertise(commands::mutate::IdArgs),
    /// Pause or resume an advertised promotion
    ToggleActive(commands::mutate::IdArgs),
    /// Delete a promotion
    Delete(commands::mutate::DeleteArgs),
    /// Approve, reject or delete many promotions at once
    Bulk(commands::mutate::BulkArgs),
    /// Review a promotion interactively (comment, then approve or reject)
    Review(commands::review::ReviewArgs),
    /// Full-screen promotions dashboard
    Dashboard(DashboardArgs),
    /// Manage promoctl configuration (init, get, list, path, set-token)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct DashboardArgs {
    /// Tab to open on (default: dashboard.default_tab)
    #[arg(long, short)]
    tab: Option<Tab>,

    /// Initial ordering (default: dashboard.default_sort)
    #[arg(long)]
    sort: Option<SortOrder>,
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // The dashboard owns the terminal, so its logs go to a file
    let log_file = matches!(cli.command, Commands::Dashboard(_))
        .then(|| PromoConfig::config_dir().join("dashboard.log"));
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
        log_file,
    })?;

    // Initialize UI quiet mode from flag, env var, and TTY detection
    ui::init_quiet_mode(cli.quiet);

    let result = run(cli).await;
    tracing_setup::shutdown_otel();
    result
}

async fn run(cli: Cli) -> Result<()> {
    let conn = cli.conn;
    let command = match cli.command {
        Commands::Config(args) => return config::run_config(args),
        Commands::Completions(args) => return run_completions(args),
        command => command,
    };
    let config = config::load()?;
    debug!(base_url = %config.api.base_url, "config loaded");

    match command {
        Commands::List(args) => commands::run_list(&conn, &config, args).await?,
        Commands::Show(args) => commands::run_show(&conn, &config, args).await?,
        Commands::Active(args) => commands::run_active(&conn, &config, args).await?,
        Commands::Stats(args) => commands::run_stats(&conn, &config, args).await?,
        Commands::Approve(args) => commands::run_approve(&conn, &config, args).await?,
        Commands::Reject(args) => commands::run_reject(&conn, &config, args).await?,
        Commands::Advertise(args) => {
            commands::run_single(&conn, &config, Action::Advertise { id: args.id }, args.json).await?
        }
        Commands::ToggleActive(args) => {
            commands::run_single(&conn, &config, Action::ToggleActive { id: args.id }, args.json)
                .await?
        }
        Commands::Delete(args) => commands::run_delete(&conn, &config, args).await?,
        Commands::Bulk(args) => commands::run_bulk(&conn, &config, args).await?,
        Commands::Review(args) => commands::run_review(&conn, &config, args).await?,
        Commands::Dashboard(args) => {
            let client = conn.connect(&config)?;
            let tab = args.tab.unwrap_or(config.dashboard.default_tab);
            let sort = args.sort.unwrap_or(config.dashboard.default_sort);
            tui::run(client, tab, sort).await?
        }
        // handled before the config is loaded
        Commands::Config(_) | Commands::Completions(_) => {}
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
