//! Read-only commands: list, show, active, stats

use anyhow::{Context, Result};
use clap::Parser;
use promoctl_core::view::{self, ServiceFilter, SortOrder, Stats, Tab, ViewQuery};
use promoctl_core::{PromoConfig, Promotion};
use serde::Serialize;

use super::{get_output_format, print_json, render, ConnectionArgs, OutputFormat};
use crate::ui;

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Status tab to fetch (pending, approved, advertised, rejected, all)
    #[arg(long, short)]
    pub tab: Option<Tab>,

    /// Only show one service type (all, hotel, travel, tour)
    #[arg(long, short = 'S', default_value = "all")]
    pub service: ServiceFilter,

    /// Case-insensitive match on title, provider or location
    #[arg(long, short, default_value = "")]
    pub search: String,

    /// Ordering (newest, oldest, performance, revenue, discount)
    #[arg(long)]
    pub sort: Option<SortOrder>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,

    /// Print header stats after the list
    #[arg(long)]
    pub stats: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Promotion ID
    pub id: i64,

    /// Print the raw promotion as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ActiveArgs {
    /// Output format
    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Status tab the figures are computed over
    #[arg(long, short)]
    pub tab: Option<Tab>,

    /// Print stats as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ListOutput<'a> {
    tab: Tab,
    total: usize,
    promotions: Vec<&'a Promotion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<Stats>,
}

pub async fn run_list(conn: &ConnectionArgs, config: &PromoConfig, args: ListArgs) -> Result<()> {
    let client = conn.connect(config)?;
    let tab = args.tab.unwrap_or(config.dashboard.default_tab);
    let format = get_output_format(args.output, args.json);

    let promotions = ui::with_spinner_async(
        format!("Fetching {} promotions", tab.key()),
        client.fetch(tab),
    )
    .await
    .context("Failed to fetch promotions")?;

    let query = ViewQuery {
        service: args.service,
        search: args.search,
        sort: args.sort.unwrap_or(config.dashboard.default_sort),
    };
    let visible = view::apply(&promotions, &query);
    let stats = args.stats.then(|| Stats::compute(&promotions));

    match format {
        OutputFormat::Json => print_json(&ListOutput {
            tab,
            total: visible.len(),
            promotions: visible,
            stats,
        })?,
        OutputFormat::Quiet => {
            for p in &visible {
                println!("{}", p.id);
            }
        }
        OutputFormat::Human => {
            print!(
                "{}",
                render::promotion_tree(tab.label(), &visible, &view::empty_state_message(tab, &query))
            );
            if let Some(stats) = stats {
                println!();
                print!("{}", render::stats_summary("Stats", &stats));
            }
        }
    }

    Ok(())
}

pub async fn run_show(conn: &ConnectionArgs, config: &PromoConfig, args: ShowArgs) -> Result<()> {
    let client = conn.connect(config)?;
    let promotion = ui::with_spinner_async(format!("Fetching promotion {}", args.id), client.get(args.id))
        .await
        .with_context(|| format!("Failed to fetch promotion {}", args.id))?;

    if args.json {
        print_json(&promotion)
    } else {
        print!("{}", render::promotion_details(&promotion));
        Ok(())
    }
}

pub async fn run_active(conn: &ConnectionArgs, config: &PromoConfig, args: ActiveArgs) -> Result<()> {
    let client = conn.connect(config)?;
    let format = get_output_format(args.output, args.json);

    let promotions = ui::with_spinner_async("Fetching active promotions", client.active())
        .await
        .context("Failed to fetch active promotions")?;

    match format {
        OutputFormat::Json => print_json(&promotions)?,
        OutputFormat::Quiet => {
            for p in &promotions {
                println!("{}", p.id);
            }
        }
        OutputFormat::Human => {
            let refs: Vec<&Promotion> = promotions.iter().collect();
            print!(
                "{}",
                render::promotion_tree("Active campaigns", &refs, "No live campaigns right now.")
            );
        }
    }
    Ok(())
}

pub async fn run_stats(conn: &ConnectionArgs, config: &PromoConfig, args: StatsArgs) -> Result<()> {
    let client = conn.connect(config)?;
    let tab = args.tab.unwrap_or(Tab::All);

    let promotions = ui::with_spinner_async(
        format!("Fetching {} promotions", tab.key()),
        client.fetch(tab),
    )
    .await
    .context("Failed to fetch promotions")?;
    let stats = Stats::compute(&promotions);

    if args.json {
        print_json(&stats)
    } else {
        print!("{}", render::stats_summary(tab.label(), &stats));
        Ok(())
    }
}
