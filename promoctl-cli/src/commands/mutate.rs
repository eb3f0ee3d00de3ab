//! Commands that change a promotion: approve, reject, advertise,
//! toggle-active, delete and the bulk variants

use std::io::IsTerminal;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use inquire::Confirm;
use promoctl_core::{Action, ActionOutcome, BulkKind, PromoConfig, PromotionClient};

use super::{print_json, ConnectionArgs};
use crate::ui;

#[derive(Parser, Debug)]
pub struct ReviewCommentArgs {
    /// Promotion ID
    pub id: i64,

    /// Review comment sent to the provider (default: "Approved by admin" / "Rejected by admin")
    #[arg(long, short, default_value = "")]
    pub comment: String,

    /// Print the backend response as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct IdArgs {
    /// Promotion ID
    pub id: i64,

    /// Print the backend response as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Promotion ID
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct BulkArgs {
    #[command(subcommand)]
    pub command: BulkCommands,
}

#[derive(Subcommand, Debug)]
pub enum BulkCommands {
    /// Approve every listed promotion
    Approve(BulkIdsArgs),
    /// Reject every listed promotion
    Reject(BulkIdsArgs),
    /// Delete every listed promotion
    Delete(BulkIdsArgs),
}

#[derive(Parser, Debug)]
pub struct BulkIdsArgs {
    /// Promotion IDs (space or comma separated)
    #[arg(required = true, num_args = 1.., value_delimiter = ',')]
    pub ids: Vec<i64>,

    /// Skip the confirmation prompt (delete only)
    #[arg(long, short)]
    pub yes: bool,

    /// Print the backend response as JSON
    #[arg(long)]
    pub json: bool,
}

/// Ask before a destructive action; `--yes` or a declined prompt short-circuits
fn confirm(action: &Action, assume_yes: bool) -> Result<bool> {
    let Some(prompt) = action.confirm_prompt() else {
        return Ok(true);
    };
    if assume_yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        bail!("{} Refusing to continue without a terminal; pass --yes", prompt);
    }
    Confirm::new(&prompt)
        .with_default(false)
        .prompt()
        .context("Failed to read confirmation")
}

async fn send(client: &PromotionClient, action: &Action, json: bool) -> Result<ActionOutcome> {
    let pb = ui::spinner(action.to_string());
    match client.execute(action).await {
        Ok(outcome) => {
            if json {
                if let Some(pb) = pb {
                    pb.finish_and_clear();
                }
                match &outcome {
                    ActionOutcome::Mutation(resp) => print_json(resp)?,
                    ActionOutcome::Bulk(resp) => print_json(resp)?,
                }
            } else if pb.is_some() {
                ui::finish_success(pb, outcome.message(action));
            } else {
                println!("✓ {}", outcome.message(action));
            }
            Ok(outcome)
        }
        Err(e) => {
            ui::finish_error(pb, e.user_message());
            Err(e).context(action.failure_message())
        }
    }
}

pub async fn run_approve(conn: &ConnectionArgs, config: &PromoConfig, args: ReviewCommentArgs) -> Result<()> {
    let client = conn.connect(config)?;
    send(&client, &Action::approve(args.id, args.comment), args.json).await?;
    Ok(())
}

pub async fn run_reject(conn: &ConnectionArgs, config: &PromoConfig, args: ReviewCommentArgs) -> Result<()> {
    let client = conn.connect(config)?;
    send(&client, &Action::reject(args.id, args.comment), args.json).await?;
    Ok(())
}

/// advertise / toggle-active: single-id actions without a body
pub async fn run_single(
    conn: &ConnectionArgs,
    config: &PromoConfig,
    action: Action,
    json: bool,
) -> Result<()> {
    let client = conn.connect(config)?;
    let outcome = send(&client, &action, json).await?;
    if let (false, ActionOutcome::Mutation(resp)) = (json, &outcome) {
        if let Some(active) = resp.is_active {
            println!("  now {}", if active { "active" } else { "paused" });
        }
    }
    Ok(())
}

pub async fn run_delete(conn: &ConnectionArgs, config: &PromoConfig, args: DeleteArgs) -> Result<()> {
    let action = Action::Delete { id: args.id };
    if !confirm(&action, args.yes)? {
        println!("Cancelled");
        return Ok(());
    }
    let client = conn.connect(config)?;
    send(&client, &action, false).await?;
    Ok(())
}

pub async fn run_bulk(conn: &ConnectionArgs, config: &PromoConfig, args: BulkArgs) -> Result<()> {
    let (kind, args) = match args.command {
        BulkCommands::Approve(a) => (BulkKind::Approve, a),
        BulkCommands::Reject(a) => (BulkKind::Reject, a),
        BulkCommands::Delete(a) => (BulkKind::Delete, a),
    };

    let action = kind.action(args.ids);
    if !confirm(&action, args.yes)? {
        println!("Cancelled");
        return Ok(());
    }

    let client = conn.connect(config)?;
    send(&client, &action, args.json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_destructive_actions_skip_confirmation() {
        assert!(confirm(&Action::approve(1, ""), false).unwrap());
        assert!(confirm(&Action::ToggleActive { id: 1 }, false).unwrap());
    }

    #[test]
    fn test_yes_flag_skips_prompt() {
        assert!(confirm(&Action::BulkDelete(vec![1, 2]), true).unwrap());
    }
}
