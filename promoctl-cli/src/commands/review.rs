//! Interactive review: show a promotion, collect a comment, approve or reject.
//!
//! Mirrors the dashboard's review modal. A failed request keeps the review
//! open so the comment can be edited and resent.

use std::fmt;
use std::io::IsTerminal;

use anyhow::{bail, Context, Result};
use clap::Parser;
use inquire::{Confirm, Select, Text};
use promoctl_core::{PromoConfig, ReviewDecision, ReviewDraft};

use super::{render, ConnectionArgs};
use crate::ui;

#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// Promotion ID to review
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Approve,
    Reject,
    Cancel,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Choice::Approve => "Approve",
            Choice::Reject => "Reject",
            Choice::Cancel => "Cancel",
        })
    }
}

pub async fn run_review(conn: &ConnectionArgs, config: &PromoConfig, args: ReviewArgs) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!("review is interactive; use `promoctl approve` or `promoctl reject` from scripts");
    }

    let client = conn.connect(config)?;
    let promotion = ui::with_spinner_async(format!("Fetching promotion {}", args.id), client.get(args.id))
        .await
        .with_context(|| format!("Failed to fetch promotion {}", args.id))?;

    println!("\nReview Promotion\n");
    print!("{}", render::promotion_details(&promotion));
    println!();

    let mut draft = ReviewDraft {
        comment: promotion.review_comment.clone().unwrap_or_default(),
        promotion,
    };

    loop {
        draft.comment = Text::new("Review comment:")
            .with_initial_value(&draft.comment)
            .with_help_message("Shared with the provider; leave empty for the default text")
            .prompt()
            .context("Failed to read review comment")?;

        let choice = Select::new("Decision:", vec![Choice::Approve, Choice::Reject, Choice::Cancel])
            .prompt()
            .context("Failed to read decision")?;

        let decision = match choice {
            Choice::Approve => ReviewDecision::Approve,
            Choice::Reject => ReviewDecision::Reject,
            Choice::Cancel => {
                println!("Review cancelled");
                return Ok(());
            }
        };

        let action = draft.action(decision);
        let pb = ui::spinner(action.to_string());
        match client.execute(&action).await {
            Ok(outcome) => {
                let message = outcome.message(&action);
                if pb.is_some() {
                    ui::finish_success(pb, message);
                } else {
                    println!("✓ {}", message);
                }
                return Ok(());
            }
            Err(e) => {
                if pb.is_some() {
                    ui::finish_error(pb, e.user_message());
                } else {
                    eprintln!("✗ {}", e.user_message());
                }
                let retry = Confirm::new("Edit the comment and try again?")
                    .with_default(true)
                    .prompt()
                    .context("Failed to read answer")?;
                if !retry {
                    return Err(e).context(action.failure_message());
                }
            }
        }
    }
}
