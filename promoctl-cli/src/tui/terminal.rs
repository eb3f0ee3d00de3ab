//! Terminal management and main run loop
//!
//! Requests run on spawned tasks and report back over a channel, so the UI
//! keeps redrawing while the backend is slow.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use promoctl_core::{Action, FetchTicket, PromoError, Promotion, PromotionClient, SortOrder, Tab};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use super::app::App;
use super::event::{handle_key, poll_event, HandleResult};
use super::ui;

/// Results delivered back to the run loop
#[derive(Debug)]
pub enum Message {
    Fetched {
        ticket: FetchTicket,
        result: Result<Vec<Promotion>, PromoError>,
    },
    ActionDone {
        action: Action,
        result: Result<String, PromoError>,
    },
}

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the dashboard until the user quits
pub async fn run(client: PromotionClient, tab: Tab, sort: SortOrder) -> Result<()> {
    info!(base_url = %client.base_url(), tab = %tab.key(), "starting dashboard");

    let mut terminal = init_terminal()?;
    let mut app = App::new(tab, sort, client.base_url());
    let (tx, rx) = mpsc::unbounded_channel();

    spawn_fetch(&mut app, &client, &tx);

    let result = run_loop(&mut terminal, &mut app, &client, &tx, rx).await;

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;

    info!("dashboard closed");
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    client: &PromotionClient,
    tx: &UnboundedSender<Message>,
    mut rx: UnboundedReceiver<Message>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        while let Ok(message) = rx.try_recv() {
            apply_message(app, client, tx, message);
        }

        // Poll for events (with 100ms timeout for responsive UI)
        let event = tokio::task::block_in_place(|| poll_event(Duration::from_millis(100)))?;
        if let Some(Event::Key(key)) = event {
            match handle_key(app, key) {
                HandleResult::Quit => break,
                HandleResult::Continue => app.clamp_cursor(),
                HandleResult::Refresh => spawn_fetch(app, client, tx),
                HandleResult::Send(action) => spawn_action(app, client, tx, action),
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn apply_message(
    app: &mut App,
    client: &PromotionClient,
    tx: &UnboundedSender<Message>,
    message: Message,
) {
    match message {
        Message::Fetched { ticket, result } => {
            let outcome = app.state.finish_fetch(ticket, result);
            debug!(?ticket, ?outcome, "fetch finished");
            app.clamp_cursor();
        }
        Message::ActionDone { action, result } => {
            let refetch = app.state.record_action_result(&action, result);
            app.sync_mode();
            if refetch {
                spawn_fetch(app, client, tx);
            }
        }
    }
}

/// Start loading the current tab
fn spawn_fetch(app: &mut App, client: &PromotionClient, tx: &UnboundedSender<Message>) {
    let ticket = app.state.begin_fetch();
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.fetch(ticket.tab).await;
        // receiver is gone once the dashboard closed
        let _ = tx.send(Message::Fetched { ticket, result });
    });
}

fn spawn_action(
    app: &mut App,
    client: &PromotionClient,
    tx: &UnboundedSender<Message>,
    action: Action,
) {
    app.state.notice = Some(format!("{}...", action));
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.execute(&action).await.map(|outcome| outcome.message(&action));
        let _ = tx.send(Message::ActionDone { action, result });
    });
}
