//! Key handling for the dashboard

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use promoctl_core::{Action, BulkKind, PromotionStatus, ReviewDecision, Tab};

use super::app::{App, Mode};

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// What the run loop should do after a key press
#[derive(Debug, PartialEq)]
pub enum HandleResult {
    Continue,
    Quit,
    /// Refetch the current tab
    Refresh,
    /// Send a mutation to the backend
    Send(Action),
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }
    // notices last until the next key press
    app.state.notice = None;
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return HandleResult::Quit;
    }

    if app.state.confirm.is_some() {
        return handle_confirm(app, key);
    }

    match app.mode {
        Mode::Review => handle_review(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Normal if app.state.bulk_menu_open => handle_bulk_menu(app, key),
        Mode::Normal => handle_normal(app, key),
    }
}

fn handle_confirm(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => match app.state.confirm.take() {
            Some(action) => HandleResult::Send(action),
            None => HandleResult::Continue,
        },
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state.confirm = None;
            app.state.notice = Some("Cancelled".to_string());
            HandleResult::Continue
        }
        _ => HandleResult::Continue,
    }
}

fn handle_review(app: &mut App, key: KeyEvent) -> HandleResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            app.close_review();
            HandleResult::Continue
        }
        KeyCode::Char('a') if ctrl => review_send(app, ReviewDecision::Approve),
        KeyCode::Char('r') if ctrl => review_send(app, ReviewDecision::Reject),
        KeyCode::Backspace => {
            if let Some(draft) = app.state.review_mut() {
                draft.comment.pop();
            }
            HandleResult::Continue
        }
        KeyCode::Enter => {
            if let Some(draft) = app.state.review_mut() {
                draft.comment.push('\n');
            }
            HandleResult::Continue
        }
        KeyCode::Char(c) if !ctrl => {
            if let Some(draft) = app.state.review_mut() {
                draft.comment.push(c);
            }
            HandleResult::Continue
        }
        _ => HandleResult::Continue,
    }
}

fn review_send(app: &App, decision: ReviewDecision) -> HandleResult {
    match app.state.review_action(decision) {
        Some(action) => HandleResult::Send(action),
        None => HandleResult::Continue,
    }
}

fn handle_search(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Enter => app.mode = Mode::Normal,
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_insert(c),
        _ => {}
    }
    HandleResult::Continue
}

fn handle_bulk_menu(app: &mut App, key: KeyEvent) -> HandleResult {
    let kind = match key.code {
        KeyCode::Char('a') => BulkKind::Approve,
        KeyCode::Char('r') => BulkKind::Reject,
        KeyCode::Char('d') => BulkKind::Delete,
        KeyCode::Esc | KeyCode::Char('b') => {
            app.state.toggle_bulk_menu();
            return HandleResult::Continue;
        }
        KeyCode::Char('q') => return HandleResult::Quit,
        _ => return HandleResult::Continue,
    };

    match app.state.bulk_action(kind) {
        Some(action) if action.is_destructive() => {
            app.state.confirm = Some(action);
            HandleResult::Continue
        }
        Some(action) => HandleResult::Send(action),
        None => HandleResult::Continue,
    }
}

fn handle_normal(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Char('q') => HandleResult::Quit,

        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            HandleResult::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev();
            HandleResult::Continue
        }

        // Tab switching
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            switch_tab(app, Tab::ALL[index])
        }
        KeyCode::Tab => {
            let next = app.state.tab.next();
            switch_tab(app, next)
        }

        // Filters
        KeyCode::Char('/') => {
            app.enter_search();
            HandleResult::Continue
        }
        KeyCode::Char('s') => {
            app.state.query.service = app.state.query.service.cycle();
            app.cursor = 0;
            HandleResult::Continue
        }
        KeyCode::Char('o') => {
            app.state.query.sort = app.state.query.sort.next();
            app.cursor = 0;
            HandleResult::Continue
        }

        // Selection
        KeyCode::Char(' ') => {
            if let Some(id) = app.current().map(|p| p.id) {
                app.state.toggle_selected(id);
            }
            HandleResult::Continue
        }
        KeyCode::Char('A') => {
            app.state.select_all_visible();
            HandleResult::Continue
        }
        KeyCode::Char('c') => {
            app.state.clear_selection();
            HandleResult::Continue
        }
        KeyCode::Char('b') => {
            app.state.toggle_bulk_menu();
            if !app.state.bulk_menu_open {
                app.state.notice = Some("Select promotions with space first".to_string());
            }
            HandleResult::Continue
        }

        // Per-promotion actions
        KeyCode::Enter => {
            if let Some(id) = app.current().map(|p| p.id) {
                app.state.toggle_details(id);
            }
            HandleResult::Continue
        }
        KeyCode::Char('v') => {
            app.open_review();
            HandleResult::Continue
        }
        KeyCode::Char('y') => match app.current() {
            Some(p) if p.status == PromotionStatus::Pending => {
                HandleResult::Send(Action::approve(p.id, ""))
            }
            Some(_) => {
                app.state.notice = Some("Quick approve is only for pending promotions".to_string());
                HandleResult::Continue
            }
            None => HandleResult::Continue,
        },
        KeyCode::Char('p') => match app.current() {
            Some(p) if p.status == PromotionStatus::Advertised => {
                HandleResult::Send(Action::ToggleActive { id: p.id })
            }
            Some(_) => {
                app.state.notice = Some("Pause/resume applies to advertised promotions".to_string());
                HandleResult::Continue
            }
            None => HandleResult::Continue,
        },
        KeyCode::Char('x') | KeyCode::Delete => {
            if let Some(id) = app.current().map(|p| p.id) {
                app.state.confirm = Some(Action::Delete { id });
            }
            HandleResult::Continue
        }

        KeyCode::Char('r') => HandleResult::Refresh,

        _ => HandleResult::Continue,
    }
}

fn switch_tab(app: &mut App, tab: Tab) -> HandleResult {
    if app.switch_tab(tab) {
        HandleResult::Refresh
    } else {
        HandleResult::Continue
    }
}
