//! Dashboard application state: the core [`DashboardState`] plus what only
//! the terminal needs (input mode, cursor)

use promoctl_core::{DashboardState, Promotion, SortOrder, Tab};

/// Input mode for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigate the list and trigger actions
    #[default]
    Normal,
    /// Typing into the search box
    Search,
    /// Review modal open, typing the comment
    Review,
}

#[derive(Debug)]
pub struct App {
    pub state: DashboardState,
    pub mode: Mode,
    /// Index into the visible list
    pub cursor: usize,
    pub base_url: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(tab: Tab, sort: SortOrder, base_url: impl Into<String>) -> Self {
        Self {
            state: DashboardState::new(tab, sort),
            mode: Mode::Normal,
            cursor: 0,
            base_url: base_url.into(),
            should_quit: false,
        }
    }

    pub fn visible_len(&self) -> usize {
        self.state.visible().len()
    }

    /// Promotion under the cursor
    pub fn current(&self) -> Option<&Promotion> {
        self.state.visible().get(self.cursor).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Keep the cursor inside the list after it shrinks
    pub fn clamp_cursor(&mut self) {
        let len = self.visible_len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    pub fn enter_search(&mut self) {
        self.mode = Mode::Search;
    }

    pub fn search_insert(&mut self, c: char) {
        self.state.query.search.push(c);
        self.cursor = 0;
    }

    pub fn search_backspace(&mut self) {
        self.state.query.search.pop();
        self.cursor = 0;
    }

    /// Esc in the search box clears the term
    pub fn cancel_search(&mut self) {
        self.state.query.search.clear();
        self.cursor = 0;
        self.mode = Mode::Normal;
    }

    pub fn open_review(&mut self) {
        if let Some(promotion) = self.current().cloned() {
            self.state.open_review(&promotion);
            self.mode = Mode::Review;
        }
    }

    pub fn close_review(&mut self) {
        self.state.close_review();
        self.mode = Mode::Normal;
    }

    /// Leave review mode once a successful decision closed the draft
    pub fn sync_mode(&mut self) {
        if self.mode == Mode::Review && self.state.review().is_none() {
            self.mode = Mode::Normal;
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) -> bool {
        let changed = self.state.set_tab(tab);
        if changed {
            self.cursor = 0;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promoctl_core::{FetchTicket, PromotionStatus};

    fn loaded_app(titles: &[&str]) -> App {
        let mut app = App::new(Tab::Pending, SortOrder::Newest, "http://localhost:8080");
        let promotions = titles
            .iter()
            .enumerate()
            .map(|(i, title)| Promotion {
                id: i as i64 + 1,
                title: Some(title.to_string()),
                status: PromotionStatus::Pending,
                ..Default::default()
            })
            .collect();
        let ticket: FetchTicket = app.state.begin_fetch();
        app.state.finish_fetch(ticket, Ok(promotions));
        app
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut app = loaded_app(&["a", "b"]);
        app.select_next();
        app.select_next();
        assert_eq!(app.cursor, 1);
        app.select_prev();
        app.select_prev();
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_search_narrows_and_clamps() {
        let mut app = loaded_app(&["Beach", "Mountain", "Beach Hut"]);
        app.cursor = 2;
        app.enter_search();
        for c in "hut".chars() {
            app.search_insert(c);
        }
        assert_eq!(app.visible_len(), 1);
        assert_eq!(app.current().map(|p| p.id), Some(3));

        app.cancel_search();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.visible_len(), 3);
    }

    #[test]
    fn test_review_mode_follows_draft() {
        let mut app = loaded_app(&["Beach"]);
        app.open_review();
        assert_eq!(app.mode, Mode::Review);
        app.state.close_review();
        app.sync_mode();
        assert_eq!(app.mode, Mode::Normal);
    }
}
