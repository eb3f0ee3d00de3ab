//! Renderer-independent state of the promotions dashboard.
//!
//! The terminal UI owns one [`DashboardState`] and feeds it user intents and
//! request results. Nothing here performs I/O: mutations come back as
//! [`Action`] values for the caller to send.

use std::collections::HashSet;

use tracing::warn;

use crate::action::{Action, BulkKind};
use crate::error::PromoError;
use crate::promotion::Promotion;
use crate::view::{self, SortOrder, Stats, Tab, ViewQuery};

const STALE_NOTICE: &str = "Out-of-order response";

/// Handle for one list fetch, issued by [`DashboardState::begin_fetch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub tab: Tab,
    pub seq: u64,
}

/// How a finished fetch was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch had already been applied when this one arrived. The
    /// result was still applied and may not belong to the tab on screen.
    Stale { fetched: Tab, current: Tab },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Review modal contents
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub promotion: Promotion,
    pub comment: String,
}

impl ReviewDraft {
    pub fn action(&self, decision: ReviewDecision) -> Action {
        match decision {
            ReviewDecision::Approve => Action::approve(self.promotion.id, self.comment.clone()),
            ReviewDecision::Reject => Action::reject(self.promotion.id, self.comment.clone()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub tab: Tab,
    pub query: ViewQuery,
    promotions: Vec<Promotion>,
    pub loading: bool,
    /// Fetch failure shown as a banner above the list
    pub error: Option<String>,
    /// Transient message for the status line
    pub notice: Option<String>,
    selected: Vec<i64>,
    pub bulk_menu_open: bool,
    expanded: HashSet<i64>,
    review: Option<ReviewDraft>,
    /// Destructive action waiting for a yes/no answer
    pub confirm: Option<Action>,
    latest_seq: u64,
    last_applied_seq: u64,
}

impl DashboardState {
    pub fn new(tab: Tab, sort: SortOrder) -> Self {
        Self {
            tab,
            query: ViewQuery {
                sort,
                ..ViewQuery::default()
            },
            ..Self::default()
        }
    }

    /// Switch tabs; returns true when the tab changed and a fetch is due
    pub fn set_tab(&mut self, tab: Tab) -> bool {
        if self.tab == tab {
            return false;
        }
        self.tab = tab;
        true
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            tab: self.tab,
            seq: self.latest_seq,
        }
    }

    /// Apply a fetch result in arrival order.
    ///
    /// A response older than one already applied is not discarded; it is
    /// reported as [`FetchOutcome::Stale`] so the screen can say the list may
    /// be from another tab. Loading ends when the latest ticket lands.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Promotion>, PromoError>,
    ) -> FetchOutcome {
        match result {
            Ok(promotions) => self.promotions = promotions,
            Err(e) => {
                self.error = Some(e.user_message());
                self.promotions.clear();
            }
        }

        if ticket.seq < self.last_applied_seq {
            warn!(
                fetched = %ticket.tab,
                current = %self.tab,
                seq = ticket.seq,
                applied = self.last_applied_seq,
                "applied out-of-order fetch result"
            );
            self.notice = Some(format!(
                "{}: list may show {} results",
                STALE_NOTICE,
                ticket.tab.label()
            ));
            return FetchOutcome::Stale {
                fetched: ticket.tab,
                current: self.tab,
            };
        }

        self.last_applied_seq = ticket.seq;
        if ticket.seq == self.latest_seq {
            self.loading = false;
            if self
                .notice
                .as_deref()
                .is_some_and(|notice| notice.starts_with(STALE_NOTICE))
            {
                self.notice = None;
            }
        }
        FetchOutcome::Applied
    }

    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }

    /// Filtered and sorted promotions in display order
    pub fn visible(&self) -> Vec<&Promotion> {
        view::apply(&self.promotions, &self.query)
    }

    /// Header stats; computed over the fetched list, not the filtered one
    pub fn stats(&self) -> Stats {
        Stats::compute(&self.promotions)
    }

    pub fn empty_message(&self) -> String {
        view::empty_state_message(self.tab, &self.query)
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn selected(&self) -> &[i64] {
        &self.selected
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    pub fn toggle_selected(&mut self, id: i64) {
        if let Some(pos) = self.selected.iter().position(|&s| s == id) {
            self.selected.remove(pos);
            if self.selected.is_empty() {
                self.bulk_menu_open = false;
            }
        } else {
            self.selected.push(id);
        }
    }

    /// Add every visible promotion that is not yet selected
    pub fn select_all_visible(&mut self) {
        let ids: Vec<i64> = self.visible().iter().map(|p| p.id).collect();
        for id in ids {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.bulk_menu_open = false;
    }

    /// The bulk menu only opens with a non-empty selection
    pub fn toggle_bulk_menu(&mut self) {
        self.bulk_menu_open = !self.bulk_menu_open && !self.selected.is_empty();
    }

    pub fn bulk_action(&self, kind: BulkKind) -> Option<Action> {
        if self.selected.is_empty() {
            return None;
        }
        Some(kind.action(self.selected.clone()))
    }

    // ------------------------------------------------------------------------
    // Details & review
    // ------------------------------------------------------------------------

    pub fn toggle_details(&mut self, id: i64) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded.contains(&id)
    }

    /// Open the review modal pre-filled with the existing review comment
    pub fn open_review(&mut self, promotion: &Promotion) {
        self.review = Some(ReviewDraft {
            promotion: promotion.clone(),
            comment: promotion.review_comment.clone().unwrap_or_default(),
        });
    }

    pub fn close_review(&mut self) {
        self.review = None;
    }

    pub fn review(&self) -> Option<&ReviewDraft> {
        self.review.as_ref()
    }

    pub fn review_mut(&mut self) -> Option<&mut ReviewDraft> {
        self.review.as_mut()
    }

    pub fn review_action(&self, decision: ReviewDecision) -> Option<Action> {
        self.review.as_ref().map(|draft| draft.action(decision))
    }

    /// Record the result of a mutation.
    ///
    /// Returns true when the list should be refetched. A failed review leaves
    /// the modal open so the comment can be corrected and resent.
    pub fn record_action_result(
        &mut self,
        action: &Action,
        result: Result<String, PromoError>,
    ) -> bool {
        match result {
            Ok(message) => {
                match action {
                    Action::Approve { id, .. } | Action::Reject { id, .. } => {
                        if self.review.as_ref().map(|d| d.promotion.id) == Some(*id) {
                            self.review = None;
                        }
                    }
                    _ if action.is_bulk() => self.clear_selection(),
                    _ => {}
                }
                self.notice = Some(message);
                true
            }
            Err(e) => {
                self.notice = Some(e.user_message());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promotion::PromotionStatus;

    fn promo(id: i64, title: &str) -> Promotion {
        Promotion {
            id,
            title: Some(title.to_string()),
            status: PromotionStatus::Pending,
            ..Default::default()
        }
    }

    #[test]
    fn test_selection_toggles_in_insertion_order() {
        let mut state = DashboardState::default();
        state.toggle_selected(3);
        state.toggle_selected(1);
        state.toggle_selected(2);
        state.toggle_selected(1);
        assert_eq!(state.selected(), &[3, 2]);
        assert!(state.is_selected(2));
        assert!(!state.is_selected(1));
    }

    #[test]
    fn test_select_all_visible_respects_filter() {
        let mut state = DashboardState::default();
        let ticket = state.begin_fetch();
        state.finish_fetch(
            ticket,
            Ok(vec![promo(1, "Beach Resort"), promo(2, "City Tour"), promo(3, "Beach Hut")]),
        );
        state.toggle_selected(2);
        state.query.search = "beach".to_string();
        state.select_all_visible();
        assert_eq!(state.selected(), &[2, 1, 3]);
    }

    #[test]
    fn test_bulk_menu_needs_selection() {
        let mut state = DashboardState::default();
        state.toggle_bulk_menu();
        assert!(!state.bulk_menu_open);
        assert_eq!(state.bulk_action(BulkKind::Approve), None);

        state.toggle_selected(7);
        state.toggle_bulk_menu();
        assert!(state.bulk_menu_open);
        assert_eq!(
            state.bulk_action(BulkKind::Delete),
            Some(Action::BulkDelete(vec![7]))
        );
    }

    #[test]
    fn test_successful_bulk_clears_selection() {
        let mut state = DashboardState::default();
        state.toggle_selected(1);
        state.toggle_selected(2);
        state.toggle_bulk_menu();
        let action = BulkKind::Approve.action(state.selected().to_vec());

        let refetch =
            state.record_action_result(&action, Ok("Done\nSuccessful: 2\nFailed: 0".to_string()));
        assert!(refetch);
        assert!(state.selected().is_empty());
        assert!(!state.bulk_menu_open);
    }

    #[test]
    fn test_failed_bulk_keeps_selection() {
        let mut state = DashboardState::default();
        state.toggle_selected(1);
        let action = BulkKind::Reject.action(vec![1]);

        let refetch = state.record_action_result(
            &action,
            Err(PromoError::api(500, "Failed to perform bulk action")),
        );
        assert!(!refetch);
        assert_eq!(state.selected(), &[1]);
        assert_eq!(state.notice.as_deref(), Some("Failed to perform bulk action"));
    }

    #[test]
    fn test_review_draft_lifecycle() {
        let mut state = DashboardState::default();
        let mut p = promo(4, "Spa Weekend");
        p.review_comment = Some("Needs better photos".to_string());

        state.open_review(&p);
        assert_eq!(state.review().unwrap().comment, "Needs better photos");

        state.review_mut().unwrap().comment = "Looks good".to_string();
        let action = state.review_action(ReviewDecision::Approve).unwrap();
        assert_eq!(action, Action::approve(4, "Looks good"));

        // failure keeps the modal open
        state.record_action_result(&action, Err(PromoError::api(400, "Invalid state")));
        assert!(state.review().is_some());

        state.record_action_result(&action, Ok("Promotion approved".to_string()));
        assert!(state.review().is_none());
    }

    #[test]
    fn test_review_without_existing_comment_starts_empty() {
        let mut state = DashboardState::default();
        state.open_review(&promo(5, "Ferry Pass"));
        assert_eq!(state.review().unwrap().comment, "");
        assert_eq!(
            state.review_action(ReviewDecision::Reject),
            Some(Action::reject(5, ""))
        );
    }

    #[test]
    fn test_toggle_details() {
        let mut state = DashboardState::default();
        state.toggle_details(9);
        assert!(state.is_expanded(9));
        state.toggle_details(9);
        assert!(!state.is_expanded(9));
    }

    #[test]
    fn test_stale_fetch_is_applied_but_flagged() {
        let mut state = DashboardState::new(Tab::Pending, SortOrder::Newest);
        let first = state.begin_fetch();
        assert!(state.set_tab(Tab::Rejected));
        let second = state.begin_fetch();

        // the newer request finishes first, then the old one lands on top
        assert_eq!(
            state.finish_fetch(second, Ok(vec![promo(2, "Rejected one")])),
            FetchOutcome::Applied
        );
        let outcome = state.finish_fetch(first, Ok(vec![promo(1, "Pending one")]));
        assert_eq!(
            outcome,
            FetchOutcome::Stale {
                fetched: Tab::Pending,
                current: Tab::Rejected
            }
        );
        assert_eq!(state.promotions()[0].id, 1);
        assert!(state.notice.is_some());
    }

    #[test]
    fn test_older_response_arriving_first_is_applied() {
        let mut state = DashboardState::new(Tab::Pending, SortOrder::Newest);
        let first = state.begin_fetch();
        assert!(state.set_tab(Tab::Rejected));
        let second = state.begin_fetch();

        assert_eq!(
            state.finish_fetch(first, Ok(vec![promo(1, "Pending one")])),
            FetchOutcome::Applied
        );
        // still waiting on the rejected tab
        assert!(state.loading);

        assert_eq!(
            state.finish_fetch(second, Ok(vec![promo(2, "Rejected one")])),
            FetchOutcome::Applied
        );
        assert!(!state.loading);
        assert_eq!(state.promotions()[0].id, 2);
        assert_eq!(state.notice, None);
    }

    #[test]
    fn test_repeated_refresh_in_order_is_not_stale() {
        let mut state = DashboardState::default();
        let first = state.begin_fetch();
        let second = state.begin_fetch();
        assert_eq!(state.finish_fetch(first, Ok(vec![promo(1, "a")])), FetchOutcome::Applied);
        assert_eq!(state.finish_fetch(second, Ok(vec![promo(1, "a")])), FetchOutcome::Applied);
        assert_eq!(state.notice, None);
    }

    #[test]
    fn test_stale_notice_cleared_when_latest_fetch_lands() {
        let mut state = DashboardState::new(Tab::Pending, SortOrder::Newest);
        let first = state.begin_fetch();
        state.set_tab(Tab::Approved);
        let second = state.begin_fetch();
        state.set_tab(Tab::Rejected);
        let third = state.begin_fetch();

        state.finish_fetch(second, Ok(vec![promo(2, "Approved one")]));
        assert!(matches!(
            state.finish_fetch(first, Ok(vec![promo(1, "Pending one")])),
            FetchOutcome::Stale { .. }
        ));
        assert!(state.notice.is_some());
        assert!(state.loading);

        assert_eq!(
            state.finish_fetch(third, Ok(vec![promo(3, "Rejected one")])),
            FetchOutcome::Applied
        );
        assert_eq!(state.notice, None);
        assert!(!state.loading);
    }

    #[test]
    fn test_latest_fetch_keeps_action_notice() {
        let mut state = DashboardState::default();
        let ticket = state.begin_fetch();
        state.notice = Some("Promotion approved successfully".to_string());
        state.finish_fetch(ticket, Ok(vec![]));
        assert_eq!(state.notice.as_deref(), Some("Promotion approved successfully"));
    }

    #[test]
    fn test_fetch_error_sets_banner_and_clears_list() {
        let mut state = DashboardState::default();
        let ticket = state.begin_fetch();
        state.finish_fetch(ticket, Ok(vec![promo(1, "x")]));

        let ticket = state.begin_fetch();
        assert!(state.loading);
        state.finish_fetch(ticket, Err(PromoError::api(500, "Failed to fetch promotions")));
        assert!(!state.loading);
        assert!(state.promotions().is_empty());
        assert_eq!(state.error.as_deref(), Some("Failed to fetch promotions"));
    }

    #[test]
    fn test_set_tab_same_tab_is_noop() {
        let mut state = DashboardState::default();
        assert!(!state.set_tab(Tab::Pending));
        assert!(state.set_tab(Tab::All));
    }
}
