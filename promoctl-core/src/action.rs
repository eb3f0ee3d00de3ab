//! Mutations the dashboard can request, and the exact HTTP request each one
//! maps to. Keeping the mapping pure lets it be checked without a backend.

use std::fmt;

use reqwest::Method;
use serde_json::{json, Value};

pub const DEFAULT_APPROVE_COMMENT: &str = "Approved by admin";
pub const DEFAULT_REJECT_COMMENT: &str = "Rejected by admin";

/// A single mutation against the promotions API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Approve { id: i64, comment: String },
    Reject { id: i64, comment: String },
    Advertise { id: i64 },
    ToggleActive { id: i64 },
    Delete { id: i64 },
    BulkApprove(Vec<i64>),
    BulkReject(Vec<i64>),
    BulkDelete(Vec<i64>),
}

/// Bulk operation applied to the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkKind {
    Approve,
    Reject,
    Delete,
}

impl BulkKind {
    pub fn action(self, ids: Vec<i64>) -> Action {
        match self {
            BulkKind::Approve => Action::BulkApprove(ids),
            BulkKind::Reject => Action::BulkReject(ids),
            BulkKind::Delete => Action::BulkDelete(ids),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BulkKind::Approve => "Approve All",
            BulkKind::Reject => "Reject All",
            BulkKind::Delete => "Delete All",
        }
    }
}

/// Empty comments fall back to the default review text
fn comment_or(comment: &str, default: &str) -> String {
    if comment.is_empty() {
        default.to_string()
    } else {
        comment.to_string()
    }
}

impl Action {
    pub fn approve(id: i64, comment: impl Into<String>) -> Self {
        Action::Approve {
            id,
            comment: comment.into(),
        }
    }

    pub fn reject(id: i64, comment: impl Into<String>) -> Self {
        Action::Reject {
            id,
            comment: comment.into(),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Action::Approve { .. }
            | Action::Reject { .. }
            | Action::Advertise { .. }
            | Action::BulkApprove(_)
            | Action::BulkReject(_) => Method::PUT,
            Action::ToggleActive { .. } => Method::PATCH,
            Action::Delete { .. } | Action::BulkDelete(_) => Method::DELETE,
        }
    }

    /// Path relative to the promotions base URL
    pub fn path(&self) -> String {
        match self {
            Action::Approve { id, .. } => format!("/{}/approve", id),
            Action::Reject { id, .. } => format!("/{}/reject", id),
            Action::Advertise { id } => format!("/{}/advertise", id),
            Action::ToggleActive { id } => format!("/{}/toggle-active", id),
            Action::Delete { id } => format!("/{}", id),
            Action::BulkApprove(_) => "/bulk/approve".to_string(),
            Action::BulkReject(_) => "/bulk/reject".to_string(),
            Action::BulkDelete(_) => "/bulk/delete".to_string(),
        }
    }

    /// JSON body, if the endpoint takes one
    pub fn body(&self) -> Option<Value> {
        match self {
            Action::Approve { comment, .. } => Some(json!({
                "reviewComment": comment_or(comment, DEFAULT_APPROVE_COMMENT)
            })),
            Action::Reject { comment, .. } => Some(json!({
                "reviewComment": comment_or(comment, DEFAULT_REJECT_COMMENT)
            })),
            Action::BulkApprove(ids) | Action::BulkReject(ids) | Action::BulkDelete(ids) => {
                Some(json!(ids))
            }
            Action::Advertise { .. } | Action::ToggleActive { .. } | Action::Delete { .. } => None,
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(
            self,
            Action::BulkApprove(_) | Action::BulkReject(_) | Action::BulkDelete(_)
        )
    }

    /// Deletes ask for confirmation before they are sent
    pub fn is_destructive(&self) -> bool {
        matches!(self, Action::Delete { .. } | Action::BulkDelete(_))
    }

    /// Confirmation prompt for destructive actions
    pub fn confirm_prompt(&self) -> Option<String> {
        match self {
            Action::Delete { .. } => Some("Are you sure you want to delete this promotion?".to_string()),
            Action::BulkDelete(ids) => Some(format!("Delete {} promotions?", ids.len())),
            _ => None,
        }
    }

    /// Shown when the backend fails without a message of its own
    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::Approve { .. } => "Failed to approve promotion",
            Action::Reject { .. } => "Failed to reject promotion",
            Action::Advertise { .. } => "Failed to advertise promotion",
            Action::ToggleActive { .. } => "Failed to toggle active status",
            Action::Delete { .. } => "Failed to delete promotion",
            Action::BulkApprove(_) | Action::BulkReject(_) | Action::BulkDelete(_) => {
                "Failed to perform bulk action"
            }
        }
    }

    /// Past-tense summary for logs and status lines
    pub fn success_message(&self) -> String {
        match self {
            Action::Approve { id, .. } => format!("Promotion {} approved", id),
            Action::Reject { id, .. } => format!("Promotion {} rejected", id),
            Action::Advertise { id } => format!("Promotion {} advertised", id),
            Action::ToggleActive { id } => format!("Promotion {} active status toggled", id),
            Action::Delete { id } => format!("Promotion {} deleted", id),
            Action::BulkApprove(ids) => format!("Bulk approve of {} promotions done", ids.len()),
            Action::BulkReject(ids) => format!("Bulk reject of {} promotions done", ids.len()),
            Action::BulkDelete(ids) => format!("Bulk delete of {} promotions done", ids.len()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_uses_default_comment_when_empty() {
        let action = Action::approve(5, "");
        assert_eq!(action.method(), Method::PUT);
        assert_eq!(action.path(), "/5/approve");
        assert_eq!(action.body(), Some(json!({"reviewComment": "Approved by admin"})));
    }

    #[test]
    fn test_reject_keeps_given_comment() {
        let action = Action::reject(9, "Images are low resolution");
        assert_eq!(action.path(), "/9/reject");
        assert_eq!(
            action.body(),
            Some(json!({"reviewComment": "Images are low resolution"}))
        );
    }

    #[test]
    fn test_whitespace_comment_is_sent_verbatim() {
        let action = Action::reject(9, " ");
        assert_eq!(action.body(), Some(json!({"reviewComment": " "})));
    }

    #[test]
    fn test_single_endpoints() {
        assert_eq!(Action::ToggleActive { id: 3 }.method(), Method::PATCH);
        assert_eq!(Action::ToggleActive { id: 3 }.path(), "/3/toggle-active");
        assert_eq!(Action::ToggleActive { id: 3 }.body(), None);

        assert_eq!(Action::Delete { id: 4 }.method(), Method::DELETE);
        assert_eq!(Action::Delete { id: 4 }.path(), "/4");
        assert_eq!(Action::Delete { id: 4 }.body(), None);

        assert_eq!(Action::Advertise { id: 8 }.method(), Method::PUT);
        assert_eq!(Action::Advertise { id: 8 }.path(), "/8/advertise");
    }

    #[test]
    fn test_bulk_endpoints_send_id_lists() {
        let ids = vec![1, 2, 3];
        assert_eq!(
            BulkKind::Approve.action(ids.clone()).to_string(),
            "PUT /bulk/approve"
        );
        assert_eq!(BulkKind::Reject.action(ids.clone()).to_string(), "PUT /bulk/reject");
        let delete = BulkKind::Delete.action(ids.clone());
        assert_eq!(delete.to_string(), "DELETE /bulk/delete");
        assert_eq!(delete.body(), Some(json!([1, 2, 3])));
        assert!(delete.is_bulk());
    }

    #[test]
    fn test_destructive_actions_need_confirmation() {
        assert!(Action::Delete { id: 1 }.is_destructive());
        assert!(Action::BulkDelete(vec![1, 2]).is_destructive());
        assert!(!Action::approve(1, "").is_destructive());
        assert_eq!(
            Action::BulkDelete(vec![1, 2]).confirm_prompt().as_deref(),
            Some("Delete 2 promotions?")
        );
        assert_eq!(Action::ToggleActive { id: 1 }.confirm_prompt(), None);
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(Action::approve(1, "").failure_message(), "Failed to approve promotion");
        assert_eq!(
            Action::BulkReject(vec![]).failure_message(),
            "Failed to perform bulk action"
        );
    }
}
