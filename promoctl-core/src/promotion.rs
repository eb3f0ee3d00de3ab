//! Promotion records as served by the admin promotions API.
//!
//! The backend owns these records; the client only reads them and asks the
//! backend to move them through their lifecycle:
//!
//! ```text
//! PENDING ──approve──▶ APPROVED ──advertise──▶ ADVERTISED (active ⇄ paused)
//!    │
//!    └────reject────▶ REJECTED
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Status
// ============================================================================

/// Approval status. Parsed case-insensitively; unknown values are kept
/// verbatim so they can still be listed (with a neutral badge).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum PromotionStatus {
    Pending,
    Approved,
    Advertised,
    Rejected,
    Other(String),
}

/// Badge colour family for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Blue,
    Green,
    Yellow,
    Red,
    Gray,
}

impl PromotionStatus {
    pub const KNOWN: [PromotionStatus; 4] = [
        PromotionStatus::Pending,
        PromotionStatus::Approved,
        PromotionStatus::Advertised,
        PromotionStatus::Rejected,
    ];

    /// Uppercase form used in `/status/{STATUS}` and by the backend
    pub fn as_wire(&self) -> String {
        match self {
            PromotionStatus::Pending => "PENDING".to_string(),
            PromotionStatus::Approved => "APPROVED".to_string(),
            PromotionStatus::Advertised => "ADVERTISED".to_string(),
            PromotionStatus::Rejected => "REJECTED".to_string(),
            PromotionStatus::Other(raw) => raw.to_uppercase(),
        }
    }

    /// Lowercase key ("pending", "approved", ...)
    pub fn key(&self) -> String {
        match self {
            PromotionStatus::Other(raw) => raw.to_lowercase(),
            known => known.as_wire().to_lowercase(),
        }
    }

    /// Capitalized display label; the first letter is uppercased and the
    /// rest kept as the backend sent it.
    pub fn label(&self) -> String {
        let raw = match self {
            PromotionStatus::Pending => "pending",
            PromotionStatus::Approved => "approved",
            PromotionStatus::Advertised => "advertised",
            PromotionStatus::Rejected => "rejected",
            PromotionStatus::Other(raw) => raw.as_str(),
        };
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn badge(&self) -> BadgeTone {
        match self {
            PromotionStatus::Approved => BadgeTone::Blue,
            PromotionStatus::Advertised => BadgeTone::Green,
            PromotionStatus::Pending => BadgeTone::Yellow,
            PromotionStatus::Rejected => BadgeTone::Red,
            PromotionStatus::Other(_) => BadgeTone::Gray,
        }
    }

    /// Status hint shown under a promotion card
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            PromotionStatus::Approved => Some("Approved - Awaiting Payment from Provider"),
            PromotionStatus::Advertised => Some("Live Campaign - Generating Revenue"),
            PromotionStatus::Rejected => Some("Rejected - Provider Can Resubmit"),
            PromotionStatus::Pending | PromotionStatus::Other(_) => None,
        }
    }
}

impl Default for PromotionStatus {
    fn default() -> Self {
        PromotionStatus::Other(String::new())
    }
}

impl FromStr for PromotionStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "pending" => PromotionStatus::Pending,
            "approved" => PromotionStatus::Approved,
            "advertised" => PromotionStatus::Advertised,
            "rejected" => PromotionStatus::Rejected,
            _ => PromotionStatus::Other(s.to_string()),
        })
    }
}

impl From<Option<String>> for PromotionStatus {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(raw) => raw.parse().unwrap_or_default(),
            None => PromotionStatus::default(),
        }
    }
}

impl From<PromotionStatus> for String {
    fn from(status: PromotionStatus) -> Self {
        match status {
            PromotionStatus::Other(raw) => raw,
            known => known.as_wire(),
        }
    }
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Service type
// ============================================================================

/// Kind of provider that submitted the promotion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum ServiceType {
    Hotel,
    Travel,
    Tour,
    Other(String),
}

const NEUTRAL_GRAY: (u8, u8, u8) = (0x6b, 0x72, 0x80);

impl ServiceType {
    pub const KNOWN: [ServiceType; 3] = [ServiceType::Hotel, ServiceType::Travel, ServiceType::Tour];

    pub fn key(&self) -> &str {
        match self {
            ServiceType::Hotel => "hotel",
            ServiceType::Travel => "travel",
            ServiceType::Tour => "tour",
            ServiceType::Other(raw) => raw.as_str(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ServiceType::Hotel => "Hotels & Accommodation",
            ServiceType::Travel => "Travel Services",
            ServiceType::Tour => "Tour Packages",
            ServiceType::Other(raw) => raw.as_str(),
        }
    }

    /// Brand colour as RGB; unknown types are neutral gray
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            ServiceType::Hotel => (0x00, 0x88, 0xcc),
            ServiceType::Travel => (0x10, 0xb9, 0x81),
            ServiceType::Tour => (0x8b, 0x5c, 0xf6),
            ServiceType::Other(_) => NEUTRAL_GRAY,
        }
    }

    pub fn color_hex(&self) -> String {
        let (r, g, b) = self.color();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Glyph used in listings; unknown types fall back to the package glyph
    pub fn icon(&self) -> &'static str {
        match self {
            ServiceType::Hotel => "🏨",
            ServiceType::Travel => "✈",
            ServiceType::Tour | ServiceType::Other(_) => "📦",
        }
    }
}

impl Default for ServiceType {
    fn default() -> Self {
        ServiceType::Other(String::new())
    }
}

impl FromStr for ServiceType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "hotel" => ServiceType::Hotel,
            "travel" => ServiceType::Travel,
            "tour" => ServiceType::Tour,
            _ => ServiceType::Other(s.to_string()),
        })
    }
}

impl From<Option<String>> for ServiceType {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(raw) => raw.parse().unwrap_or_default(),
            None => ServiceType::default(),
        }
    }
}

impl From<ServiceType> for String {
    fn from(service: ServiceType) -> Self {
        service.key().to_string()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ============================================================================
// Promotion record
// ============================================================================

/// A provider-submitted promotion, exactly as the backend serves it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Promotion {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub service_type: ServiceType,
    pub discount: Option<i32>,
    pub status: PromotionStatus,
    pub submitted_by: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub submitted_date: Option<String>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
    pub bookings: Option<i64>,
    pub revenue: Option<f64>,
    pub views: Option<i64>,
    pub clicks: Option<i64>,
    pub rating: Option<f64>,
    pub service_provider_id: Option<i64>,
    pub reviewed_by: Option<String>,
    pub reviewed_date: Option<String>,
    pub review_comment: Option<String>,
}

/// Per-card action offered for a promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Review,
    QuickApprove,
    Pause,
    Resume,
    ViewDetails,
    Delete,
}

impl CardAction {
    pub fn label(&self) -> &'static str {
        match self {
            CardAction::Review => "Review",
            CardAction::QuickApprove => "Quick Approve",
            CardAction::Pause => "Pause",
            CardAction::Resume => "Resume",
            CardAction::ViewDetails => "View Details",
            CardAction::Delete => "Delete",
        }
    }
}

impl Promotion {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }

    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(false)
    }

    pub fn bookings(&self) -> i64 {
        self.bookings.unwrap_or(0)
    }

    pub fn revenue(&self) -> f64 {
        self.revenue.unwrap_or(0.0)
    }

    pub fn discount(&self) -> i32 {
        self.discount.unwrap_or(0)
    }

    pub fn rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Actions available on the card for the current status
    pub fn available_actions(&self) -> Vec<CardAction> {
        let mut actions = Vec::new();
        if self.status == PromotionStatus::Pending {
            actions.push(CardAction::Review);
            actions.push(CardAction::QuickApprove);
        }
        actions.push(CardAction::ViewDetails);
        if self.status == PromotionStatus::Advertised {
            actions.push(if self.is_active() {
                CardAction::Pause
            } else {
                CardAction::Resume
            });
        }
        actions.push(CardAction::Delete);
        actions
    }
}

// ============================================================================
// Response envelopes
// ============================================================================

/// Body of `GET /all`, `GET /status/{STATUS}` and `GET /active`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PromotionList {
    pub promotions: Vec<Promotion>,
    pub total: Option<usize>,
    pub status: Option<String>,
}

/// Body returned by single-promotion mutations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MutationResponse {
    pub message: Option<String>,
    pub promotion: Option<Promotion>,
    pub is_active: Option<bool>,
    pub promotion_id: Option<i64>,
}

/// Body returned by the bulk endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BulkResponse {
    pub message: String,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BulkResponse {
    /// Alert text: message followed by the success and failure counts
    pub fn summary(&self) -> String {
        format!(
            "{}\nSuccessful: {}\nFailed: {}",
            self.message, self.successful, self.failed
        )
    }
}

/// Error body sent by the backend on failure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub status: Option<u16>,
    pub timestamp: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!("PENDING".parse::<PromotionStatus>().unwrap(), PromotionStatus::Pending);
        assert_eq!("Advertised".parse::<PromotionStatus>().unwrap(), PromotionStatus::Advertised);
        assert_eq!(
            "ARCHIVED".parse::<PromotionStatus>().unwrap(),
            PromotionStatus::Other("ARCHIVED".to_string())
        );
    }

    #[test]
    fn test_status_badge_mapping() {
        assert_eq!(PromotionStatus::Approved.badge(), BadgeTone::Blue);
        assert_eq!(PromotionStatus::Advertised.badge(), BadgeTone::Green);
        assert_eq!(PromotionStatus::Pending.badge(), BadgeTone::Yellow);
        assert_eq!(PromotionStatus::Rejected.badge(), BadgeTone::Red);
        assert_eq!(PromotionStatus::Other("draft".into()).badge(), BadgeTone::Gray);
        assert_eq!(PromotionStatus::default().badge(), BadgeTone::Gray);
    }

    #[test]
    fn test_status_label_and_wire() {
        assert_eq!(PromotionStatus::Pending.label(), "Pending");
        assert_eq!(PromotionStatus::Rejected.as_wire(), "REJECTED");
        assert_eq!(PromotionStatus::Other("paused".into()).label(), "Paused");
        assert_eq!(PromotionStatus::default().label(), "");
    }

    #[test]
    fn test_status_banner() {
        assert_eq!(PromotionStatus::Pending.banner(), None);
        assert_eq!(
            PromotionStatus::Approved.banner(),
            Some("Approved - Awaiting Payment from Provider")
        );
        assert_eq!(
            PromotionStatus::Advertised.banner(),
            Some("Live Campaign - Generating Revenue")
        );
    }

    #[test]
    fn test_service_type_presentation() {
        assert_eq!(ServiceType::Hotel.display_name(), "Hotels & Accommodation");
        assert_eq!(ServiceType::Hotel.color_hex(), "#0088cc");
        assert_eq!(ServiceType::Travel.color_hex(), "#10b981");
        assert_eq!(ServiceType::Tour.color_hex(), "#8b5cf6");
        assert_eq!(ServiceType::Other("cruise".into()).color_hex(), "#6b7280");
        assert_eq!(ServiceType::Other("cruise".into()).icon(), ServiceType::Tour.icon());
    }

    #[test]
    fn test_deserialize_backend_payload() {
        let value = json!({
            "id": 42,
            "title": "Summer Escape",
            "serviceType": "hotel",
            "discount": 25,
            "status": "PENDING",
            "submittedBy": "Seaside Resort",
            "location": "Galle",
            "submittedDate": "2025-06-01",
            "featured": true,
            "isActive": false,
            "bookings": null,
            "revenue": 1250.5,
            "someFutureField": "ignored"
        });

        let promotion: Promotion = serde_json::from_value(value).unwrap();
        assert_eq!(promotion.id, 42);
        assert_eq!(promotion.service_type, ServiceType::Hotel);
        assert_eq!(promotion.status, PromotionStatus::Pending);
        assert_eq!(promotion.bookings(), 0);
        assert!(promotion.is_featured());
        assert_eq!(promotion.review_comment, None);
    }

    #[test]
    fn test_null_status_is_neutral() {
        let promotion: Promotion = serde_json::from_value(json!({"id": 1, "status": null})).unwrap();
        assert_eq!(promotion.status, PromotionStatus::default());
    }

    #[test]
    fn test_serialize_keeps_wire_forms() {
        let promotion = Promotion {
            id: 7,
            status: PromotionStatus::Advertised,
            service_type: ServiceType::Tour,
            ..Default::default()
        };
        let value = serde_json::to_value(&promotion).unwrap();
        assert_eq!(value["status"], "ADVERTISED");
        assert_eq!(value["serviceType"], "tour");
    }

    #[test]
    fn test_available_actions_by_status() {
        let mut promotion = Promotion {
            status: PromotionStatus::Pending,
            ..Default::default()
        };
        assert_eq!(
            promotion.available_actions(),
            vec![
                CardAction::Review,
                CardAction::QuickApprove,
                CardAction::ViewDetails,
                CardAction::Delete
            ]
        );

        promotion.status = PromotionStatus::Advertised;
        promotion.is_active = Some(true);
        assert!(promotion.available_actions().contains(&CardAction::Pause));

        promotion.is_active = Some(false);
        assert!(promotion.available_actions().contains(&CardAction::Resume));

        promotion.status = PromotionStatus::Rejected;
        assert_eq!(
            promotion.available_actions(),
            vec![CardAction::ViewDetails, CardAction::Delete]
        );
    }

    #[test]
    fn test_bulk_summary() {
        let response = BulkResponse {
            message: "Bulk approval completed".to_string(),
            total: 3,
            successful: 2,
            failed: 1,
        };
        assert_eq!(
            response.summary(),
            "Bulk approval completed\nSuccessful: 2\nFailed: 1"
        );
    }
}
