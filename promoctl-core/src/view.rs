//! Client-side list views over fetched promotions.
//!
//! Everything here is a pure function of its inputs: filtering, searching and
//! sorting never mutate the fetched list and never talk to the backend.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::promotion::{Promotion, PromotionStatus, ServiceType};

// ============================================================================
// Tabs
// ============================================================================

/// Status slice fetched from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Pending,
    Approved,
    Advertised,
    Rejected,
    All,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Pending,
        Tab::Approved,
        Tab::Advertised,
        Tab::Rejected,
        Tab::All,
    ];

    /// Status filter sent to the backend (`None` fetches everything)
    pub fn status(&self) -> Option<PromotionStatus> {
        match self {
            Tab::Pending => Some(PromotionStatus::Pending),
            Tab::Approved => Some(PromotionStatus::Approved),
            Tab::Advertised => Some(PromotionStatus::Advertised),
            Tab::Rejected => Some(PromotionStatus::Rejected),
            Tab::All => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Tab::Pending => "pending",
            Tab::Approved => "approved",
            Tab::Advertised => "advertised",
            Tab::Rejected => "rejected",
            Tab::All => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Pending => "Pending Review",
            Tab::Approved => "Approved",
            Tab::Advertised => "Advertised",
            Tab::Rejected => "Rejected",
            Tab::All => "All Promotions",
        }
    }

    pub fn next(self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(idx + 1) % Tab::ALL.len()]
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .iter()
            .copied()
            .find(|tab| tab.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tab '{}'", s))
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Query
// ============================================================================

/// Service type selector; `All` disables the filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServiceFilter {
    #[default]
    All,
    Only(ServiceType),
}

impl ServiceFilter {
    pub fn matches(&self, service: &ServiceType) -> bool {
        match self {
            ServiceFilter::All => true,
            ServiceFilter::Only(wanted) => wanted == service,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ServiceFilter::All)
    }

    pub fn label(&self) -> &str {
        match self {
            ServiceFilter::All => "All Service Types",
            ServiceFilter::Only(service) => service.display_name(),
        }
    }

    /// All → hotel → travel → tour → All
    pub fn cycle(&self) -> ServiceFilter {
        match self {
            ServiceFilter::All => ServiceFilter::Only(ServiceType::Hotel),
            ServiceFilter::Only(ServiceType::Hotel) => ServiceFilter::Only(ServiceType::Travel),
            ServiceFilter::Only(ServiceType::Travel) => ServiceFilter::Only(ServiceType::Tour),
            ServiceFilter::Only(_) => ServiceFilter::All,
        }
    }
}

/// Accepts "all" or a known service key; unknown types are rejected
impl FromStr for ServiceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(ServiceFilter::All);
        }
        ServiceType::KNOWN
            .iter()
            .find(|service| service.key().eq_ignore_ascii_case(s))
            .map(|service| ServiceFilter::Only(service.clone()))
            .ok_or_else(|| format!("unknown service type '{}'", s))
    }
}

/// Display ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Performance,
    Revenue,
    Discount,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::Newest,
        SortOrder::Oldest,
        SortOrder::Performance,
        SortOrder::Revenue,
        SortOrder::Discount,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Performance => "performance",
            SortOrder::Revenue => "revenue",
            SortOrder::Discount => "discount",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest First",
            SortOrder::Oldest => "Oldest First",
            SortOrder::Performance => "Best Performance",
            SortOrder::Revenue => "Highest Revenue",
            SortOrder::Discount => "Highest Discount",
        }
    }

    pub fn next(self) -> SortOrder {
        let idx = SortOrder::ALL.iter().position(|s| *s == self).unwrap_or(0);
        SortOrder::ALL[(idx + 1) % SortOrder::ALL.len()]
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .iter()
            .copied()
            .find(|order| order.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sort order '{}'", s))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Filters and ordering applied to the fetched list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub service: ServiceFilter,
    pub search: String,
    pub sort: SortOrder,
}

impl ViewQuery {
    /// True when the user narrowed the list (search term or service filter)
    pub fn is_narrowed(&self) -> bool {
        !self.search.is_empty() || !self.service.is_all()
    }
}

// ============================================================================
// Filtering & sorting
// ============================================================================

fn contains_term(field: Option<&str>, term_lower: &str) -> bool {
    field
        .map(|value| value.to_lowercase().contains(term_lower))
        .unwrap_or(false)
}

/// Case-insensitive match on title, provider or location
///
/// An empty term matches everything, including records with no title,
/// submitter or location.
pub fn matches_search(promotion: &Promotion, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    contains_term(promotion.title.as_deref(), &term)
        || contains_term(promotion.submitted_by.as_deref(), &term)
        || contains_term(promotion.location.as_deref(), &term)
}

/// Promotions passing the service filter and the search term, in input order
pub fn filter<'a>(promotions: &'a [Promotion], query: &ViewQuery) -> Vec<&'a Promotion> {
    promotions
        .iter()
        .filter(|p| query.service.matches(&p.service_type) && matches_search(p, &query.search))
        .collect()
}

/// Parse the backend's date strings into a sortable timestamp (epoch millis)
pub fn parse_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn submitted_at(promotion: &Promotion) -> Option<i64> {
    promotion.submitted_date.as_deref().and_then(parse_date)
}

/// Dated records first; undated ones keep their relative order at the end
fn compare_dates(a: Option<i64>, b: Option<i64>, newest_first: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if newest_first => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &Promotion, b: &Promotion, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Newest => compare_dates(submitted_at(a), submitted_at(b), true),
        SortOrder::Oldest => compare_dates(submitted_at(a), submitted_at(b), false),
        SortOrder::Performance => b.bookings().cmp(&a.bookings()),
        SortOrder::Revenue => b.revenue().total_cmp(&a.revenue()),
        SortOrder::Discount => b.discount().cmp(&a.discount()),
    }
}

/// Stable sort; ties keep their input order
pub fn sort(promotions: &mut [&Promotion], order: SortOrder) {
    promotions.sort_by(|a, b| compare(a, b, order));
}

/// Filter then sort: the list exactly as the dashboard displays it
pub fn apply<'a>(promotions: &'a [Promotion], query: &ViewQuery) -> Vec<&'a Promotion> {
    let mut visible = filter(promotions, query);
    sort(&mut visible, query.sort);
    visible
}

// ============================================================================
// Statistics
// ============================================================================

/// Header and performance-summary figures over the fetched list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub advertised: usize,
    pub rejected: usize,
    pub total_revenue: f64,
    pub total_bookings: i64,
    pub avg_rating: f64,
    pub service_types: usize,
}

impl Stats {
    pub fn compute(promotions: &[Promotion]) -> Self {
        let count = |status: PromotionStatus| promotions.iter().filter(|p| p.status == status).count();

        let rated: Vec<f64> = promotions
            .iter()
            .map(Promotion::rating)
            .filter(|r| *r > 0.0)
            .collect();
        let avg_rating = if rated.is_empty() {
            0.0
        } else {
            let mean = rated.iter().sum::<f64>() / rated.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        Self {
            total: promotions.len(),
            pending: count(PromotionStatus::Pending),
            approved: count(PromotionStatus::Approved),
            advertised: count(PromotionStatus::Advertised),
            rejected: count(PromotionStatus::Rejected),
            total_revenue: promotions.iter().map(Promotion::revenue).fold(0.0, |acc, r| acc + r),
            total_bookings: promotions.iter().map(Promotion::bookings).sum(),
            avg_rating,
            service_types: ServiceType::KNOWN.len(),
        }
    }

    /// Count shown on a tab badge
    pub fn tab_count(&self, tab: Tab) -> usize {
        match tab {
            Tab::Pending => self.pending,
            Tab::Approved => self.approved,
            Tab::Advertised => self.advertised,
            Tab::Rejected => self.rejected,
            Tab::All => self.total,
        }
    }

    /// Revenue headline in thousands, e.g. "$12K"
    pub fn revenue_thousands(&self) -> String {
        format!("${:.0}K", self.total_revenue / 1000.0)
    }
}

/// Format a money amount with thousands separators ("$12,345.5")
pub fn format_money(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let whole = rounded.trunc().abs() as u64;
    let frac = ((rounded.abs() - whole as f64) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    match frac {
        0 => format!("{}${}", sign, grouped),
        f if f % 10 == 0 => format!("{}${}.{}", sign, grouped, f / 10),
        f => format!("{}${}.{:02}", sign, grouped, f),
    }
}

/// Body text of the "No promotions found" empty state
pub fn empty_state_message(tab: Tab, query: &ViewQuery) -> String {
    if query.is_narrowed() {
        "Try adjusting your filters or search terms.".to_string()
    } else if tab == Tab::All {
        "No promotions available.".to_string()
    } else {
        format!("No {} promotions available.", tab.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo(id: i64, title: &str, service: ServiceType, date: &str) -> Promotion {
        Promotion {
            id,
            title: Some(title.to_string()),
            service_type: service,
            submitted_date: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn ids(list: &[&Promotion]) -> Vec<i64> {
        list.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut p = promo(1, "Summer Escape", ServiceType::Hotel, "2025-01-01");
        p.submitted_by = Some("Blue Lagoon Tours".to_string());
        p.location = Some("Kandy".to_string());

        assert!(matches_search(&p, "summer"));
        assert!(matches_search(&p, "LAGOON"));
        assert!(matches_search(&p, "kan"));
        assert!(!matches_search(&p, "colombo"));
        assert!(matches_search(&p, ""));
    }

    #[test]
    fn test_search_skips_missing_fields() {
        let p = Promotion {
            id: 1,
            ..Default::default()
        };
        assert!(!matches_search(&p, "anything"));
        assert!(matches_search(&p, ""));
    }

    #[test]
    fn test_filter_by_service_and_search() {
        let list = vec![
            promo(1, "Beach Hotel Deal", ServiceType::Hotel, "2025-01-01"),
            promo(2, "Beach Tour", ServiceType::Tour, "2025-01-02"),
            promo(3, "City Hotel", ServiceType::Hotel, "2025-01-03"),
        ];
        let query = ViewQuery {
            service: ServiceFilter::Only(ServiceType::Hotel),
            search: "beach".to_string(),
            sort: SortOrder::Newest,
        };
        assert_eq!(ids(&filter(&list, &query)), vec![1]);
    }

    #[test]
    fn test_sort_newest_and_oldest() {
        let list = vec![
            promo(1, "a", ServiceType::Hotel, "2025-01-02"),
            promo(2, "b", ServiceType::Hotel, "2025-03-01T10:00:00"),
            promo(3, "c", ServiceType::Hotel, "not a date"),
            promo(4, "d", ServiceType::Hotel, "2024-12-31T23:59:59Z"),
        ];
        let mut query = ViewQuery::default();
        assert_eq!(ids(&apply(&list, &query)), vec![2, 1, 4, 3]);

        query.sort = SortOrder::Oldest;
        assert_eq!(ids(&apply(&list, &query)), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_sort_numeric_orders_treat_missing_as_zero() {
        let mut a = promo(1, "a", ServiceType::Hotel, "2025-01-01");
        a.bookings = Some(5);
        a.revenue = Some(10.0);
        a.discount = Some(15);
        let b = promo(2, "b", ServiceType::Hotel, "2025-01-01");
        let mut c = promo(3, "c", ServiceType::Hotel, "2025-01-01");
        c.bookings = Some(9);
        c.revenue = Some(2.5);
        c.discount = Some(40);
        let list = vec![a, b, c];

        let mut query = ViewQuery {
            sort: SortOrder::Performance,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&list, &query)), vec![3, 1, 2]);
        query.sort = SortOrder::Revenue;
        assert_eq!(ids(&apply(&list, &query)), vec![1, 3, 2]);
        query.sort = SortOrder::Discount;
        assert_eq!(ids(&apply(&list, &query)), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_ties_keep_input_order() {
        let list = vec![
            promo(10, "a", ServiceType::Hotel, "2025-01-01"),
            promo(11, "b", ServiceType::Travel, "2025-01-01"),
            promo(12, "c", ServiceType::Tour, "2025-01-01"),
        ];
        assert_eq!(ids(&apply(&list, &ViewQuery::default())), vec![10, 11, 12]);
    }

    #[test]
    fn test_stats() {
        let mut list = vec![
            promo(1, "a", ServiceType::Hotel, "2025-01-01"),
            promo(2, "b", ServiceType::Hotel, "2025-01-01"),
            promo(3, "c", ServiceType::Hotel, "2025-01-01"),
        ];
        list[0].status = PromotionStatus::Pending;
        list[0].rating = Some(4.0);
        list[1].status = PromotionStatus::Advertised;
        list[1].revenue = Some(15_400.0);
        list[1].bookings = Some(12);
        list[1].rating = Some(4.5);
        list[2].status = PromotionStatus::Other("archived".into());

        let stats = Stats::compute(&list);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.advertised, 1);
        assert_eq!(stats.approved, 0);
        assert_eq!(stats.total_bookings, 12);
        assert_eq!(stats.avg_rating, 4.3);
        assert_eq!(stats.revenue_thousands(), "$15K");
        assert_eq!(stats.tab_count(Tab::All), 3);
        assert_eq!(stats.service_types, 3);
    }

    #[test]
    fn test_stats_without_ratings() {
        let stats = Stats::compute(&[]);
        assert_eq!(stats.avg_rating, 0.0);
        assert_eq!(stats.revenue_thousands(), "$0K");
        assert!(stats.total_revenue.is_sign_positive());
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"totalRevenue\":0.0"));
        assert_eq!(format_money(stats.total_revenue), "$0");
    }

    #[test]
    fn test_empty_search_keeps_records_without_text_fields() {
        let bare = Promotion::default();
        assert!(matches_search(&bare, ""));
        assert!(!matches_search(&bare, "spa"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0");
        assert_eq!(format_money(1234567.0), "$1,234,567");
        assert_eq!(format_money(999.5), "$999.5");
        assert_eq!(format_money(1000.25), "$1,000.25");
    }

    #[test]
    fn test_empty_state_message() {
        let mut query = ViewQuery::default();
        assert_eq!(
            empty_state_message(Tab::Pending, &query),
            "No pending promotions available."
        );
        assert_eq!(empty_state_message(Tab::All, &query), "No promotions available.");
        query.service = ServiceFilter::Only(ServiceType::Tour);
        assert_eq!(
            empty_state_message(Tab::Pending, &query),
            "Try adjusting your filters or search terms."
        );
    }

    #[test]
    fn test_tab_parsing_and_status() {
        assert_eq!("ADVERTISED".parse::<Tab>().unwrap(), Tab::Advertised);
        assert!("archived".parse::<Tab>().is_err());
        assert_eq!(Tab::All.status(), None);
        assert_eq!(Tab::Rejected.status(), Some(PromotionStatus::Rejected));
        assert_eq!(Tab::All.next(), Tab::Pending);
    }

    #[test]
    fn test_service_filter_cycle() {
        let mut filter = ServiceFilter::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            filter = filter.cycle();
            seen.push(filter.label().to_string());
        }
        assert_eq!(
            seen,
            vec![
                "Hotels & Accommodation",
                "Travel Services",
                "Tour Packages",
                "All Service Types"
            ]
        );
    }

    #[test]
    fn test_parse_sort_and_service_filter() {
        assert_eq!("Revenue".parse::<SortOrder>().unwrap(), SortOrder::Revenue);
        assert!("rating".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Performance.to_string(), "performance");

        assert_eq!("all".parse::<ServiceFilter>().unwrap(), ServiceFilter::All);
        assert_eq!(
            "TOUR".parse::<ServiceFilter>().unwrap(),
            ServiceFilter::Only(ServiceType::Tour)
        );
        assert!("cruise".parse::<ServiceFilter>().is_err());
    }
}
