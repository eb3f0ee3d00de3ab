//! Box-drawing text output for promotions

use std::fmt::Write as _;

use promoctl_core::view::format_money;
use promoctl_core::{Promotion, Stats};

/// One-line card header: id, status, title and markers
pub fn headline(p: &Promotion) -> String {
    let mut line = format!("#{} [{}] {}", p.id, p.status.label(), p.title());
    if p.discount() > 0 {
        let _ = write!(line, "  ({}% OFF)", p.discount());
    }
    if p.is_featured() {
        line.push_str("  ★ Featured");
    }
    line
}

fn provider_line(p: &Promotion) -> String {
    let mut parts = vec![format!("{} {}", p.service_type.icon(), p.service_type.display_name())];
    if let Some(by) = p.submitted_by.as_deref() {
        parts.push(by.to_string());
    }
    if let Some(location) = p.location.as_deref() {
        parts.push(location.to_string());
    }
    parts.join(" · ")
}

fn metrics_line(p: &Promotion) -> String {
    format!(
        "Submitted: {} · Bookings: {} · Revenue: {}",
        p.submitted_date.as_deref().unwrap_or("-"),
        p.bookings(),
        format_money(p.revenue())
    )
}

/// Tree listing in the style of `┌─ title` / `├─ item` / `└─ item`
pub fn promotion_tree(title: &str, promotions: &[&Promotion], empty: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "┌─ {} :: {} promotions", title, promotions.len());
    let _ = writeln!(out, "│");

    if promotions.is_empty() {
        let _ = writeln!(out, "└─ No promotions found");
        let _ = writeln!(out, "   {}", empty);
        return out;
    }

    for (i, p) in promotions.iter().enumerate() {
        let is_last = i == promotions.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let cont = if is_last { "   " } else { "│  " };

        let _ = writeln!(out, "{} {}", prefix, headline(p));
        let _ = writeln!(out, "{}{}", cont, provider_line(p));
        let _ = writeln!(out, "{}{}", cont, metrics_line(p));
        if let Some(banner) = p.status.banner() {
            let _ = writeln!(out, "{}{}", cont, banner);
        }
        if !is_last {
            let _ = writeln!(out, "│");
        }
    }
    out
}

/// Full card: everything the expanded details view shows
pub fn promotion_details(p: &Promotion) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "┌─ {}", headline(p));
    let _ = writeln!(out, "│  {}", provider_line(p));
    if let Some(description) = p.description.as_deref() {
        let _ = writeln!(out, "│  {}", description);
    }
    let _ = writeln!(out, "├──────────────────────────────────────────");
    let _ = writeln!(
        out,
        "│  Submitted:     {}",
        p.submitted_date.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "│  Valid Period:  {} - {}",
        p.valid_from.as_deref().unwrap_or("?"),
        p.valid_to.as_deref().unwrap_or("?")
    );
    if let Some(category) = p.category.as_deref() {
        let _ = writeln!(out, "│  Category:      {}", category);
    }
    if p.status.banner().is_some() && p.is_active.is_some() {
        let state = if p.is_active() { "Active" } else { "Paused" };
        let _ = writeln!(out, "│  Campaign:      {}", state);
    }
    if let Some(by) = p.reviewed_by.as_deref() {
        let _ = writeln!(out, "│  Reviewed by:   {}", by);
    }
    if let Some(date) = p.reviewed_date.as_deref() {
        let _ = writeln!(out, "│  Review Date:   {}", date);
    }
    if let Some(comment) = p.review_comment.as_deref() {
        let _ = writeln!(out, "│  Review Comment: {}", comment);
    }
    let _ = writeln!(
        out,
        "│  Bookings: {} · Revenue: {} · Views: {} · Clicks: {}",
        p.bookings(),
        format_money(p.revenue()),
        p.views.unwrap_or(0),
        p.clicks.unwrap_or(0)
    );
    if let Some(banner) = p.status.banner() {
        let _ = writeln!(out, "│  {}", banner);
    }
    let actions: Vec<&str> = p.available_actions().iter().map(|a| a.label()).collect();
    let _ = writeln!(out, "└─ Actions: {}", actions.join(", "));
    out
}

/// Header counters plus the performance summary
pub fn stats_summary(title: &str, stats: &Stats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "┌─ {}", title);
    let _ = writeln!(out, "│  Total Promotions: {}", stats.total);
    let _ = writeln!(out, "│  Pending:          {}", stats.pending);
    let _ = writeln!(out, "│  Approved:         {}", stats.approved);
    let _ = writeln!(out, "│  Advertised:       {}", stats.advertised);
    let _ = writeln!(out, "│  Rejected:         {}", stats.rejected);
    let _ = writeln!(out, "│  Total Revenue:    {}", stats.revenue_thousands());
    let _ = writeln!(out, "│  Total Bookings:   {}", stats.total_bookings);
    let _ = writeln!(out, "├─ Performance Summary");
    let _ = writeln!(out, "│  Service Types:    {}", stats.service_types);
    let _ = writeln!(out, "│  Revenue:          {}", format_money(stats.total_revenue));
    let _ = writeln!(out, "└─ Avg Rating:       {:.1}", stats.avg_rating);
    out
}
