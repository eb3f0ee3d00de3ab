//! UI rendering using ratatui

use promoctl_core::view::format_money;
use promoctl_core::{Action, BadgeTone, Promotion, Stats, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use super::app::{App, Mode};

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for selected items
const HIGHLIGHT: Color = Color::Yellow;
/// Success color
const SUCCESS: Color = Color::Green;
/// Error and destructive color
const DANGER: Color = Color::Red;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let stats = app.state.stats();
    let error_height = if app.state.error.is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Length(3),            // Stat cards
            Constraint::Length(error_height), // Error banner
            Constraint::Length(3),            // Tabs
            Constraint::Length(1),            // Search / filters
            Constraint::Min(8),               // List + details
            Constraint::Length(1),            // Performance summary
            Constraint::Length(1),            // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, &stats, chunks[0]);
    render_stats(frame, &stats, chunks[1]);
    if let Some(error) = &app.state.error {
        render_error(frame, error, chunks[2]);
    }
    render_tabs(frame, app, &stats, chunks[3]);
    render_filters(frame, app, chunks[4]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[5]);
    render_list(frame, app, content[0]);
    render_details(frame, app, content[1]);

    render_performance(frame, &stats, chunks[6]);
    render_status_bar(frame, app, chunks[7]);

    // Overlays
    if app.state.bulk_menu_open {
        render_bulk_menu(frame, app);
    }
    if app.mode == Mode::Review {
        render_review(frame, app);
    }
    if let Some(action) = &app.state.confirm {
        render_confirm(frame, action);
    }
}

fn badge_color(tone: BadgeTone) -> Color {
    match tone {
        BadgeTone::Blue => Color::Blue,
        BadgeTone::Green => SUCCESS,
        BadgeTone::Yellow => HIGHLIGHT,
        BadgeTone::Red => DANGER,
        BadgeTone::Gray => SECONDARY,
    }
}

fn service_color(p: &Promotion) -> Color {
    let (r, g, b) = p.service_type.color();
    Color::Rgb(r, g, b)
}

fn bordered(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn render_header(frame: &mut Frame, app: &App, stats: &Stats, area: Rect) {
    let mut spans = vec![
        Span::styled(app.base_url.as_str(), Style::default().fg(DIM)),
        Span::raw("  "),
        Span::styled(
            format!("{} Pending Review", stats.pending),
            Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
        ),
    ];
    if app.state.loading {
        spans.push(Span::styled("  Loading promotions...", Style::default().fg(ACCENT)));
    }

    let block = Block::default()
        .title(" Admin Promotions Dashboard ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_stats(frame: &mut Frame, stats: &Stats, area: Rect) {
    let cards = [
        ("Total", stats.total.to_string(), Color::White),
        ("Pending", stats.pending.to_string(), HIGHLIGHT),
        ("Approved", stats.approved.to_string(), Color::Blue),
        ("Advertised", stats.advertised.to_string(), SUCCESS),
        ("Revenue", stats.revenue_thousands(), ACCENT),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    for ((label, value, color), column) in cards.into_iter().zip(columns.iter()) {
        let line = Line::from(vec![
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}", label), Style::default().fg(DIM)),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(SECONDARY));
        frame.render_widget(Paragraph::new(line).block(block), *column);
    }
}

fn render_error(frame: &mut Frame, error: &str, area: Rect) {
    let paragraph = Paragraph::new(Span::styled(error, Style::default().fg(DANGER)))
        .block(bordered(" Error ", DANGER));
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, stats: &Stats, area: Rect) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{}:{} ({})", i + 1, tab.label(), stats.tab_count(*tab)))
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == app.state.tab).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(SECONDARY)),
        )
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
    let query = &app.state.query;
    let searching = app.mode == Mode::Search;

    let search = if searching {
        format!("{}|", query.search)
    } else if query.search.is_empty() {
        "-".to_string()
    } else {
        query.search.clone()
    };

    let mut spans = vec![
        Span::styled(" Search: ", Style::default().fg(DIM)),
        Span::styled(
            search,
            if searching {
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            },
        ),
        Span::styled("  Service: ", Style::default().fg(DIM)),
        Span::styled(query.service.label().to_string(), Style::default().fg(Color::White)),
        Span::styled("  Sort: ", Style::default().fg(DIM)),
        Span::styled(query.sort.label(), Style::default().fg(Color::White)),
    ];

    let selected = app.state.selected().len();
    if selected > 0 {
        spans.push(Span::styled(
            format!("  {} selected (b: bulk actions, c: clear)", selected),
            Style::default().fg(HIGHLIGHT),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn list_row(app: &App, p: &Promotion) -> ListItem<'static> {
    let check = if app.state.is_selected(p.id) { "[x]" } else { "[ ]" };
    let mut spans = vec![
        Span::styled(format!("{} ", check), Style::default().fg(HIGHLIGHT)),
        Span::styled(
            format!("{} ", p.service_type.icon()),
            Style::default().fg(service_color(p)),
        ),
        Span::styled(
            format!("{:<10} ", p.status.label()),
            Style::default().fg(badge_color(p.status.badge())),
        ),
        Span::styled(format!("#{} ", p.id), Style::default().fg(DIM)),
        Span::styled(p.title().to_string(), Style::default().fg(Color::White)),
    ];
    if p.discount() > 0 {
        spans.push(Span::styled(
            format!("  {}% OFF", p.discount()),
            Style::default().fg(DANGER).add_modifier(Modifier::BOLD),
        ));
    }
    if p.is_featured() {
        spans.push(Span::styled("  ★", Style::default().fg(HIGHLIGHT)));
    }
    if let Some(by) = p.submitted_by.as_deref() {
        spans.push(Span::styled(format!("  {}", by), Style::default().fg(DIM)));
    }
    ListItem::new(Line::from(spans))
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.state.visible();
    let title = format!(" {} :: {} ", app.state.tab.label(), visible.len());
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    if visible.is_empty() {
        let text = if app.state.loading {
            Text::from(Span::styled("  Loading promotions...", Style::default().fg(DIM)))
        } else {
            Text::from(vec![
                Line::from(Span::styled(
                    "  No promotions found",
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}", app.state.empty_message()),
                    Style::default().fg(DIM),
                )),
            ])
        };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let items: Vec<ListItem> = visible.iter().map(|p| list_row(app, p)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().fg(DIM)),
        Span::styled(value.into(), Style::default().fg(Color::White)),
    ])
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Details ")
        .title_style(Style::default().fg(SECONDARY))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY));

    let Some(p) = app.current() else {
        let hint = Paragraph::new(Span::styled("Select a promotion", Style::default().fg(DIM)))
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            p.title().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("{} {}", p.service_type.icon(), p.service_type.display_name()),
                Style::default().fg(service_color(p)),
            ),
            Span::raw("  "),
            Span::styled(p.status.label(), Style::default().fg(badge_color(p.status.badge()))),
        ]),
        Line::from(""),
    ];
    if let Some(description) = p.description.as_deref() {
        lines.push(Line::from(description.to_string()));
        lines.push(Line::from(""));
    }

    lines.push(field("Provider", p.submitted_by.clone().unwrap_or_else(|| "-".into())));
    lines.push(field("Location", p.location.clone().unwrap_or_else(|| "-".into())));
    lines.push(field("Submitted", p.submitted_date.clone().unwrap_or_else(|| "-".into())));
    lines.push(field("Bookings", p.bookings().to_string()));
    lines.push(field("Revenue", format_money(p.revenue())));

    if app.state.is_expanded(p.id) {
        lines.push(field(
            "Valid Period",
            format!(
                "{} - {}",
                p.valid_from.as_deref().unwrap_or("?"),
                p.valid_to.as_deref().unwrap_or("?")
            ),
        ));
        if let Some(category) = p.category.as_deref() {
            lines.push(field("Category", category));
        }
        lines.push(field("Views", p.views.unwrap_or(0).to_string()));
        lines.push(field("Clicks", p.clicks.unwrap_or(0).to_string()));
        if p.rating() > 0.0 {
            lines.push(field("Rating", format!("{:.1}", p.rating())));
        }
        if let Some(by) = p.reviewed_by.as_deref() {
            lines.push(field("Reviewed by", by));
        }
        if let Some(date) = p.reviewed_date.as_deref() {
            lines.push(field("Review Date", date));
        }
        if let Some(comment) = p.review_comment.as_deref() {
            lines.push(field("Comment", comment));
        }
    } else {
        lines.push(Line::from(Span::styled("Enter: more details", Style::default().fg(DIM))));
    }

    if let Some(banner) = p.status.banner() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            banner,
            Style::default().fg(badge_color(p.status.badge())),
        )));
    }

    lines.push(Line::from(""));
    let actions: Vec<&str> = p.available_actions().iter().map(|a| a.label()).collect();
    lines.push(Line::from(vec![
        Span::styled("Actions: ", Style::default().fg(DIM)),
        Span::styled(actions.join(" · "), Style::default().fg(ACCENT)),
    ]));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_performance(frame: &mut Frame, stats: &Stats, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" Service Types: ", Style::default().fg(DIM)),
        Span::raw(stats.service_types.to_string()),
        Span::styled("  Total Bookings: ", Style::default().fg(DIM)),
        Span::raw(stats.total_bookings.to_string()),
        Span::styled("  Revenue: ", Style::default().fg(DIM)),
        Span::raw(format_money(stats.total_revenue)),
        Span::styled("  Avg Rating: ", Style::default().fg(DIM)),
        Span::raw(format!("{:.1}", stats.avg_rating)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_indicator = match app.mode {
        Mode::Normal => Span::styled(" NORMAL ", Style::default().bg(ACCENT).fg(Color::Black)),
        Mode::Search => Span::styled(" SEARCH ", Style::default().bg(Color::Magenta).fg(Color::Black)),
        Mode::Review => Span::styled(" REVIEW ", Style::default().bg(HIGHLIGHT).fg(Color::Black)),
    };

    let help_text = match app.mode {
        Mode::Normal => {
            "1-5:tab /:search s:service o:sort space:select b:bulk v:review y:approve p:pause x:delete r:refresh q:quit"
        }
        Mode::Search => "Type to filter  Enter:apply  Esc:clear",
        Mode::Review => "Ctrl+A:approve  Ctrl+R:reject  Esc:cancel",
    };

    // Bulk summaries are multi-line
    let notice = app
        .state
        .notice
        .as_deref()
        .map(|n| n.replace('\n', " · "))
        .unwrap_or_default();

    let line = if notice.is_empty() {
        Line::from(vec![
            mode_indicator,
            Span::raw(" "),
            Span::styled(help_text, Style::default().fg(DIM)),
        ])
    } else {
        Line::from(vec![
            mode_indicator,
            Span::raw(" "),
            Span::styled(notice, Style::default().fg(HIGHLIGHT)),
        ])
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Centered popup area of the given size
fn popup(frame: &Frame, width: u16, height: u16) -> Rect {
    let area = frame.area();
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn render_bulk_menu(frame: &mut Frame, app: &App) {
    let area = popup(frame, 40, 7);
    frame.render_widget(Clear, area);

    let title = format!(" Bulk Actions ({}) ", app.state.selected().len());
    let lines = vec![
        Line::from(vec![
            Span::styled(" [a] ", Style::default().fg(HIGHLIGHT)),
            Span::raw("Approve All"),
        ]),
        Line::from(vec![
            Span::styled(" [r] ", Style::default().fg(HIGHLIGHT)),
            Span::raw("Reject All"),
        ]),
        Line::from(vec![
            Span::styled(" [d] ", Style::default().fg(HIGHLIGHT)),
            Span::styled("Delete All", Style::default().fg(DANGER)),
        ]),
        Line::from(Span::styled(" Esc to close", Style::default().fg(DIM))),
    ];
    frame.render_widget(Paragraph::new(lines).block(bordered(&title, HIGHLIGHT)), area);
}

fn render_review(frame: &mut Frame, app: &App) {
    let Some(draft) = app.state.review() else {
        return;
    };
    let area = popup(frame, 70, 18);
    frame.render_widget(Clear, area);

    let p = &draft.promotion;
    let mut lines = vec![
        Line::from(Span::styled(
            p.title().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} · {} · {}",
                p.service_type.display_name(),
                p.submitted_by.as_deref().unwrap_or("-"),
                p.location.as_deref().unwrap_or("-")
            ),
            Style::default().fg(DIM),
        )),
    ];
    if let Some(description) = p.description.as_deref() {
        lines.push(Line::from(description.to_string()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Review Comment:", Style::default().fg(ACCENT))));
    for (i, text) in draft.comment.split('\n').enumerate() {
        let last = i == draft.comment.matches('\n').count();
        let text = if last { format!("{}|", text) } else { text.to_string() };
        lines.push(Line::from(text));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Ctrl+A ", Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)),
        Span::raw("Approve  "),
        Span::styled("Ctrl+R ", Style::default().fg(DANGER).add_modifier(Modifier::BOLD)),
        Span::raw("Reject  "),
        Span::styled("Esc ", Style::default().fg(DIM)),
        Span::raw("Cancel"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(bordered(" Review Promotion ", HIGHLIGHT))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_confirm(frame: &mut Frame, action: &Action) {
    let prompt = action
        .confirm_prompt()
        .unwrap_or_else(|| format!("{}?", action));
    let area = popup(frame, 60, 6);
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(prompt),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] ", Style::default().fg(DANGER).add_modifier(Modifier::BOLD)),
            Span::raw("Yes  "),
            Span::styled("[n] ", Style::default().fg(SUCCESS)),
            Span::raw("No"),
        ]),
    ];
    let paragraph = Paragraph::new(lines)
        .block(bordered(" Confirm ", DANGER))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use promoctl_core::{PromotionStatus, SortOrder};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> String {
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_empty_tab_shows_empty_state() {
        let mut app = App::new(Tab::Rejected, SortOrder::Newest, "http://localhost:8080");
        let ticket = app.state.begin_fetch();
        app.state.finish_fetch(ticket, Ok(Vec::new()));

        let text = screen(&app);
        assert!(text.contains("No promotions found"));
        assert!(text.contains("No rejected promotions available."));
    }

    #[test]
    fn test_list_shows_promotion_and_tab_counts() {
        let mut app = App::new(Tab::All, SortOrder::Newest, "http://localhost:8080");
        let ticket = app.state.begin_fetch();
        app.state.finish_fetch(
            ticket,
            Ok(vec![Promotion {
                id: 7,
                title: Some("Summer Sale".to_string()),
                status: PromotionStatus::Pending,
                discount: Some(20),
                ..Default::default()
            }]),
        );

        let text = screen(&app);
        assert!(text.contains("Summer Sale"));
        assert!(text.contains("20% OFF"));
        assert!(text.contains("1 Pending Review"));
        assert!(text.contains("All Promotions (1)"));
    }

    #[test]
    fn test_confirm_popup_renders_prompt() {
        let mut app = App::new(Tab::All, SortOrder::Newest, "http://localhost:8080");
        app.state.confirm = Some(Action::Delete { id: 3 });
        let text = screen(&app);
        assert!(text.contains("Confirm"));
    }
}
