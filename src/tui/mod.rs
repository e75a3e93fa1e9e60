// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use helpers::{calculate_progress, position_label, row_to_px, ROW_PX};
pub use input::{
    handle_key_event, handle_mouse_event, handle_search_input, GestureAction, KeyAction,
    SearchAction,
};

use crate::domain::{
    neighbours, slot_offset, CardSlot, FeedCursor, FeedFilter, VacancyItem, WrapPolicy,
    TAG_CATALOG,
};
use crate::refresh::RefreshStatus;
use helpers::{format_tags, shifted_rect, slot_rows, title_with_badge};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main feed view
    Browsing,
    /// Typing into the search box
    Search,
    /// Help overlay visible
    Help,
    /// Welcome screen shown on first launch
    Welcome,
}

/// Everything one frame of the feed screen reads
#[derive(Debug, Clone, Copy)]
pub struct FeedFrame<'a> {
    /// The filtered, sorted feed
    pub items: &'a [VacancyItem],
    pub cursor: FeedCursor,
    pub threshold: f32,
    pub policy: WrapPolicy,
    pub filter: &'a FeedFilter,
    pub searching: bool,
    pub refresh: Option<&'a RefreshStatus>,
}

impl<'a> FeedFrame<'a> {
    fn current(&self) -> Option<(usize, &'a VacancyItem)> {
        let index = self.cursor.current_index?;
        self.items.get(index).map(|item| (index, item))
    }
}

/// Renders the feed screen
pub fn render(frame: &mut Frame, feed: &FeedFrame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header with progress
            Constraint::Length(4), // Filter bar
            Constraint::Min(0),    // Cards
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], feed);
    render_filter_bar(frame, chunks[1], feed);
    render_cards(frame, chunks[2], feed);
    render_footer(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, area: Rect, feed: &FeedFrame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let total = feed.items.len();
    // The top border leaves a single text row, so everything shares one line
    let mut info = vec![
        Span::styled(
            " Jobswp ",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!(
                "Vacancy {}",
                position_label(feed.cursor.current_index, total)
            ),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some((_, item)) = feed.current() {
        if let Some(badge) = item.employer_tier.badge() {
            info.push(Span::raw("  "));
            info.push(Span::styled(
                format!("{} {}", badge, item.employer_tier.label()),
                Style::default().fg(tier_border_color(item.employer_tier)),
            ));
        }
    }

    match feed.refresh {
        Some(RefreshStatus::Loading) => {
            info.push(Span::raw("  "));
            info.push(Span::styled(
                "⟳ refreshing",
                Style::default().fg(ACCENT_HIGHLIGHT),
            ));
        }
        Some(RefreshStatus::Failed(_)) => {
            info.push(Span::raw("  "));
            info.push(Span::styled(
                "refresh failed",
                Style::default().fg(ACCENT_PRIMARY),
            ));
        }
        Some(RefreshStatus::Idle) | None => {}
    }

    let header = Paragraph::new(Line::from(info))
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(header, chunks[0]);

    let progress = calculate_progress(feed.cursor.current_index, total);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(progress)
        .label(position_label(feed.cursor.current_index, total));

    frame.render_widget(gauge, chunks[1]);
}

fn render_filter_bar(frame: &mut Frame, area: Rect, feed: &FeedFrame) {
    let search_style = if feed.searching {
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_PRIMARY)
    };
    let search_text = if feed.searching {
        format!("{}▏", feed.filter.search)
    } else if feed.filter.search.is_empty() {
        "-".to_string()
    } else {
        feed.filter.search.clone()
    };
    let city = feed
        .filter
        .city
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or("all");

    let first = Line::from(vec![
        Span::styled(" Search: ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled(search_text, search_style),
        Span::raw("  │  "),
        Span::styled("City: ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled(city.to_string(), Style::default().fg(TEXT_PRIMARY)),
    ]);

    let mut tags = vec![Span::raw(" ")];
    for (i, tag) in TAG_CATALOG.iter().enumerate() {
        let style = if feed.filter.tags.contains(*tag) {
            Style::default()
                .fg(ACCENT_SECONDARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };
        tags.push(Span::styled(format!("{}:{}", i + 1, tag), style));
        tags.push(Span::raw(" "));
    }

    let bar = Paragraph::new(vec![first, Line::from(tags)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if feed.searching {
                ACCENT_HIGHLIGHT
            } else {
                BORDER_COLOR
            }))
            .title(" Filters "),
    );

    frame.render_widget(bar, area);
}

/// Draws the active card, displaced by the live drag, and the strip of the
/// incoming neighbour the drag uncovers.
fn render_cards(frame: &mut Frame, area: Rect, feed: &FeedFrame) {
    let Some((index, item)) = feed.current() else {
        frame.render_widget(render_empty_state_widget(), area);
        return;
    };
    let total = feed.items.len();
    let live = feed.cursor.live_offset;

    let shift = slot_rows(
        slot_offset(CardSlot::Active, live, feed.threshold),
        area.height,
    );
    if let Some(rect) = shifted_rect(area, shift) {
        let scroll = if shift < 0 { (-shift) as u16 } else { 0 };
        frame.render_widget(card_widget(item, index, total).scroll((scroll, 0)), rect);
    }

    let (previous, next) = neighbours(index, total, feed.policy);
    let incoming = if live < 0.0 {
        next.map(|i| (i, CardSlot::Next))
    } else if live > 0.0 {
        previous.map(|i| (i, CardSlot::Previous))
    } else {
        None
    };

    if let Some((i, slot)) = incoming {
        let offset = slot_rows(slot_offset(slot, live, feed.threshold), area.height);
        if let (Some(strip), Some(neighbour)) = (shifted_rect(area, offset), feed.items.get(i)) {
            frame.render_widget(Clear, strip);
            frame.render_widget(peek_widget(neighbour), strip);
        }
    }
}

/// Full vacancy card
fn card_widget(item: &VacancyItem, index: usize, total: usize) -> Paragraph<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            title_with_badge(item),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("📍 {}", item.city), Style::default().fg(TEXT_SECONDARY)),
            Span::raw("   "),
            Span::styled(
                format!("💰 {}", item.salary),
                Style::default()
                    .fg(ACCENT_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    if !item.tags.is_empty() {
        lines.push(Line::from(Span::styled(
            format_tags(&item.tags),
            Style::default().fg(ACCENT_HIGHLIGHT),
        )));
    }

    let sections = [
        ("Description", &item.description),
        ("Requirements", &item.requirements),
        ("Responsibilities", &item.responsibilities),
        ("Experience", &item.experience),
        ("Schedule", &item.schedule),
    ];
    for (label, value) in sections {
        if let Some(text) = value.as_deref().filter(|t| !t.is_empty()) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                label,
                Style::default()
                    .fg(TEXT_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(text.to_string()));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Employer: ", Style::default().fg(TEXT_SECONDARY)),
        Span::raw(item.employer_name.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Phone: ", Style::default().fg(TEXT_SECONDARY)),
        Span::raw(item.phone.clone()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Swipe up/down ({}/{})", index + 1, total),
        Style::default()
            .fg(TEXT_SECONDARY)
            .add_modifier(Modifier::ITALIC),
    )));

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(tier_border_color(item.employer_tier))),
        )
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false })
}

/// Header-only rendition of a neighbouring card
fn peek_widget(item: &VacancyItem) -> Paragraph<'static> {
    let lines = vec![
        Line::from(Span::styled(
            title_with_badge(item),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} · {}", item.city, item.salary),
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tier_border_color(item.employer_tier)))
            .style(Style::default().bg(BG_DARK)),
    )
}

/// Creates an empty state widget for when no vacancy passes the filters
fn render_empty_state_widget() -> Paragraph<'static> {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "No vacancies found",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Try another search or fewer filters.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press x to clear filters, r to refresh.",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center)
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
    };
    let label = |l: &'static str| Span::styled(l, Style::default().fg(TEXT_SECONDARY));

    let controls = Line::from(vec![
        key(" ↑↓ "),
        label("Swipe"),
        Span::raw("  │  "),
        key("/ "),
        label("Search"),
        Span::raw("  │  "),
        key("1-6 "),
        label("Tags"),
        Span::raw("  │  "),
        key("c "),
        label("City"),
        Span::raw("  │  "),
        key("r "),
        label("Refresh"),
        Span::raw("  │  "),
        key("? "),
        label("Help"),
        Span::raw("  │  "),
        key("q "),
        label("Quit"),
    ]);

    let footer = Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();
    let help_area = centered_rect(60, 80, area);

    // Clear background
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(
                format!("{:<14}", keys),
                Style::default().fg(ACCENT_HIGHLIGHT),
            ),
            Span::raw(what),
        ])
    };

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard and Mouse",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        entry("↓ j PgDn", "Next vacancy"),
        entry("↑ k PgUp", "Previous vacancy"),
        entry("drag", "Drag a card up or down to swipe"),
        Line::from(""),
        entry("/", "Search (Enter or Esc to finish)"),
        entry("1-6", "Toggle a tag filter"),
        entry("c", "Next city"),
        entry("x", "Clear filters"),
        entry("r", "Refresh from remote feeds"),
        Line::from(""),
        entry("?", "Toggle help"),
        entry("q Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Left)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame) {
    let area = centered_rect(80, 70, frame.area());

    // Clear background
    frame.render_widget(Clear, area);

    let welcome_lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "Welcome to jobswp!",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("One vacancy per card. Premium and VIP employers come first."),
        Line::from(""),
        Line::from(vec![
            Span::styled("  1. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Drag a card up with the mouse, or press "),
            Span::styled("↓", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(", to see the next one"),
        ]),
        Line::from(vec![
            Span::styled("  2. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Narrow the feed with "),
            Span::styled("/", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(" search, "),
            Span::styled("1-6", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(" tags and "),
            Span::styled("c", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(" city"),
        ]),
        Line::from(vec![
            Span::styled("  3. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Call the phone on the card you like"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  👑 ", Style::default().fg(TIER_PREMIUM)),
            Span::raw("Premium employer   "),
            Span::styled("⭐ ", Style::default().fg(TIER_VIP)),
            Span::raw("VIP employer"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to start browsing...",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )]),
    ];

    let welcome_text = Paragraph::new(welcome_lines)
        .block(
            Block::default()
                .title(Span::styled(
                    " Welcome ",
                    Style::default()
                        .fg(ACCENT_HIGHLIGHT)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
                .style(Style::default().bg(BG_DARK)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(welcome_text, area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
