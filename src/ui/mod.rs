use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod tabs;

use crate::app::{App, Focus, InputMode, StatusLevel};
use crate::config;
use crate::domain::event::format_when;
use crate::domain::{ViewId, PAGE_SIZES};
use crate::modules::FormField;

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header_title, areas.header_button, app);
    draw_sidebar(f, areas.sidebar, app);
    tabs::draw_tab_bar(f, areas.tab_bar, app);
    draw_content(f, areas.content, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.form.is_some() {
        draw_form_popup(f, areas.size, app);
    }
    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

/// Label of the auth-aware header button
pub fn session_button_label(app: &App) -> &'static str {
    if app.authenticated {
        "Logout"
    } else {
        "Login"
    }
}

fn draw_header(f: &mut Frame, title_area: Rect, button_area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled(
            "Event Calendar",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Location ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.location.path().to_string()),
        Span::raw("  "),
        Span::styled("API ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.config.api.base_url.clone()),
    ]);
    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let button_style = if app.authenticated {
        Style::default().fg(Color::LightRed)
    } else {
        Style::default().fg(Color::LightGreen)
    };
    let button = Paragraph::new(Line::from(Span::styled(
        session_button_label(app),
        button_style.add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);

    f.render_widget(left, title_area);
    f.render_widget(button, button_area);
}

fn draw_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.focus == Focus::Menu {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let active = app.active_view();
    let items: Vec<ListItem> = app
        .menu_items()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let is_active = Some(entry.id) == active;
            let mut spans = vec![
                Span::styled(format!("{}:", index + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(entry.label),
            ];
            if is_active {
                spans.push(Span::raw(" *"));
            }
            let style = if is_active {
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Menu")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if app.focus == Focus::Menu {
        state.select(Some(app.menu_selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_content(f: &mut Frame, area: Rect, app: &App) {
    if !app.session_ready {
        let loading = Paragraph::new("Loading…")
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(loading, area);
        return;
    }

    match app.active_view() {
        Some(ViewId::Dashboard) => draw_dashboard(f, area, app),
        Some(ViewId::Events) => draw_events(f, area, app),
        Some(ViewId::Profile) => draw_profile(f, area, app),
        Some(ViewId::Settings) => draw_settings(f, area, app),
        None => {
            let empty = Paragraph::new("No open tabs. Pick a view from the menu.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            f.render_widget(empty, area);
        }
    }
}

fn content_block(title: &str, app: &App) -> Block<'static> {
    let border_style = if app.focus == Focus::Content {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let session = if app.authenticated {
        Span::styled("signed in", Style::default().fg(Color::LightGreen))
    } else {
        Span::styled("signed out", Style::default().fg(Color::LightYellow))
    };
    let mut lines = vec![
        Line::from(Span::styled(
            "Welcome to Event Calendar",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Session  ", Style::default().fg(Color::DarkGray)),
            session,
        ]),
        Line::from(vec![
            Span::styled("Tabs     ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.tabs.tabs().len().to_string()),
        ]),
    ];
    if let Some(event) = app.last_created.as_ref() {
        lines.push(Line::from(vec![
            Span::styled("Created  ", Style::default().fg(Color::DarkGray)),
            Span::raw(event.display_title().to_string()),
        ]));
    }
    lines.push(Line::from(""));
    if app.authenticated {
        lines.push(Line::from("Open Events from the menu to browse and create events."));
    } else {
        lines.push(Line::from("Press L or run :login to sign in."));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(content_block("Dashboard", app))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_events(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.events;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    // Filters
    let filter_count = view.query.active_filter_count();
    let search = if view.query.search.is_empty() {
        "--".to_string()
    } else {
        view.query.search.clone()
    };
    let mut filter_spans = vec![
        Span::styled("Search ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{search}  ")),
        Span::styled("Sort ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", view.query.order_by.label())),
        Span::styled("Per page ", Style::default().fg(Color::DarkGray)),
    ];
    for size in PAGE_SIZES {
        let style = if size == view.query.page_size {
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        filter_spans.push(Span::styled(format!("{size} "), style));
    }
    if filter_count > 0 {
        filter_spans.push(Span::styled(
            format!(" [{filter_count} active]"),
            Style::default().fg(Color::LightYellow),
        ));
    }
    let filters = Paragraph::new(Line::from(filter_spans))
        .block(Block::default().title("Filters").borders(Borders::ALL));
    f.render_widget(filters, chunks[0]);

    // Listing
    let title = format!("Events ({})", view.range_label());
    if let Some(error) = view.error.as_ref() {
        let banner = Paragraph::new(vec![
            Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::LightRed),
            )),
            Line::from(Span::styled(
                "Press r to retry",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(content_block(&title, app))
        .wrap(Wrap { trim: true });
        f.render_widget(banner, chunks[1]);
    } else if view.is_loading() && view.page.is_none() {
        let loading = Paragraph::new("Loading events…")
            .block(content_block(&title, app))
            .alignment(Alignment::Center);
        f.render_widget(loading, chunks[1]);
    } else if view.items().is_empty() {
        let hint = if filter_count > 0 {
            "No events match the current filters. Press c to clear them."
        } else {
            "No events yet. Press a to create one."
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(content_block(&title, app))
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = view
            .items()
            .iter()
            .map(|event| {
                let mut lines = vec![Line::from(vec![
                    Span::styled(
                        truncate_str(event.display_title(), 48),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format!("{} → {}", format_when(event.start()), format_when(event.end())),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])];
                if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", truncate_str(description, 72)),
                        Style::default().fg(Color::Gray),
                    )));
                }
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(content_block(&title, app))
            .highlight_style(Style::default().bg(Color::DarkGray));
        let mut state = ListState::default();
        state.select(Some(view.selected));
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    // Pagination
    let pages = view.total_pages().max(1);
    let mut page_spans = vec![
        Span::styled("Page ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{} of {}  ", view.query.page, pages)),
    ];
    if view.has_previous_page() {
        page_spans.push(Span::styled("p:prev ", Style::default().fg(Color::Cyan)));
    }
    if view.has_next_page() {
        page_spans.push(Span::styled("n:next ", Style::default().fg(Color::Cyan)));
    }
    if view.is_loading() {
        page_spans.push(Span::styled("loading…", Style::default().fg(Color::LightYellow)));
    }
    f.render_widget(Paragraph::new(Line::from(page_spans)), chunks[2]);
}

fn draw_profile(f: &mut Frame, area: Rect, app: &App) {
    let client = if app.config.api.client_id.is_empty() {
        "(not configured)".to_string()
    } else {
        app.config.api.client_id.clone()
    };
    let lines = vec![
        Line::from(Span::styled(
            "Profile",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Client   ", Style::default().fg(Color::DarkGray)),
            Span::raw(client),
        ]),
        Line::from(vec![
            Span::styled("Session  ", Style::default().fg(Color::DarkGray)),
            Span::raw(if app.authenticated { "active" } else { "none" }),
        ]),
    ];
    let paragraph = Paragraph::new(Text::from(lines)).block(content_block("Profile", app));
    f.render_widget(paragraph, area);
}

fn draw_settings(f: &mut Frame, area: Rect, app: &App) {
    let path_or_unknown = |path: Option<std::path::PathBuf>| {
        path.map(|path| path.display().to_string())
            .unwrap_or_else(|| "(unknown)".to_string())
    };
    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<14}"), Style::default().fg(Color::DarkGray)),
            Span::raw(value),
        ])
    };
    let lines = vec![
        row("Config file", path_or_unknown(config::config_path())),
        row("Token store", path_or_unknown(config::token_db_path())),
        row("Log file", path_or_unknown(config::log_path())),
        Line::from(""),
        row("API base URL", app.config.api.base_url.clone()),
        row("Client id", app.config.api.client_id.clone()),
        row("Timeout", format!("{}s", app.config.api.timeout_secs)),
        row("Page size", app.config.page_size().to_string()),
        row(
            "Auto login",
            if app.offline { "off" } else { "on" }.to_string(),
        ),
    ];
    let paragraph = Paragraph::new(Text::from(lines))
        .block(content_block("Settings", app))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let active = app
        .tabs
        .active_tab()
        .map(|tab| tab.title)
        .unwrap_or("--");
    let line = Line::from(vec![
        Span::styled("View ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{active}  ")),
        Span::styled("Tabs ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.tabs.tabs().len())),
        Span::styled("Session ", Style::default().fg(Color::DarkGray)),
        Span::raw(if app.authenticated { "yes" } else { "no" }),
    ]);
    let paragraph = Paragraph::new(line)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("goto", "Go to a path (e.g. /events)"),
        ("open", "Open a view: dashboard, events, profile, settings"),
        ("close", "Close the active tab or a named one"),
        ("only", "Close all other tabs"),
        ("back", "Previous location"),
        ("login", "Sign in with the configured client"),
        ("logout", "Sign out"),
        ("refresh", "Reload the events page"),
        ("new", "Create an event"),
        ("search", "Search event titles and descriptions"),
        ("clear", "Reset search and sort"),
        ("sort", "newest | oldest | az | za"),
        ("size", "Events per page: 6, 12, 24, 48"),
        ("page", "Jump to an events page"),
        ("quit", "Exit"),
    ];

    let word = input.split_whitespace().next().unwrap_or("");
    commands
        .iter()
        .find(|(cmd, _)| cmd.starts_with(word))
        .map(|(_, desc)| *desc)
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint = command_hint(&app.command.input);
            let hint_text = hint.unwrap_or("goto, open, close, search, sort, page, ...");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(app.command.input.clone()),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text.to_string(), Style::default().fg(color)),
                ])
            } else {
                action_hints(app)
            }
        }
    };
    f.render_widget(Paragraph::new(content), area);
}

fn action_hints(app: &App) -> Line<'static> {
    let mut hints = vec!["Tab focus", "[ ] tabs", "x close", ": command", "? help"];
    if app.active_view() == Some(ViewId::Events) {
        hints = vec!["j/k select", "n/p page", "/ search", "o sort", "z size", "a add", "r reload"];
    }
    Line::from(Span::styled(
        hints.join("  "),
        Style::default().fg(Color::DarkGray),
    ))
}

fn draw_form_popup(f: &mut Frame, area: Rect, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let popup_area = centered_rect(60, 60, area);
    f.render_widget(Clear, popup_area);

    let mut lines = Vec::new();
    for field in FormField::ALL {
        let focused = field == form.field;
        let marker = if focused { "> " } else { "  " };
        let value = form.value(field);
        let value_span = if value.is_empty() {
            Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(value.to_string())
        };
        let label_style = if focused {
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<14}", field.label()), label_style),
            value_span,
        ]));
    }
    lines.push(Line::from(""));
    if let Some(error) = form.error.as_ref() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::LightYellow),
        )));
    }
    if let Some(error) = form.server_error.as_ref() {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::LightRed),
        )));
    }
    let footer = if form.submitting {
        "Creating…"
    } else if form.draft.is_submittable() {
        "Ctrl-s create  Tab next  Esc cancel"
    } else {
        "Title and both dates are required  Esc cancel"
    };
    lines.push(Line::from(Span::styled(
        footer,
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title("Create New Event")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(72, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Navigation"),
        Line::from("  Tab / h / l  Focus menu or content"),
        Line::from("  j / k        Move selection"),
        Line::from("  Enter        Open menu item"),
        Line::from("  1-4          Open menu item by number"),
        Line::from("  [ / ]        Previous / next tab"),
        Line::from("  x / X        Close tab / close others"),
        Line::from("  Backspace    Back"),
        Line::from("  g            Go to path"),
        Line::from("  L            Login / Logout"),
        Line::from("  Mouse        Click menu, tabs, × and header button"),
        Line::from(""),
        Line::from("Events"),
        Line::from("  n / p        Next / previous page"),
        Line::from("  /            Search"),
        Line::from("  o            Cycle sort order"),
        Line::from("  z            Cycle page size"),
        Line::from("  c            Clear filters"),
        Line::from("  a            Create event"),
        Line::from("  r            Reload"),
        Line::from(""),
        Line::from("Commands"),
        Line::from("  :goto <path>  :open <view>  :close [view]  :only  :back"),
        Line::from("  :login  :logout  :refresh  :new  :search <text>  :clear"),
        Line::from("  :sort <newest|oldest|az|za>  :size <n>  :page <n>  :quit"),
        Line::from(""),
        Line::from("  ?            Toggle help"),
        Line::from("  q            Quit"),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn truncate_str(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    value.chars().take(max).collect::<String>() + "…"
}

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
