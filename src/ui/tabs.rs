//! Tab bar rendering and hit-testing

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::domain::ViewId;

const DIVIDER: &str = "│";
const CLOSE_MARKER: &str = "×";

/// Screen columns occupied by one tab label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabHit {
    pub id: ViewId,
    pub x: u16,
    pub width: u16,
    /// Column of the close marker; absent when the tab cannot be closed
    pub close_x: Option<u16>,
}

/// What a click on the tab bar landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabClick {
    Activate(ViewId),
    Close(ViewId),
}

fn label(title: &str, closable: bool) -> String {
    if closable {
        format!(" {title} {CLOSE_MARKER} ")
    } else {
        format!(" {title} ")
    }
}

/// Lay the tab labels out from `area.x` (the area inside the border)
pub fn tab_hits(app: &App, area: Rect) -> Vec<TabHit> {
    let mut hits = Vec::new();
    let mut x = area.x;
    for tab in app.tabs.tabs() {
        let closable = app.tabs.is_closable(tab.id);
        let width = label(tab.title, closable).chars().count() as u16;
        let close_x = closable.then(|| x + width.saturating_sub(2));
        hits.push(TabHit {
            id: tab.id,
            x,
            width,
            close_x,
        });
        x = x.saturating_add(width + DIVIDER.chars().count() as u16);
    }
    hits
}

pub fn click_at(app: &App, area: Rect, col: u16) -> Option<TabClick> {
    let hit = tab_hits(app, area)
        .into_iter()
        .find(|hit| col >= hit.x && col < hit.x.saturating_add(hit.width))?;
    if hit.close_x == Some(col) {
        Some(TabClick::Close(hit.id))
    } else {
        Some(TabClick::Activate(hit.id))
    }
}

pub fn draw_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let active = app.tabs.active();
    let mut spans = Vec::new();
    for (index, tab) in app.tabs.tabs().iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(DIVIDER, Style::default().fg(Color::DarkGray)));
        }
        let style = if Some(tab.id) == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        if app.tabs.is_closable(tab.id) {
            spans.push(Span::styled(format!(" {} ", tab.title), style));
            spans.push(Span::styled(
                CLOSE_MARKER,
                style.fg(if Some(tab.id) == active {
                    Color::Black
                } else {
                    Color::DarkGray
                }),
            ));
            spans.push(Span::styled(" ", style));
        } else {
            spans.push(Span::styled(label(tab.title, false), style));
        }
    }
    if spans.is_empty() {
        spans.push(Span::styled(
            "No open tabs",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Tabs ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_hits_follow_label_widths() {
        let mut app = App::new("/", Config::default());
        app.apply_session(true);
        app.open_view(ViewId::Events);

        let area = Rect::new(10, 1, 80, 1);
        let hits = tab_hits(&app, area);
        assert_eq!(hits.len(), 2);
        // " Dashboard × " then the divider
        assert_eq!(hits[0].x, 10);
        assert_eq!(hits[0].width, 13);
        assert_eq!(hits[0].close_x, Some(21));
        assert_eq!(hits[1].x, 24);

        assert_eq!(click_at(&app, area, 12), Some(TabClick::Activate(ViewId::Dashboard)));
        assert_eq!(click_at(&app, area, 21), Some(TabClick::Close(ViewId::Dashboard)));
        assert_eq!(click_at(&app, area, 23), None);
    }

    #[test]
    fn test_sole_dashboard_has_no_close_marker() {
        let mut app = App::new("/", Config::default());
        app.apply_session(false);
        let hits = tab_hits(&app, Rect::new(0, 0, 40, 1));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].close_x, None);
        assert_eq!(hits[0].width, 11);
    }
}
