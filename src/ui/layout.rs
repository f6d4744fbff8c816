use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub header_title: Rect,
    pub header_button: Rect,
    pub sidebar: Rect,
    pub tab_bar: Rect,
    pub content: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(14)])
        .split(vertical[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(22), Constraint::Percentage(78)])
        .split(vertical[1]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(main_chunks[1]);

    let footer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(vertical[2]);

    UiAreas {
        size,
        header: vertical[0],
        header_title: header_chunks[0],
        header_button: header_chunks[1],
        sidebar: main_chunks[0],
        tab_bar: right_chunks[0],
        content: right_chunks[1],
        status_line: footer_chunks[0],
        command_line: footer_chunks[1],
    }
}

/// Area inside a bordered block
pub fn inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}

pub fn contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_sits_at_header_right_edge() {
        let a = areas(Rect::new(0, 0, 100, 30));
        assert_eq!(a.header_button.width, 14);
        assert_eq!(a.header_button.x + a.header_button.width, 100);
        assert_eq!(a.header_button.y, 0);
        assert!(contains(a.header_button, 99, 1));
        assert!(!contains(a.header_title, 99, 1));
    }

    #[test]
    fn test_tab_bar_above_content() {
        let a = areas(Rect::new(0, 0, 100, 30));
        assert_eq!(a.tab_bar.x, a.content.x);
        assert_eq!(a.tab_bar.y + a.tab_bar.height, a.content.y);
        assert_eq!(a.status_line.y + 1, a.command_line.y);
        assert_eq!(a.command_line.y, 29);
    }

    #[test]
    fn test_inner_on_tiny_rect() {
        let r = inner(Rect::new(5, 5, 1, 1));
        assert_eq!((r.width, r.height), (0, 0));
    }
}
