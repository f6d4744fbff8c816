//! Events listing: query state, paging and the keys that drive them

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::core::{Action, Module, NotifyLevel};
use crate::domain::{Event, EventPage, EventQuery, OrderBy, PAGE_SIZES};

#[derive(Debug, Clone)]
pub struct EventsView {
    pub query: EventQuery,
    pub page: Option<EventPage>,
    pub selected: usize,
    pub error: Option<String>,
    /// Query of the request currently awaited; responses for anything else are stale
    in_flight: Option<EventQuery>,
    default_page_size: u32,
}

impl EventsView {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: EventQuery::with_page_size(page_size),
            page: None,
            selected: 0,
            error: None,
            in_flight: None,
            default_page_size: page_size,
        }
    }

    /// Forget everything, as if the view was never opened
    pub fn reset(&mut self) {
        *self = Self::new(self.default_page_size);
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn needs_fetch(&self) -> bool {
        self.page.is_none() && self.in_flight.is_none() && self.error.is_none()
    }

    /// Mark the current query as requested and return it for the worker
    pub fn begin_fetch(&mut self) -> EventQuery {
        self.error = None;
        self.in_flight = Some(self.query.clone());
        self.query.clone()
    }

    /// Accept a page if it answers the request in flight
    pub fn apply_loaded(&mut self, query: &EventQuery, page: EventPage) -> bool {
        if !self.is_current(query) {
            debug!(page = query.page, "discarding stale events page");
            return false;
        }
        self.in_flight = None;
        self.error = None;
        self.selected = self.selected.min(page.items.len().saturating_sub(1));
        self.page = Some(page);
        true
    }

    pub fn apply_failed(&mut self, query: &EventQuery, message: String) -> bool {
        if !self.is_current(query) {
            debug!(page = query.page, "discarding stale events failure");
            return false;
        }
        self.in_flight = None;
        self.page = None;
        self.error = Some(message);
        true
    }

    fn is_current(&self, query: &EventQuery) -> bool {
        self.in_flight.as_ref() == Some(query) && self.query == *query
    }

    pub fn items(&self) -> &[Event] {
        self.page.as_ref().map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.items().get(self.selected)
    }

    pub fn total_count(&self) -> u64 {
        self.page.as_ref().map(|p| p.total_count).unwrap_or(0)
    }

    pub fn total_pages(&self) -> u32 {
        self.query.total_pages(self.total_count())
    }

    pub fn has_next_page(&self) -> bool {
        self.page.as_ref().is_some_and(|p| p.has_next_page)
    }

    pub fn has_previous_page(&self) -> bool {
        self.query.page > 1
    }

    /// "Showing X to Y of Z events"
    pub fn range_label(&self) -> String {
        let total = self.total_count();
        if total == 0 {
            return "No events".to_string();
        }
        let to = (self.query.offset() + self.items().len() as u64).min(total);
        let from = (self.query.offset() + 1).min(to);
        format!("Showing {from} to {to} of {total} events")
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.query.page += 1;
        self.selected = 0;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous_page() {
            return false;
        }
        self.query.page -= 1;
        self.selected = 0;
        true
    }

    /// Jump to a 1-based page; pages past the known total are rejected
    pub fn go_to_page(&mut self, page: u32) -> bool {
        let last = self.total_pages().max(1);
        if page == 0 || page > last || page == self.query.page {
            return false;
        }
        self.query.page = page;
        self.selected = 0;
        true
    }

    pub fn set_search(&mut self, search: &str) -> bool {
        if self.query.search == search.trim() {
            return false;
        }
        self.query.set_search(search.trim());
        self.selected = 0;
        true
    }

    pub fn set_order(&mut self, order_by: OrderBy) -> bool {
        if self.query.order_by == order_by {
            return false;
        }
        self.query.set_order(order_by);
        self.selected = 0;
        true
    }

    /// Sizes outside the offered set snap to the closest one
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        let size = PAGE_SIZES
            .iter()
            .copied()
            .min_by_key(|s| s.abs_diff(page_size))
            .unwrap_or(page_size);
        if self.query.page_size == size {
            return false;
        }
        self.query.set_page_size(size);
        self.selected = 0;
        true
    }

    fn cycle_page_size(&mut self) -> bool {
        let index = PAGE_SIZES
            .iter()
            .position(|s| *s == self.query.page_size)
            .map(|i| (i + 1) % PAGE_SIZES.len())
            .unwrap_or(0);
        self.set_page_size(PAGE_SIZES[index])
    }

    pub fn clear_filters(&mut self) -> bool {
        if self.query.active_filter_count() == 0 {
            return false;
        }
        self.query.clear_filters();
        self.selected = 0;
        true
    }

    fn move_selection(&mut self, forward: bool) {
        let len = self.items().len();
        if len == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1).min(len - 1)
        } else {
            self.selected.saturating_sub(1)
        };
    }

    fn refetch_if(changed: bool) -> Action {
        if changed {
            Action::RefreshEvents
        } else {
            Action::None
        }
    }
}

impl Module for EventsView {
    fn id(&self) -> &'static str {
        "events"
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(true);
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(false);
                Action::None
            }
            KeyCode::Char('n') | KeyCode::PageDown | KeyCode::Right => {
                let moved = self.next_page();
                if !moved {
                    return Action::Notify("Already on the last page".into(), NotifyLevel::Info);
                }
                Action::RefreshEvents
            }
            KeyCode::Char('p') | KeyCode::PageUp | KeyCode::Left => {
                let moved = self.previous_page();
                if !moved {
                    return Action::Notify("Already on the first page".into(), NotifyLevel::Info);
                }
                Action::RefreshEvents
            }
            KeyCode::Char('/') => Action::OpenCommand(Some("search ".to_string())),
            KeyCode::Char('o') => {
                let next = self.query.order_by.next();
                Self::refetch_if(self.set_order(next))
            }
            KeyCode::Char('z') => Self::refetch_if(self.cycle_page_size()),
            KeyCode::Char('c') => Self::refetch_if(self.clear_filters()),
            KeyCode::Char('r') => Action::RefreshEvents,
            KeyCode::Char('a') => Action::OpenForm,
            _ => Action::None,
        }
    }
}
