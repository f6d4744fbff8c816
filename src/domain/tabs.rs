//! Navigation-tab coordinator
//!
//! Keeps the set of open tabs, the active tab and the current path mutually
//! consistent. Operations never fail; the ones that move the user to another
//! view return a [`PathChange`] that the caller applies to the location.

use tracing::debug;

use super::views::{ViewEntry, ViewId, ViewRegistry, ROOT_PATH};

/// An open, navigable view instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tab {
    pub id: ViewId,
    pub title: &'static str,
    pub path: &'static str,
}

impl From<&ViewEntry> for Tab {
    fn from(entry: &ViewEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.label,
            path: entry.path,
        }
    }
}

/// Request to move the location to `path`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathChange {
    pub path: &'static str,
}

#[derive(Debug, Default, Clone)]
pub struct TabCoordinator {
    registry: ViewRegistry,
    /// Insertion-ordered, unique by id
    tabs: Vec<Tab>,
    active: Option<ViewId>,
}

impl TabCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active(&self) -> Option<ViewId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        let active = self.active?;
        self.tabs.iter().find(|tab| tab.id == active)
    }

    pub fn active_index(&self) -> Option<usize> {
        let active = self.active?;
        self.position(active)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.position(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Only the dashboard tab, while it is the sole tab, refuses to close.
    pub fn is_closable(&self, id: ViewId) -> bool {
        !(id == ViewId::Dashboard && self.tabs.len() == 1)
    }

    /// The location changed to `path`. Unknown paths leave state untouched;
    /// redirecting them is the router's job.
    pub fn on_route_changed(&mut self, path: &str) {
        let Some(entry) = self.registry.by_path(path) else {
            return;
        };
        self.insert_if_missing(entry);
        self.set_active(entry.id);
    }

    /// Menu selection: open the view's tab if needed and make it active.
    pub fn open_or_activate(&mut self, id: ViewId) -> PathChange {
        let entry = id.entry();
        self.insert_if_missing(entry);
        self.set_active(id);
        PathChange { path: entry.path }
    }

    /// Tab-bar selection of an already open tab.
    pub fn activate(&mut self, id: ViewId) -> Option<PathChange> {
        let tab = *self.tabs.iter().find(|tab| tab.id == id)?;
        self.set_active(id);
        Some(PathChange { path: tab.path })
    }

    pub fn activate_next(&mut self) -> Option<PathChange> {
        self.cycle(true)
    }

    pub fn activate_previous(&mut self) -> Option<PathChange> {
        self.cycle(false)
    }

    pub fn close_tab(&mut self, id: ViewId) -> Option<PathChange> {
        if !self.is_closable(id) {
            return None;
        }
        let index = self.position(id)?;
        self.tabs.remove(index);
        debug!(tab = %id, "closed tab");
        if self.active == Some(id) {
            return self.reactivate();
        }
        None
    }

    /// Keep the active tab and the dashboard, drop everything else.
    pub fn close_other_tabs(&mut self) {
        let active = self.active;
        self.tabs
            .retain(|tab| tab.id == ViewId::Dashboard || Some(tab.id) == active);
    }

    /// Close every tab the current session may no longer show.
    pub fn retain_accessible(&mut self, is_authenticated: bool) -> Option<PathChange> {
        let active_removed = self
            .active_tab()
            .is_some_and(|tab| !tab.id.entry().is_accessible(is_authenticated));
        self.tabs
            .retain(|tab| tab.id.entry().is_accessible(is_authenticated));
        if active_removed {
            return self.reactivate();
        }
        None
    }

    /// Startup seeding. Requests `/dashboard` only when sitting on the root.
    pub fn ensure_default_tab(&mut self, current_path: &str) -> Option<PathChange> {
        if !self.tabs.is_empty() {
            return None;
        }
        let dashboard = ViewId::Dashboard.entry();
        self.tabs.push(Tab::from(dashboard));
        self.set_active(ViewId::Dashboard);
        if current_path.trim() == ROOT_PATH || current_path.trim().is_empty() {
            return Some(PathChange {
                path: dashboard.path,
            });
        }
        None
    }

    fn position(&self, id: ViewId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }

    fn insert_if_missing(&mut self, entry: &ViewEntry) {
        if !self.contains(entry.id) {
            self.tabs.push(Tab::from(entry));
        }
    }

    fn set_active(&mut self, id: ViewId) {
        if self.active != Some(id) {
            debug!(tab = %id, "activated tab");
        }
        self.active = Some(id);
    }

    /// Pick a new active tab after the active one went away: the dashboard
    /// if it is still open, else the last tab.
    fn reactivate(&mut self) -> Option<PathChange> {
        let next = self
            .tabs
            .iter()
            .find(|tab| tab.id == ViewId::Dashboard)
            .or_else(|| self.tabs.last())
            .copied();
        match next {
            Some(tab) => {
                self.set_active(tab.id);
                Some(PathChange { path: tab.path })
            }
            None => {
                self.active = None;
                None
            }
        }
    }

    fn cycle(&mut self, forward: bool) -> Option<PathChange> {
        if self.tabs.is_empty() {
            return None;
        }
        let len = self.tabs.len();
        let next = match self.active_index() {
            Some(idx) if forward => (idx + 1) % len,
            Some(idx) => (idx + len - 1) % len,
            None => 0,
        };
        let tab = self.tabs[next];
        self.set_active(tab.id);
        Some(PathChange { path: tab.path })
    }
}
