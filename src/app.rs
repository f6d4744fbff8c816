use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::{dispatch_key, parse_command, Action, Command, NotifyLevel};
use crate::domain::{
    resolve, Event, EventPage, EventQuery, Location, NewEvent, PathChange, Route, TabCoordinator,
    ViewEntry, ViewId, ViewRegistry, ROOT_PATH,
};
use crate::infrastructure::ApiError;
use crate::modules::{EventForm, EventsView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Menu,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

impl From<NotifyLevel> for StatusLevel {
    fn from(level: NotifyLevel) -> Self {
        match level {
            NotifyLevel::Info => StatusLevel::Info,
            NotifyLevel::Warn => StatusLevel::Warn,
            NotifyLevel::Error => StatusLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

#[derive(Debug)]
pub struct App {
    pub tabs: TabCoordinator,
    pub location: Location,
    /// Session as last reported by the runtime
    pub authenticated: bool,
    /// False until the runtime reports the first session; nothing routes before that
    pub session_ready: bool,
    pub config: Config,
    pub offline: bool,
    pub focus: Focus,
    pub menu_selected: usize,
    pub events: EventsView,
    pub form: Option<EventForm>,
    pub input_mode: InputMode,
    pub command: CommandBar,
    pub status: Option<StatusMessage>,
    pub last_created: Option<Event>,
    pub help_open: bool,
    pub should_quit: bool,
    pending_fetch_request: Option<EventQuery>,
    pending_create_request: Option<NewEvent>,
    pending_login_request: bool,
    pending_logout_request: bool,
}

impl App {
    pub fn new(initial_path: &str, config: Config) -> Self {
        let page_size = config.page_size();
        Self {
            tabs: TabCoordinator::new(),
            location: Location::new(initial_path),
            authenticated: false,
            session_ready: false,
            config,
            offline: false,
            focus: Focus::Content,
            menu_selected: 0,
            events: EventsView::new(page_size),
            form: None,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            status: None,
            last_created: None,
            help_open: false,
            should_quit: false,
            pending_fetch_request: None,
            pending_create_request: None,
            pending_login_request: false,
            pending_logout_request: false,
        }
    }

    // ---------------------------------------------------------------
    // Status line
    // ---------------------------------------------------------------

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            let ttl = match status.level {
                StatusLevel::Info => Duration::from_secs(3),
                StatusLevel::Warn | StatusLevel::Error => Duration::from_secs(6),
            };
            if status.since.elapsed() > ttl {
                self.status = None;
            }
        }
    }

    // ---------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------

    /// Menu entries the current session may open
    pub fn menu_items(&self) -> Vec<&'static ViewEntry> {
        ViewRegistry
            .entries()
            .iter()
            .filter(|entry| entry.is_accessible(self.authenticated))
            .collect()
    }

    pub fn active_view(&self) -> Option<ViewId> {
        self.tabs.active()
    }

    /// Push `path` onto the location and route it
    pub fn navigate(&mut self, path: &str) {
        if self.location.push(path) {
            debug!(path = self.location.path(), "navigate");
        }
        self.sync_route();
    }

    pub fn go_back(&mut self) {
        if !self.location.back() {
            self.set_status("No previous location", StatusLevel::Warn);
            return;
        }
        self.sync_route();
    }

    pub fn open_view(&mut self, id: ViewId) {
        if !id.entry().is_accessible(self.authenticated) {
            self.set_status(
                format!("Login required for {}", id.entry().label),
                StatusLevel::Warn,
            );
            return;
        }
        let change = self.tabs.open_or_activate(id);
        self.follow(Some(change));
    }

    pub fn open_selected_menu_item(&mut self) {
        let Some(entry) = self.menu_items().get(self.menu_selected).copied() else {
            return;
        };
        self.open_view(entry.id);
        self.focus = Focus::Content;
    }

    pub fn move_menu_selection(&mut self, forward: bool) {
        let len = self.menu_items().len();
        if len == 0 {
            return;
        }
        self.menu_selected = if forward {
            (self.menu_selected + 1) % len
        } else {
            (self.menu_selected + len - 1) % len
        };
    }

    pub fn activate_tab(&mut self, id: ViewId) {
        let change = self.tabs.activate(id);
        self.follow(change);
    }

    pub fn cycle_tab(&mut self, forward: bool) {
        let change = if forward {
            self.tabs.activate_next()
        } else {
            self.tabs.activate_previous()
        };
        self.follow(change);
    }

    pub fn close_tab(&mut self, id: ViewId) {
        if !self.tabs.contains(id) {
            self.set_status(format!("{} is not open", id.entry().label), StatusLevel::Warn);
            return;
        }
        if !self.tabs.is_closable(id) {
            self.set_status("The last dashboard tab stays open", StatusLevel::Warn);
            return;
        }
        let change = self.tabs.close_tab(id);
        self.after_tabs_changed();
        self.follow(change);
    }

    pub fn close_active_tab(&mut self) {
        if let Some(id) = self.tabs.active() {
            self.close_tab(id);
        }
    }

    pub fn close_other_tabs(&mut self) {
        self.tabs.close_other_tabs();
        self.after_tabs_changed();
    }

    /// Apply a coordinator path-change request to the location
    fn follow(&mut self, change: Option<PathChange>) {
        if let Some(change) = change {
            self.navigate(change.path);
        }
    }

    /// Route the current location: redirects replace it, views feed the coordinator.
    fn sync_route(&mut self) {
        if !self.session_ready {
            return;
        }
        // a redirect target always resolves to a view, so two passes suffice
        for _ in 0..2 {
            match resolve(self.location.path(), self.authenticated) {
                Route::Redirect(target) => {
                    debug!(from = self.location.path(), to = target, "redirect");
                    self.location.replace(target);
                }
                Route::View(entry) => {
                    self.tabs.on_route_changed(entry.path);
                    self.after_tabs_changed();
                    return;
                }
            }
        }
    }

    fn after_tabs_changed(&mut self) {
        if !self.tabs.contains(ViewId::Events) {
            self.events.reset();
            return;
        }
        if self.tabs.active() == Some(ViewId::Events) && self.events.needs_fetch() {
            self.request_events();
        }
    }

    // ---------------------------------------------------------------
    // Session
    // ---------------------------------------------------------------

    pub fn apply_session(&mut self, authenticated: bool) {
        let first = !self.session_ready;
        let changed = self.authenticated != authenticated;
        self.session_ready = true;
        self.authenticated = authenticated;

        if first {
            info!(authenticated, "session ready");
            let change = self.tabs.ensure_default_tab(self.location.path());
            self.follow(change);
            self.sync_route();
            return;
        }
        if !changed {
            return;
        }
        if authenticated {
            self.set_status("Logged in", StatusLevel::Info);
            self.sync_route();
        } else {
            self.end_session();
        }
        self.clamp_menu_selection();
    }

    /// Close protected tabs and send the location back to the root
    fn end_session(&mut self) {
        self.authenticated = false;
        self.form = None;
        let change = self.tabs.retain_accessible(false);
        if let Some(change) = change {
            debug!(path = change.path, "reactivated after session end");
        }
        self.after_tabs_changed();
        self.location.replace(ROOT_PATH);
        self.sync_route();
        self.clamp_menu_selection();
    }

    pub fn handle_session_expired(&mut self) {
        warn!("session expired");
        self.end_session();
        self.set_status("Session expired. Please login again.", StatusLevel::Warn);
    }

    pub fn apply_authentication_failed(&mut self, message: String) {
        self.set_status(format!("Login failed: {message}"), StatusLevel::Error);
    }

    pub fn login(&mut self) {
        if self.authenticated {
            self.set_status("Already logged in", StatusLevel::Info);
            return;
        }
        self.pending_login_request = true;
        self.set_status("Logging in…", StatusLevel::Info);
    }

    pub fn logout(&mut self) {
        if !self.authenticated {
            self.set_status("Not logged in", StatusLevel::Info);
            return;
        }
        self.pending_logout_request = true;
        self.end_session();
        self.set_status("Logged out", StatusLevel::Info);
    }

    /// The header button: Logout when signed in, Login otherwise
    pub fn toggle_session(&mut self) {
        if self.authenticated {
            self.logout();
        } else {
            self.login();
        }
    }

    fn clamp_menu_selection(&mut self) {
        let len = self.menu_items().len();
        self.menu_selected = self.menu_selected.min(len.saturating_sub(1));
    }

    // ---------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------

    pub fn request_events(&mut self) {
        if !self.authenticated {
            return;
        }
        let query = self.events.begin_fetch();
        debug!(page = query.page, size = query.page_size, "fetch events");
        self.pending_fetch_request = Some(query);
    }

    pub fn apply_events_loaded(&mut self, query: EventQuery, page: EventPage) {
        if !self.tabs.contains(ViewId::Events) {
            debug!("events tab closed, dropping page");
            return;
        }
        self.events.apply_loaded(&query, page);
    }

    pub fn apply_events_failed(&mut self, query: EventQuery, error: ApiError) {
        if error.is_session_expired() {
            if self.authenticated {
                self.handle_session_expired();
            }
            return;
        }
        if !self.tabs.contains(ViewId::Events) {
            debug!("events tab closed, dropping failure");
            return;
        }
        if self.events.apply_failed(&query, error.to_string()) {
            self.set_status(error.to_string(), StatusLevel::Error);
        }
    }

    pub fn apply_event_created(&mut self, event: Event) {
        self.form = None;
        self.set_status(
            format!("Created \"{}\"", event.display_title()),
            StatusLevel::Info,
        );
        self.last_created = Some(event);
        if self.tabs.contains(ViewId::Events) {
            self.request_events();
        }
    }

    pub fn apply_create_failed(&mut self, error: ApiError) {
        if error.is_session_expired() {
            self.handle_session_expired();
            return;
        }
        match self.form.as_mut() {
            Some(form) => form.apply_failure(error.to_string()),
            None => self.set_status(error.to_string(), StatusLevel::Error),
        }
    }

    pub fn open_form(&mut self) {
        if !self.authenticated {
            self.set_status("Login to create events", StatusLevel::Warn);
            return;
        }
        self.form = Some(EventForm::new());
    }

    /// Run an events-listing change, opening the tab first if needed
    fn update_events(&mut self, update: impl FnOnce(&mut EventsView) -> bool) -> Action {
        if !self.authenticated {
            return Action::Notify("Login to browse events".into(), NotifyLevel::Warn);
        }
        if self.tabs.active() != Some(ViewId::Events) {
            self.open_view(ViewId::Events);
        }
        if update(&mut self.events) {
            Action::RefreshEvents
        } else {
            Action::None
        }
    }

    // ---------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------

    pub fn enter_command(&mut self, prefix: Option<String>) {
        self.input_mode = InputMode::Command;
        self.command.input = prefix.unwrap_or_default();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        if input.is_empty() {
            self.exit_command();
            return;
        }
        let cmd = parse_command(&input);
        self.command.last = Some(input);
        self.exit_command();
        let action = self.execute_command(&cmd);
        self.apply_action(action);
    }

    /// Keys for the content area go to the active view's module
    pub fn handle_content_key(&mut self, key: crossterm::event::KeyEvent) {
        let action = match self.tabs.active() {
            Some(ViewId::Events) => dispatch_key(&mut self.events, key),
            _ => Action::None,
        };
        self.apply_action(action);
    }

    pub fn handle_form_key(&mut self, key: crossterm::event::KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let action = dispatch_key(form, key);
        self.apply_action(action);
    }

    /// Execute a parsed command
    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        match cmd {
            Command::Goto(path) => Action::Navigate(path.clone()),
            Command::Open(id) => Action::Open(*id),
            Command::Close(None) => {
                self.close_active_tab();
                Action::None
            }
            Command::Close(Some(id)) => {
                self.close_tab(*id);
                Action::None
            }
            Command::Only => {
                self.close_other_tabs();
                Action::None
            }
            Command::Back => {
                self.go_back();
                Action::None
            }
            Command::Login => {
                self.login();
                Action::None
            }
            Command::Logout => {
                self.logout();
                Action::None
            }
            Command::Refresh => self.update_events(|_| true),
            Command::New => Action::OpenForm,
            Command::Search(text) => self.update_events(|view| view.set_search(text)),
            Command::Clear => self.update_events(|view| view.clear_filters()),
            Command::Sort(order) => self.update_events(|view| view.set_order(*order)),
            Command::Size(size) => self.update_events(|view| view.set_page_size(*size)),
            Command::Page(page) => {
                let page = *page;
                match self.update_events(|view| view.go_to_page(page)) {
                    Action::None if self.authenticated && self.events.query.page != page => {
                        Action::Notify(format!("No page {page}"), NotifyLevel::Warn)
                    }
                    action => action,
                }
            }
            Command::Help => {
                self.help_open = true;
                Action::None
            }
            Command::Quit => Action::Quit,
            Command::Unknown(s) => {
                Action::Notify(format!("Unknown command: {}", s), NotifyLevel::Warn)
            }
        }
    }

    /// Apply an action returned by a command or module
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(path) => self.navigate(&path),
            Action::Open(id) => self.open_view(id),
            Action::Notify(msg, level) => self.set_status(msg, level.into()),
            Action::OpenCommand(prefix) => self.enter_command(prefix),
            Action::RefreshEvents => self.request_events(),
            Action::OpenForm => self.open_form(),
            Action::Submit(event) => {
                self.pending_create_request = Some(event);
                self.set_status("Creating event…", StatusLevel::Info);
            }
            Action::CloseOverlay => {
                self.form = None;
                self.help_open = false;
            }
            Action::Quit => self.should_quit = true,
        }
    }

    // ---------------------------------------------------------------
    // Requests for the runtime
    // ---------------------------------------------------------------

    pub fn take_fetch_request(&mut self) -> Option<EventQuery> {
        self.pending_fetch_request.take()
    }

    pub fn take_create_request(&mut self) -> Option<NewEvent> {
        self.pending_create_request.take()
    }

    pub fn take_login_request(&mut self) -> bool {
        std::mem::take(&mut self.pending_login_request)
    }

    pub fn take_logout_request(&mut self) -> bool {
        std::mem::take(&mut self.pending_logout_request)
    }
}
