//! Actions that modules can return to communicate with the app

use crate::domain::{NewEvent, ViewId};

/// Actions returned by modules to communicate state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Push a path onto the location
    Navigate(String),

    /// Open (or activate) a view's tab
    Open(ViewId),

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Open command line with optional prefix
    OpenCommand(Option<String>),

    /// Re-fetch the events listing with the current query
    RefreshEvents,

    /// Open the create-event form
    OpenForm,

    /// Submit a validated event
    Submit(NewEvent),

    /// Close current overlay/popup
    CloseOverlay,

    /// Request quit
    Quit,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
