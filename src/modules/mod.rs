//! UI Modules
//!
//! Each module implements the Module trait and handles its own key input.
//!
//! Modules:
//! - events: paged, searchable events listing
//! - event_form: create-event overlay

pub mod event_form;
pub mod events;

pub use event_form::{EventForm, FormField};
pub use events::EventsView;
