//! Domain models and the navigation state machine
//!
//! Nothing here touches the terminal or the network.

pub mod event;
pub mod location;
pub mod query;
pub mod router;
pub mod tabs;
pub mod views;

pub use event::{Event, EventDraft, EventId, EventPage, NewEvent, ValidationError};
pub use location::Location;
pub use query::{EventQuery, OrderBy, PAGE_SIZES};
pub use router::{resolve, Route};
pub use tabs::{PathChange, Tab, TabCoordinator};
pub use views::{ViewEntry, ViewId, ViewRegistry, DASHBOARD_PATH, ROOT_PATH};
