//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - reqwest client for the auth and events endpoints
//! - Tokio runtime bridge for async operations

pub mod api;
pub mod runtime;

pub use api::{ApiClient, ApiError, EventsApi};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
