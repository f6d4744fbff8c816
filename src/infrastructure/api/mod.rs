//! Events API client

mod client;
mod error;
mod normalize;

pub use client::{ApiClient, EventsApi};
pub use error::{classify, ApiError};
pub use normalize::normalize_page;
