//! Terminal event-calendar client: tabbed navigation over an authenticated
//! events API.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod store;
pub mod ui;
