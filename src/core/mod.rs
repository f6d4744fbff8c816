pub mod action;
pub mod command;
pub mod module;

pub use action::{Action, NotifyLevel};
pub use command::{parse_command, Command};
pub use module::{dispatch_key, Module};
