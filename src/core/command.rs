//! Command parser for the : command system

use crate::domain::{OrderBy, ViewId};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Navigation commands
    Goto(String),
    Open(ViewId),
    Close(Option<ViewId>),
    Only,
    Back,

    // Session
    Login,
    Logout,

    // Events listing
    Refresh,
    New,
    Search(String),
    Clear,
    Sort(OrderBy),
    Size(u32),
    Page(u32),

    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let unknown = || Command::Unknown(input.to_string());

    match cmd.to_lowercase().as_str() {
        // Navigation
        "goto" | "go" | "cd" => match args {
            Some(path) => Command::Goto(path),
            None => unknown(),
        },
        "open" | "o" => match args.as_deref().and_then(ViewId::parse) {
            Some(id) => Command::Open(id),
            None => unknown(),
        },
        "close" | "c" => match args {
            None => Command::Close(None),
            Some(arg) => match ViewId::parse(&arg) {
                Some(id) => Command::Close(Some(id)),
                None => unknown(),
            },
        },
        "only" => Command::Only,
        "back" | "b" => Command::Back,

        // Session
        "login" => Command::Login,
        "logout" => Command::Logout,

        // Events
        "refresh" | "r" => Command::Refresh,
        "new" | "add" => Command::New,
        "search" | "find" | "s" => Command::Search(args.unwrap_or_default()),
        "clear" => Command::Clear,
        "sort" => match args.as_deref().and_then(OrderBy::parse) {
            Some(order) => Command::Sort(order),
            None => unknown(),
        },
        "size" | "per-page" => match args.and_then(|s| s.parse().ok()) {
            Some(n) if n > 0 => Command::Size(n),
            _ => unknown(),
        },
        "page" | "p" => match args.and_then(|s| s.parse().ok()) {
            Some(n) if n > 0 => Command::Page(n),
            _ => unknown(),
        },

        "help" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,

        _ => unknown(),
    }
}
