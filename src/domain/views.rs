//! View registry - static mapping from view ids and paths to view metadata

use std::fmt;

/// Stable logical key of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewId {
    Dashboard,
    Events,
    Profile,
    Settings,
}

impl ViewId {
    pub const ALL: [ViewId; 4] = [
        ViewId::Dashboard,
        ViewId::Events,
        ViewId::Profile,
        ViewId::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewId::Dashboard => "dashboard",
            ViewId::Events => "events",
            ViewId::Profile => "profile",
            ViewId::Settings => "settings",
        }
    }

    /// Parse the string form of a view id (case-insensitive)
    pub fn parse(input: &str) -> Option<ViewId> {
        let input = input.trim();
        ViewId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(input))
    }

    /// Registry entry for this id. Every id has exactly one entry.
    pub fn entry(&self) -> &'static ViewEntry {
        match self {
            ViewId::Dashboard => &VIEWS[0],
            ViewId::Events => &VIEWS[1],
            ViewId::Profile => &VIEWS[2],
            ViewId::Settings => &VIEWS[3],
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static view configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewEntry {
    pub id: ViewId,
    pub label: &'static str,
    pub path: &'static str,
    pub requires_auth: bool,
}

impl ViewEntry {
    pub fn is_accessible(&self, is_authenticated: bool) -> bool {
        !self.requires_auth || is_authenticated
    }
}

pub const ROOT_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/dashboard";

static VIEWS: [ViewEntry; 4] = [
    ViewEntry {
        id: ViewId::Dashboard,
        label: "Dashboard",
        path: DASHBOARD_PATH,
        requires_auth: false,
    },
    ViewEntry {
        id: ViewId::Events,
        label: "Events",
        path: "/events",
        requires_auth: true,
    },
    ViewEntry {
        id: ViewId::Profile,
        label: "Profile",
        path: "/profile",
        requires_auth: true,
    },
    ViewEntry {
        id: ViewId::Settings,
        label: "Settings",
        path: "/settings",
        requires_auth: true,
    },
];

/// Read-only lookup over the static view table.
///
/// The registry never filters by authentication; callers such as the side
/// menu do that with [`ViewEntry::is_accessible`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewRegistry;

impl ViewRegistry {
    pub fn entries(&self) -> &'static [ViewEntry] {
        &VIEWS
    }

    pub fn by_id(&self, id: ViewId) -> Option<&'static ViewEntry> {
        VIEWS.iter().find(|entry| entry.id == id)
    }

    /// Exact path match; trailing slashes are ignored except for the root.
    pub fn by_path(&self, path: &str) -> Option<&'static ViewEntry> {
        let path = normalize_path(path);
        VIEWS.iter().find(|entry| entry.path == path)
    }
}

/// Trim whitespace and a trailing slash, ensure a leading slash
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    let trimmed = trimmed.trim_end_matches('/');
    if trimmed.is_empty() {
        return ROOT_PATH.to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id_and_path() {
        let registry = ViewRegistry;
        assert_eq!(registry.by_id(ViewId::Events).map(|e| e.path), Some("/events"));
        assert_eq!(
            registry.by_path("/settings").map(|e| e.id),
            Some(ViewId::Settings)
        );
        assert_eq!(registry.by_path("/dashboard/").map(|e| e.id), Some(ViewId::Dashboard));
        assert!(registry.by_path("/nope").is_none());
        assert!(registry.by_path("/").is_none());
    }

    #[test]
    fn test_ids_and_paths_are_unique() {
        let registry = ViewRegistry;
        for (i, a) in registry.entries().iter().enumerate() {
            for b in registry.entries().iter().skip(i + 1) {
                assert_ne!(a.id, b.id);
                assert_ne!(a.path, b.path);
            }
        }
        for id in ViewId::ALL {
            assert_eq!(id.entry().id, id);
        }
    }

    #[test]
    fn test_parse_view_id() {
        assert_eq!(ViewId::parse("Events"), Some(ViewId::Events));
        assert_eq!(ViewId::parse(" profile "), Some(ViewId::Profile));
        assert_eq!(ViewId::parse("calendar"), None);
    }

    #[test]
    fn test_accessibility() {
        assert!(ViewId::Dashboard.entry().is_accessible(false));
        assert!(!ViewId::Events.entry().is_accessible(false));
        assert!(ViewId::Events.entry().is_accessible(true));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("events"), "/events");
        assert_eq!(normalize_path(" /events/ "), "/events");
    }
}
