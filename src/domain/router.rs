//! Path resolution against the view registry and the current session

use super::views::{normalize_path, ViewEntry, ViewRegistry, DASHBOARD_PATH, ROOT_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// A registered view the session may show
    View(&'static ViewEntry),
    /// Replace the location with this path
    Redirect(&'static str),
}

/// Resolve `path`. The root, unknown paths, and views that need a session
/// the user does not have all land on the dashboard.
pub fn resolve(path: &str, is_authenticated: bool) -> Route {
    let path = normalize_path(path);
    if path == ROOT_PATH {
        return Route::Redirect(DASHBOARD_PATH);
    }
    match ViewRegistry.by_path(&path) {
        Some(entry) if entry.is_accessible(is_authenticated) => Route::View(entry),
        _ => Route::Redirect(DASHBOARD_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::views::ViewId;

    #[test]
    fn test_root_redirects_to_dashboard() {
        assert_eq!(resolve("/", true), Route::Redirect("/dashboard"));
        assert_eq!(resolve("", false), Route::Redirect("/dashboard"));
    }

    #[test]
    fn test_unknown_redirects_to_dashboard() {
        assert_eq!(resolve("/calendar", true), Route::Redirect("/dashboard"));
    }

    #[test]
    fn test_auth_views_only_when_authenticated() {
        assert_eq!(resolve("/events", false), Route::Redirect("/dashboard"));
        match resolve("/events", true) {
            Route::View(entry) => assert_eq!(entry.id, ViewId::Events),
            other => panic!("unexpected route {other:?}"),
        }
        match resolve("/dashboard", false) {
            Route::View(entry) => assert_eq!(entry.id, ViewId::Dashboard),
            other => panic!("unexpected route {other:?}"),
        }
    }
}
