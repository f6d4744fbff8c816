//! Current path plus back-history; the terminal stand-in for an address bar

use super::views::{normalize_path, ROOT_PATH};

const MAX_HISTORY: usize = 64;

#[derive(Debug, Clone)]
pub struct Location {
    path: String,
    history: Vec<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self::new(ROOT_PATH)
    }
}

impl Location {
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path),
            history: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Move to `path`, remembering the current one. Returns false when the
    /// location already points there.
    pub fn push(&mut self, path: &str) -> bool {
        let path = normalize_path(path);
        if path == self.path {
            return false;
        }
        let previous = std::mem::replace(&mut self.path, path);
        self.history.push(previous);
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        true
    }

    /// Move to `path` without a history entry (redirects).
    pub fn replace(&mut self, path: &str) -> bool {
        let path = normalize_path(path);
        if path == self.path {
            return false;
        }
        self.path = path;
        true
    }

    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.path = previous;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_back() {
        let mut location = Location::default();
        assert_eq!(location.path(), "/");
        assert!(location.push("/dashboard"));
        assert!(location.push("events"));
        assert!(!location.push("/events/"));
        assert_eq!(location.path(), "/events");

        assert!(location.back());
        assert_eq!(location.path(), "/dashboard");
        assert!(location.back());
        assert_eq!(location.path(), "/");
        assert!(!location.back());
    }

    #[test]
    fn test_replace_skips_history() {
        let mut location = Location::new("/");
        assert!(location.replace("/dashboard"));
        assert!(!location.can_go_back());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut location = Location::default();
        for i in 0..(MAX_HISTORY + 10) {
            location.push(&format!("/p{i}"));
        }
        let mut steps = 0;
        while location.back() {
            steps += 1;
        }
        assert_eq!(steps, MAX_HISTORY);
    }
}
