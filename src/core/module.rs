//! Module trait for views that handle their own input

use crossterm::event::KeyEvent;
use tracing::debug;

use super::Action;

/// Trait for UI modules that can handle input
pub trait Module {
    /// Module identifier
    fn id(&self) -> &'static str;

    /// Handle keyboard input
    /// Returns an Action describing what should happen
    fn handle_key(&mut self, key: KeyEvent) -> Action;
}

/// Route a key to `module`, logging any action it produces
pub fn dispatch_key(module: &mut dyn Module, key: KeyEvent) -> Action {
    let action = module.handle_key(key);
    if action != Action::None {
        debug!(module = module.id(), ?action, "module action");
    }
    action
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    struct Echo {
        keys: usize,
    }

    impl Module for Echo {
        fn id(&self) -> &'static str {
            "echo"
        }

        fn handle_key(&mut self, key: KeyEvent) -> Action {
            self.keys += 1;
            match key.code {
                KeyCode::Char('q') => Action::Quit,
                _ => Action::None,
            }
        }
    }

    #[test]
    fn test_dispatch_returns_module_action() {
        let mut echo = Echo { keys: 0 };
        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);

        assert_eq!(dispatch_key(&mut echo, quit), Action::Quit);
        assert_eq!(dispatch_key(&mut echo, other), Action::None);
        assert_eq!(echo.keys, 2);
        assert_eq!(echo.id(), "echo");
    }
}
