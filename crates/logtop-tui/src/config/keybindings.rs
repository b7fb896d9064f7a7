use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    Top,
    Help,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::shift(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Interrupt);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        global.insert(KeyBinding::ctrl(KeyCode::Char('l')), Action::Redraw);
        bindings.insert(KeyContext::Global, global);

        // Top view bindings
        let mut top = HashMap::new();
        top.insert(KeyBinding::new(KeyCode::Char('p')), Action::TogglePause);
        top.insert(KeyBinding::new(KeyCode::Char(' ')), Action::TogglePause);
        top.insert(KeyBinding::new(KeyCode::Esc), Action::Quit);
        bindings.insert(KeyContext::Top, top);

        // Help overlay bindings
        let mut help = HashMap::new();
        help.insert(KeyBinding::new(KeyCode::Esc), Action::ToggleHelp);
        help.insert(KeyBinding::new(KeyCode::Enter), Action::ToggleHelp);
        bindings.insert(KeyContext::Help, help);

        Self { bindings }
    }

    /// Look up action for key event in given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // First check context-specific bindings
        if let Some(action) = self
            .bindings
            .get(&context)
            .and_then(|context_bindings| context_bindings.get(&binding))
        {
            return Some(action.clone());
        }

        // Fall back to global bindings
        self.bindings
            .get(&KeyContext::Global)?
            .get(&binding)
            .cloned()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_quit_keys() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.get_action(KeyContext::Top, &key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        assert_eq!(
            bindings.get_action(KeyContext::Top, &key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Interrupt)
        );
        assert_eq!(
            bindings.get_action(KeyContext::Top, &key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_escape_closes_help_instead_of_quitting() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.get_action(KeyContext::Help, &key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::ToggleHelp)
        );
    }

    #[test]
    fn test_ctrl_l_redraws_in_every_context() {
        let bindings = KeyBindings::new();
        let ctrl_l = key(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(bindings.get_action(KeyContext::Top, &ctrl_l), Some(Action::Redraw));
        assert_eq!(bindings.get_action(KeyContext::Help, &ctrl_l), Some(Action::Redraw));
    }

    #[test]
    fn test_unbound_key() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.get_action(KeyContext::Top, &key(KeyCode::Char('z'), KeyModifiers::NONE)),
            None
        );
    }
}
