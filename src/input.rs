//! Key bindings: arrows plus vim-style letters.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which keys are live. `Minimal` binds only left, right and down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Controls {
    #[default]
    Full,
    Minimal,
}

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
    Pause,
    Restart,
    Quit,
    None,
}

/// Map key event to game action.
pub fn key_to_action(key: KeyEvent, controls: Controls) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    let action = match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Left | KeyCode::Char('h') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::MoveRight,
        KeyCode::Up | KeyCode::Char('k') => Action::Rotate,
        KeyCode::Down | KeyCode::Char('j') => Action::SoftDrop,
        KeyCode::Enter | KeyCode::Char(' ') => Action::HardDrop,
        _ => Action::None,
    };
    match (controls, action) {
        (Controls::Minimal, Action::Rotate | Action::HardDrop) => Action::None,
        _ => action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(key_to_action(press(KeyCode::Left), Controls::Full), Action::MoveLeft);
        assert_eq!(key_to_action(press(KeyCode::Right), Controls::Full), Action::MoveRight);
        assert_eq!(key_to_action(press(KeyCode::Up), Controls::Full), Action::Rotate);
        assert_eq!(key_to_action(press(KeyCode::Down), Controls::Full), Action::SoftDrop);
        assert_eq!(key_to_action(press(KeyCode::Char(' ')), Controls::Full), Action::HardDrop);
    }

    #[test]
    fn test_vim_keys() {
        assert_eq!(key_to_action(press(KeyCode::Char('h')), Controls::Full), Action::MoveLeft);
        assert_eq!(key_to_action(press(KeyCode::Char('k')), Controls::Full), Action::Rotate);
    }

    #[test]
    fn test_minimal_controls_drop_rotate_and_hard_drop() {
        assert_eq!(key_to_action(press(KeyCode::Up), Controls::Minimal), Action::None);
        assert_eq!(key_to_action(press(KeyCode::Enter), Controls::Minimal), Action::None);
        assert_eq!(key_to_action(press(KeyCode::Down), Controls::Minimal), Action::SoftDrop);
        assert_eq!(key_to_action(press(KeyCode::Char('r')), Controls::Minimal), Action::Restart);
    }

    #[test]
    fn test_modifiers() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c, Controls::Full), Action::Quit);
        let alt_left = KeyEvent::new(KeyCode::Left, KeyModifiers::ALT);
        assert_eq!(key_to_action(alt_left, Controls::Full), Action::None);
        let shift_r = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(shift_r, Controls::Full), Action::Restart);
    }
}
