//! Key bindings: arrows and vim-style.

use crate::session::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map key event to a session command. Supports both arrows/space and vim (hjkl).
pub fn key_to_command(key: KeyEvent) -> Command {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Command::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Command::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Left | KeyCode::Char('h') => Command::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Command::MoveRight,
        KeyCode::Down | KeyCode::Char('j') => Command::MoveDown,
        KeyCode::Up | KeyCode::Char('k' | ' ') => Command::Rotate,
        _ => Command::None,
    }
}
