use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Space: pause or resume the gallery track
    TogglePause,
    ScrollDown,
    ScrollUp,
    NextService,
    PrevService,
    /// 'h': pointer over / off the gallery track
    ToggleGalleryHover,
    /// Tab: keyboard focus on / off the service list
    ToggleServicesFocus,
    ToggleReducedMotion,
    ReplaySplash,
    SkipSplash,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Action::Quit,
        (KeyCode::Char('m'), KeyModifiers::NONE) => return Action::ToggleReducedMotion,
        _ => {}
    }

    if app.screen() == Screen::Splash {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => Action::SkipSplash,
            _ => Action::None,
        };
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::TogglePause,

        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,

        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::NextService,
        (KeyCode::Right, KeyModifiers::NONE) => Action::NextService,
        (KeyCode::Char('L'), KeyModifiers::SHIFT) => Action::PrevService,
        (KeyCode::Left, KeyModifiers::NONE) => Action::PrevService,

        (KeyCode::Char('h'), KeyModifiers::NONE) => Action::ToggleGalleryHover,
        (KeyCode::Tab, KeyModifiers::NONE) => Action::ToggleServicesFocus,
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::ReplaySplash,

        _ => Action::None,
    }
}
