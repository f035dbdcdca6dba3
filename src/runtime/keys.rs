use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use cadenza::playback::ControlCmd;

/// What a key press asks the engine to do.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Control(ControlCmd),
    SeekBack,
    SeekForward,
    VolumeUp,
    VolumeDown,
    ToggleMute,
}

pub fn map_key(key: KeyEvent) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let action = match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => KeyAction::Control(ControlCmd::PlayPause),
        KeyCode::Left if ctrl && shift => KeyAction::SeekBack,
        KeyCode::Right if ctrl && shift => KeyAction::SeekForward,
        KeyCode::Left if ctrl => KeyAction::Control(ControlCmd::Prev),
        KeyCode::Right if ctrl => KeyAction::Control(ControlCmd::Next),
        KeyCode::Up if ctrl => KeyAction::VolumeUp,
        KeyCode::Down if ctrl => KeyAction::VolumeDown,
        KeyCode::Char('h') => KeyAction::Control(ControlCmd::Prev),
        KeyCode::Char('l') => KeyAction::Control(ControlCmd::Next),
        KeyCode::Char('H') => KeyAction::SeekBack,
        KeyCode::Char('L') => KeyAction::SeekForward,
        KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::VolumeUp,
        KeyCode::Char('-') => KeyAction::VolumeDown,
        KeyCode::Char('m') => KeyAction::ToggleMute,
        KeyCode::Char('s') => KeyAction::Control(ControlCmd::Stop),
        KeyCode::Char('q') => KeyAction::Control(ControlCmd::Quit),
        _ => return None,
    };
    Some(action)
}
