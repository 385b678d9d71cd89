// Keyboard shortcuts for the clipsort triage grid
//
// Keybindings (normal mode):
// - Ctrl+Left/Right: Change selection (wraps)
// - Left/Right: Seek -/+ 10s (Shift: 300s)
// - Up/Down: Volume +/- 10%
// - Ctrl+Up: Go to parent directory
// - Ctrl+Down: Prompt subfolder navigation
// - d: Move selected clip to "del" subfolder
// - n: Move selected clip to "nice" subfolder
// - s: Save to named subfolder (modal)
// - r: Rename selected clip (modal)
// - f: Toggle fullscreen
// - Space: Play/pause
// - Backspace: Rewind to start
// - m: Toggle mute
// - o: Reveal clip in file manager
// - g: Web-search the clip filename
// - Delete: Delete file
// - Escape: Exit fullscreen -> clear selection -> directory picker

/// A key press, decoupled from any windowing toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Enter,
    Tab,
    Space,
    Backspace,
    Delete,
    Char(char),
}

/// Modifier state accompanying a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        ctrl: false,
        shift: true,
    };
}

/// A single keyboard event delivered to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn ch(c: char) -> Self {
        Self::plain(Key::Char(c))
    }
}
