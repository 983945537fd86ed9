//! Input events delivered to scene hooks

use std::collections::HashSet;

pub use macroquad::input::{KeyCode, MouseButton};

use crate::surface::Pos;

/// Keys currently held down
pub type KeySet = HashSet<KeyCode>;

/// Modifier keys held when an event happened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(key: KeyCode) -> Self {
        Self { key, mods: Modifiers::default() }
    }

    pub fn with_ctrl(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers { ctrl: true, ..Default::default() },
        }
    }

    /// Ctrl+C, which always stops the running scene
    pub fn is_interrupt(&self) -> bool {
        self.key == KeyCode::C && self.mods.ctrl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub button: MouseButton,
    /// Screen pixels, not window pixels
    pub pos: Pos,
}

/// One entry of a frame's event queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close requested
    Quit,
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    MouseDown(MouseEvent),
    MouseUp(MouseEvent),
}
