//! Key event encoding for terminal input (legacy xterm, Kitty protocol).

mod kitty;
mod legacy;

use bitflags::bitflags;
use winit::keyboard::{Key, KeyLocation};

use crate::term_mode::TermMode;

/// Key event type for Kitty keyboard protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventType {
    Press,
    Repeat,
    Release,
}

bitflags! {
    /// Keyboard modifiers for key events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT   = 0b0001;
        const ALT     = 0b0010;
        const CONTROL = 0b0100;
        const SUPER   = 0b1000;
    }
}

impl Modifiers {
    /// Encodes as xterm modifier parameter (1 + bitmask).
    ///
    /// Returns 0 when no modifiers are active (caller should omit the parameter).
    pub(super) fn xterm_param(self) -> u8 {
        if self.is_empty() { 0 } else { self.bits() + 1 }
    }
}

/// Encode a key event into bytes to send to the PTY.
///
/// Returns an empty `Vec` if the key should not produce output.
pub fn encode_key(
    key: &Key,
    mods: Modifiers,
    mode: TermMode,
    text: Option<&str>,
    location: KeyLocation,
    event_type: KeyEventType,
) -> Vec<u8> {
    // Kitty keyboard protocol takes priority when any flag is set.
    if mode.intersects(TermMode::KITTY_KEYBOARD_PROTOCOL) {
        return kitty::encode_kitty(key, mods, mode, text, location, event_type);
    }

    // Legacy mode only sends on press.
    if event_type == KeyEventType::Release {
        return Vec::new();
    }

    // APP_KEYPAD numpad keys.
    if location == KeyLocation::Numpad && mode.contains(TermMode::APP_KEYPAD) {
        if let Some(bytes) = legacy::encode_numpad_app(key) {
            return bytes;
        }
    }

    legacy::encode_legacy(key, mods, mode, text)
}
