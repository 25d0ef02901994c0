// ── Keyboard input ────────────────────────────────────────────────────────────
//
// Typed keyboard events and the decoder that builds them from raw key
// messages.  No `unsafe`; live key state comes in through `KeyState`.

pub mod keyboard;
pub mod keys;

pub use keyboard::{KeyboardDelegate, KeyboardManager};
pub use keys::Key;

bitflags::bitflags! {
    /// Chording keys held while a key message was decoded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const CONTROL = 0b010;
        const ALT = 0b100;
    }
}

/// A key went down or up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: Key,
    /// Never filled in by the decoder; left for handlers that translate keys.
    pub key_char: Option<String>,
    pub modifiers: Modifiers,
}

/// A printable character was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPressEvent {
    pub key_char: char,
    pub modifiers: Modifiers,
}

/// Live keyboard state at the instant of the query (`GetKeyState`).
pub trait KeyState {
    /// `true` while `key` is held down.
    fn is_key_down(&self, key: Key) -> bool;
}
