// ── Keyboard decoder ──────────────────────────────────────────────────────────
//
// Turns WM_KEYDOWN / WM_KEYUP / WM_SYSKEY* / WM_CHAR / WM_DEADCHAR envelopes
// into `KeyEvent`s and `KeyPressEvent`s.  The free functions are stateless;
// `KeyboardManager` only adds the optional delegate they report to.
//
// CONTROL and SHIFT are read from live key state when decoding, never from the
// message, so they describe the keyboard at dispatch time.  ALT comes from the
// message's context bit.

use super::{Key, KeyEvent, KeyPressEvent, KeyState, Modifiers};
use crate::message::{codes::KF_ALTDOWN, Message};

const CR: u16 = 0x0D;
const LF: u16 = 0x0A;

/// Result of decoding a character message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharInput {
    /// Enter / Return, reported as a key-down of `Key::ENTER`.
    Enter(KeyEvent),
    /// Any other decodable character.
    Press(KeyPressEvent),
}

/// Which key message a `KeyboardManager` entry point is handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMessage {
    Down,
    Up,
    SystemDown,
    SystemUp,
    Char,
    DeadChar,
}

/// Modifier keys for `message`.
pub fn decode_modifiers<K: KeyState + ?Sized>(message: &Message, keys: &K) -> Modifiers {
    let mut modifiers = Modifiers::empty();

    if message.lparam_hi() & KF_ALTDOWN != 0 {
        modifiers |= Modifiers::ALT;
    }
    if keys.is_key_down(Key::CONTROL) {
        modifiers |= Modifiers::CONTROL;
    }
    if keys.is_key_down(Key::SHIFT) {
        modifiers |= Modifiers::SHIFT;
    }

    modifiers
}

/// Key event for a key-down / key-up style message.
pub fn decode_key_event<K: KeyState + ?Sized>(message: &Message, keys: &K) -> KeyEvent {
    KeyEvent {
        key_code: Key::from_vk(message.wparam_lo()),
        key_char: None,
        modifiers: decode_modifiers(message, keys),
    }
}

/// Key press for a WM_CHAR / WM_DEADCHAR message, or `None` when the character
/// is not something a text consumer should see.
///
/// Backspace, tab, carriage return and line feed never produce a key press:
/// the key-down path already reports them.  While CONTROL is held no control
/// character produces one either (Ctrl+A arrives as 0x01, and so on).
pub fn decode_key_press<K: KeyState + ?Sized>(
    message: &Message,
    keys: &K,
) -> Option<KeyPressEvent> {
    let unit = message.wparam_lo();
    if matches!(unit, 0x08 | 0x09 | LF | CR) {
        return None;
    }

    // Lone surrogate halves are not scalar values.
    let key_char = char::from_u32(unit as u32)?;
    let modifiers = decode_modifiers(message, keys);

    if modifiers.contains(Modifiers::CONTROL) && key_char.is_control() {
        return None;
    }

    Some(KeyPressEvent {
        key_char,
        modifiers,
    })
}

/// Decode a WM_CHAR message, redirecting Enter to a key event.
pub fn decode_char<K: KeyState + ?Sized>(message: &Message, keys: &K) -> Option<CharInput> {
    match message.wparam_lo() {
        CR | LF => {
            let mut event = decode_key_event(message, keys);
            event.key_code = Key::ENTER;
            Some(CharInput::Enter(event))
        }
        _ => decode_key_press(message, keys).map(CharInput::Press),
    }
}

// ── Delegate ──────────────────────────────────────────────────────────────────

/// Receives decoded keyboard events.  Every method defaults to doing nothing.
pub trait KeyboardDelegate {
    fn on_key_press(&mut self, _event: KeyPressEvent) {}
    fn on_key_down(&mut self, _event: KeyEvent) {}
    fn on_key_up(&mut self, _event: KeyEvent) {}

    /// A dead key (an accent waiting for the next character) was typed.
    fn on_dead_char(&mut self, _event: KeyPressEvent) {}
}

/// Decodes key messages for one window and forwards them to its delegate.
///
/// Without a delegate every entry point returns `None` so the message falls
/// through to default processing untouched.
#[derive(Default)]
pub struct KeyboardManager {
    delegate: Option<Box<dyn KeyboardDelegate>>,
}

impl KeyboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_delegate(&mut self, delegate: impl KeyboardDelegate + 'static) {
        self.delegate = Some(Box::new(delegate));
    }

    pub fn take_delegate(&mut self) -> Option<Box<dyn KeyboardDelegate>> {
        self.delegate.take()
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    /// Decode `message` as `kind` and report it.  Returns `Some(0)` when the
    /// message was consumed, `None` when default processing should run.
    pub fn handle<K: KeyState + ?Sized>(
        &mut self,
        kind: KeyMessage,
        message: &Message,
        keys: &K,
    ) -> Option<isize> {
        let delegate = self.delegate.as_deref_mut()?;

        match kind {
            KeyMessage::Down => {
                delegate.on_key_down(decode_key_event(message, keys));
                Some(0)
            }
            KeyMessage::Up => {
                delegate.on_key_up(decode_key_event(message, keys));
                Some(0)
            }
            // Reported, but the system still needs these for the window menu
            // and Alt+F4.
            KeyMessage::SystemDown => {
                delegate.on_key_down(decode_key_event(message, keys));
                None
            }
            KeyMessage::SystemUp => {
                delegate.on_key_up(decode_key_event(message, keys));
                None
            }
            KeyMessage::Char => match decode_char(message, keys)? {
                CharInput::Enter(event) => {
                    delegate.on_key_down(event);
                    Some(0)
                }
                CharInput::Press(event) => {
                    delegate.on_key_press(event);
                    None
                }
            },
            KeyMessage::DeadChar => {
                if let Some(event) = decode_key_press(message, keys) {
                    delegate.on_dead_char(event);
                }
                None
            }
        }
    }
}
