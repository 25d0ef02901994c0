// Virtual-key codes.  Values are the Win32 `VK_*` constants.

/// A Win32 virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(pub u16);

impl Key {
    pub const fn from_vk(vk: u16) -> Self {
        Self(vk)
    }

    pub const fn vk(self) -> u16 {
        self.0
    }

    /// `true` for the letter keys `A`..=`Z`.
    pub const fn is_letter(self) -> bool {
        self.0 >= Self::A.0 && self.0 <= Self::Z.0
    }

    /// `true` for the top-row digit keys `0`..=`9`.
    pub const fn is_digit(self) -> bool {
        self.0 >= Self::D0.0 && self.0 <= Self::D9.0
    }

    /// `true` for `F1`..=`F24`.
    pub const fn is_function(self) -> bool {
        self.0 >= Self::F1.0 && self.0 <= Self::F24.0
    }

    // ── Mouse buttons ─────────────────────────────────────────────────────────
    pub const LBUTTON: Key = Key(0x01);
    pub const RBUTTON: Key = Key(0x02);
    pub const CANCEL: Key = Key(0x03);
    pub const MBUTTON: Key = Key(0x04);
    pub const XBUTTON1: Key = Key(0x05);
    pub const XBUTTON2: Key = Key(0x06);

    // ── Editing & control ─────────────────────────────────────────────────────
    pub const BACK: Key = Key(0x08);
    pub const TAB: Key = Key(0x09);
    pub const CLEAR: Key = Key(0x0C);
    pub const ENTER: Key = Key(0x0D);
    pub const SHIFT: Key = Key(0x10);
    pub const CONTROL: Key = Key(0x11);
    /// The ALT key (`VK_MENU`).
    pub const MENU: Key = Key(0x12);
    pub const PAUSE: Key = Key(0x13);
    pub const CAPITAL: Key = Key(0x14);

    // ── IME ───────────────────────────────────────────────────────────────────
    pub const KANA: Key = Key(0x15);
    pub const IME_ON: Key = Key(0x16);
    pub const JUNJA: Key = Key(0x17);
    pub const FINAL: Key = Key(0x18);
    pub const KANJI: Key = Key(0x19);
    pub const IME_OFF: Key = Key(0x1A);
    pub const ESCAPE: Key = Key(0x1B);
    pub const CONVERT: Key = Key(0x1C);
    pub const NONCONVERT: Key = Key(0x1D);
    pub const ACCEPT: Key = Key(0x1E);
    pub const MODECHANGE: Key = Key(0x1F);
    /// Reported in place of the real key while an IME is composing.
    pub const PROCESSKEY: Key = Key(0xE5);

    // ── Navigation ────────────────────────────────────────────────────────────
    pub const SPACE: Key = Key(0x20);
    pub const PRIOR: Key = Key(0x21);
    pub const NEXT: Key = Key(0x22);
    pub const END: Key = Key(0x23);
    pub const HOME: Key = Key(0x24);
    pub const LEFT: Key = Key(0x25);
    pub const UP: Key = Key(0x26);
    pub const RIGHT: Key = Key(0x27);
    pub const DOWN: Key = Key(0x28);
    pub const SELECT: Key = Key(0x29);
    pub const PRINT: Key = Key(0x2A);
    pub const EXECUTE: Key = Key(0x2B);
    pub const SNAPSHOT: Key = Key(0x2C);
    pub const INSERT: Key = Key(0x2D);
    pub const DELETE: Key = Key(0x2E);
    pub const HELP: Key = Key(0x2F);

    // ── Digits & letters ──────────────────────────────────────────────────────
    pub const D0: Key = Key(0x30);
    pub const D1: Key = Key(0x31);
    pub const D2: Key = Key(0x32);
    pub const D3: Key = Key(0x33);
    pub const D4: Key = Key(0x34);
    pub const D5: Key = Key(0x35);
    pub const D6: Key = Key(0x36);
    pub const D7: Key = Key(0x37);
    pub const D8: Key = Key(0x38);
    pub const D9: Key = Key(0x39);
    pub const A: Key = Key(0x41);
    pub const B: Key = Key(0x42);
    pub const C: Key = Key(0x43);
    pub const D: Key = Key(0x44);
    pub const E: Key = Key(0x45);
    pub const F: Key = Key(0x46);
    pub const G: Key = Key(0x47);
    pub const H: Key = Key(0x48);
    pub const I: Key = Key(0x49);
    pub const J: Key = Key(0x4A);
    pub const K: Key = Key(0x4B);
    pub const L: Key = Key(0x4C);
    pub const M: Key = Key(0x4D);
    pub const N: Key = Key(0x4E);
    pub const O: Key = Key(0x4F);
    pub const P: Key = Key(0x50);
    pub const Q: Key = Key(0x51);
    pub const R: Key = Key(0x52);
    pub const S: Key = Key(0x53);
    pub const T: Key = Key(0x54);
    pub const U: Key = Key(0x55);
    pub const V: Key = Key(0x56);
    pub const W: Key = Key(0x57);
    pub const X: Key = Key(0x58);
    pub const Y: Key = Key(0x59);
    pub const Z: Key = Key(0x5A);

    // ── Windows keys ──────────────────────────────────────────────────────────
    pub const LWIN: Key = Key(0x5B);
    pub const RWIN: Key = Key(0x5C);
    pub const APPS: Key = Key(0x5D);
    pub const SLEEP: Key = Key(0x5F);

    // ── Numeric keypad ────────────────────────────────────────────────────────
    pub const NUMPAD0: Key = Key(0x60);
    pub const NUMPAD1: Key = Key(0x61);
    pub const NUMPAD2: Key = Key(0x62);
    pub const NUMPAD3: Key = Key(0x63);
    pub const NUMPAD4: Key = Key(0x64);
    pub const NUMPAD5: Key = Key(0x65);
    pub const NUMPAD6: Key = Key(0x66);
    pub const NUMPAD7: Key = Key(0x67);
    pub const NUMPAD8: Key = Key(0x68);
    pub const NUMPAD9: Key = Key(0x69);
    pub const MULTIPLY: Key = Key(0x6A);
    pub const ADD: Key = Key(0x6B);
    pub const SEPARATOR: Key = Key(0x6C);
    pub const SUBTRACT: Key = Key(0x6D);
    pub const DECIMAL: Key = Key(0x6E);
    pub const DIVIDE: Key = Key(0x6F);

    // ── Function keys ─────────────────────────────────────────────────────────
    pub const F1: Key = Key(0x70);
    pub const F2: Key = Key(0x71);
    pub const F3: Key = Key(0x72);
    pub const F4: Key = Key(0x73);
    pub const F5: Key = Key(0x74);
    pub const F6: Key = Key(0x75);
    pub const F7: Key = Key(0x76);
    pub const F8: Key = Key(0x77);
    pub const F9: Key = Key(0x78);
    pub const F10: Key = Key(0x79);
    pub const F11: Key = Key(0x7A);
    pub const F12: Key = Key(0x7B);
    pub const F13: Key = Key(0x7C);
    pub const F14: Key = Key(0x7D);
    pub const F15: Key = Key(0x7E);
    pub const F16: Key = Key(0x7F);
    pub const F17: Key = Key(0x80);
    pub const F18: Key = Key(0x81);
    pub const F19: Key = Key(0x82);
    pub const F20: Key = Key(0x83);
    pub const F21: Key = Key(0x84);
    pub const F22: Key = Key(0x85);
    pub const F23: Key = Key(0x86);
    pub const F24: Key = Key(0x87);

    // ── Locks & sided modifiers ───────────────────────────────────────────────
    pub const NUMLOCK: Key = Key(0x90);
    pub const SCROLL: Key = Key(0x91);
    pub const LSHIFT: Key = Key(0xA0);
    pub const RSHIFT: Key = Key(0xA1);
    pub const LCONTROL: Key = Key(0xA2);
    pub const RCONTROL: Key = Key(0xA3);
    pub const LMENU: Key = Key(0xA4);
    pub const RMENU: Key = Key(0xA5);

    // ── Browser & media ───────────────────────────────────────────────────────
    pub const BROWSER_BACK: Key = Key(0xA6);
    pub const BROWSER_FORWARD: Key = Key(0xA7);
    pub const BROWSER_REFRESH: Key = Key(0xA8);
    pub const BROWSER_STOP: Key = Key(0xA9);
    pub const BROWSER_SEARCH: Key = Key(0xAA);
    pub const BROWSER_FAVORITES: Key = Key(0xAB);
    pub const BROWSER_HOME: Key = Key(0xAC);
    pub const VOLUME_MUTE: Key = Key(0xAD);
    pub const VOLUME_DOWN: Key = Key(0xAE);
    pub const VOLUME_UP: Key = Key(0xAF);
    pub const MEDIA_NEXT_TRACK: Key = Key(0xB0);
    pub const MEDIA_PREV_TRACK: Key = Key(0xB1);
    pub const MEDIA_STOP: Key = Key(0xB2);
    pub const MEDIA_PLAY_PAUSE: Key = Key(0xB3);
    pub const LAUNCH_MAIL: Key = Key(0xB4);
    pub const LAUNCH_MEDIA_SELECT: Key = Key(0xB5);
    pub const LAUNCH_APP1: Key = Key(0xB6);
    pub const LAUNCH_APP2: Key = Key(0xB7);

    // ── OEM ───────────────────────────────────────────────────────────────────
    pub const OEM_1: Key = Key(0xBA);
    pub const OEM_PLUS: Key = Key(0xBB);
    pub const OEM_COMMA: Key = Key(0xBC);
    pub const OEM_MINUS: Key = Key(0xBD);
    pub const OEM_PERIOD: Key = Key(0xBE);
    pub const OEM_2: Key = Key(0xBF);
    pub const OEM_3: Key = Key(0xC0);
    pub const OEM_4: Key = Key(0xDB);
    pub const OEM_5: Key = Key(0xDC);
    pub const OEM_6: Key = Key(0xDD);
    pub const OEM_7: Key = Key(0xDE);
    pub const OEM_8: Key = Key(0xDF);
    pub const OEM_102: Key = Key(0xE2);
    pub const PACKET: Key = Key(0xE7);
    pub const ATTN: Key = Key(0xF6);
    pub const CRSEL: Key = Key(0xF7);
    pub const EXSEL: Key = Key(0xF8);
    pub const EREOF: Key = Key(0xF9);
    pub const PLAY: Key = Key(0xFA);
    pub const ZOOM: Key = Key(0xFB);
    pub const PA1: Key = Key(0xFD);
    pub const OEM_CLEAR: Key = Key(0xFE);
}
