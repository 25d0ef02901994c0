// ── Message envelope ──────────────────────────────────────────────────────────
//
// One native event: a message code plus the two machine-word parameters the
// window procedure received.  No `unsafe` here; the Win32 backend converts
// `WPARAM`/`LPARAM` to plain integers before anything in the core sees them.

/// Native message codes the core dispatches on.
///
/// The values are the Win32 `WM_*` constants; they are spelled out here so the
/// dispatch core does not depend on the Windows bindings.
pub mod codes {
    pub const WM_NULL: u32 = 0x0000;
    pub const WM_DESTROY: u32 = 0x0002;
    pub const WM_SIZE: u32 = 0x0005;
    pub const WM_PAINT: u32 = 0x000F;
    pub const WM_CLOSE: u32 = 0x0010;
    pub const WM_QUIT: u32 = 0x0012;
    pub const WM_ACTIVATEAPP: u32 = 0x001C;
    pub const WM_GETMINMAXINFO: u32 = 0x0024;
    pub const WM_WINDOWPOSCHANGING: u32 = 0x0046;
    pub const WM_WINDOWPOSCHANGED: u32 = 0x0047;
    pub const WM_NCDESTROY: u32 = 0x0082;
    pub const WM_NCCALCSIZE: u32 = 0x0083;
    pub const WM_KEYDOWN: u32 = 0x0100;
    pub const WM_KEYUP: u32 = 0x0101;
    pub const WM_CHAR: u32 = 0x0102;
    pub const WM_DEADCHAR: u32 = 0x0103;
    pub const WM_SYSKEYDOWN: u32 = 0x0104;
    pub const WM_SYSKEYUP: u32 = 0x0105;
    pub const WM_MOUSEMOVE: u32 = 0x0200;
    pub const WM_LBUTTONDOWN: u32 = 0x0201;
    pub const WM_LBUTTONUP: u32 = 0x0202;
    pub const WM_RBUTTONDOWN: u32 = 0x0204;
    pub const WM_RBUTTONUP: u32 = 0x0205;
    pub const WM_MBUTTONDOWN: u32 = 0x0207;
    pub const WM_MBUTTONUP: u32 = 0x0208;
    pub const WM_MOUSEWHEEL: u32 = 0x020A;
    pub const WM_MOUSEHWHEEL: u32 = 0x020E;
    pub const WM_MOUSEHOVER: u32 = 0x02A1;
    pub const WM_MOUSELEAVE: u32 = 0x02A3;
    pub const WM_DPICHANGED: u32 = 0x02E0;
    pub const WM_USER: u32 = 0x0400;

    /// Set in the high word of a key message's `lparam` while ALT is held.
    pub const KF_ALTDOWN: u16 = 0x2000;
}

/// An immutable `(code, wparam, lparam)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Message {
    pub code: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl Message {
    pub const fn new(code: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            code,
            wparam,
            lparam,
        }
    }

    /// `lparam` points into the sender's frame and is only valid while the
    /// message is being handled; a copy must never be kept for later.
    pub fn borrows_lparam(&self) -> bool {
        use codes::*;
        matches!(
            self.code,
            WM_GETMINMAXINFO
                | WM_WINDOWPOSCHANGING
                | WM_WINDOWPOSCHANGED
                | WM_NCCALCSIZE
                | WM_DPICHANGED
        )
    }

    /// Low 16 bits of `wparam`.
    pub fn wparam_lo(&self) -> u16 {
        loword(self.wparam as isize)
    }

    /// Bits 16..32 of `wparam`.
    pub fn wparam_hi(&self) -> u16 {
        hiword(self.wparam as isize)
    }

    /// Low 16 bits of `lparam`.
    pub fn lparam_lo(&self) -> u16 {
        loword(self.lparam)
    }

    /// Bits 16..32 of `lparam`.
    pub fn lparam_hi(&self) -> u16 {
        hiword(self.lparam)
    }

    /// Signed x coordinate packed in `lparam` (`GET_X_LPARAM`).
    pub fn x_lparam(&self) -> i32 {
        self.lparam_lo() as i16 as i32
    }

    /// Signed y coordinate packed in `lparam` (`GET_Y_LPARAM`).
    pub fn y_lparam(&self) -> i32 {
        self.lparam_hi() as i16 as i32
    }
}

pub(crate) fn loword(value: isize) -> u16 {
    (value as usize & 0xFFFF) as u16
}

pub(crate) fn hiword(value: isize) -> u16 {
    ((value as usize >> 16) & 0xFFFF) as u16
}

/// Pack two 16-bit halves the way `MAKELPARAM` does.
pub(crate) fn make_long(lo: u16, hi: u16) -> isize {
    (lo as u32 | (hi as u32) << 16) as isize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_split_low_then_high() {
        let msg = Message::new(codes::WM_SIZE, 0, make_long(800, 600));
        assert_eq!(msg.lparam_lo(), 800);
        assert_eq!(msg.lparam_hi(), 600);
    }

    #[test]
    fn coordinates_are_sign_extended() {
        // (-10, -20) as packed by the system for a point left of / above a window.
        let msg = Message::new(
            codes::WM_MOUSEMOVE,
            0,
            make_long((-10i16) as u16, (-20i16) as u16),
        );
        assert_eq!(msg.x_lparam(), -10);
        assert_eq!(msg.y_lparam(), -20);
    }

    #[test]
    fn wparam_halves() {
        let msg = Message::new(codes::WM_DPICHANGED, 0x00C0_0090, 0);
        assert_eq!(msg.wparam_lo(), 0x90);
        assert_eq!(msg.wparam_hi(), 0xC0);
    }
}
