// Classification of raw envelopes into the events a window reacts to.

use crate::{
    custom_message::{BuiltinMessages, InvalidateMessage},
    geometry::{Point, Rect, Size},
    input::keyboard::KeyMessage,
    message::{codes::*, Message},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Payload of `WM_MOUSEWHEEL` / `WM_MOUSEHWHEEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseWheel {
    /// Multiples of `WHEEL_DELTA` (120); positive is away from the user or
    /// to the right.
    pub delta: i16,
    /// `MK_*` flags for buttons and modifier keys held.
    pub keys: u16,
    /// Cursor position in screen coordinates.
    pub point: Point,
}

/// What a message means to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// `WM_DESTROY` or `WM_NCDESTROY`.
    Destroy,
    Paint,
    Resize(Size),
    DpiChanged(u32),
    MouseMove(Point),
    MouseWheel(MouseWheel),
    MouseHWheel(MouseWheel),
    MouseLeave,
    MouseHover(Point),
    MouseDown(MouseButton, Point),
    MouseUp(MouseButton, Point),
    Key(KeyMessage),
    GetMinMaxInfo,
    /// The library's layout message.
    Layout,
    /// The library's invalidate message.
    Invalidate(Rect),
    /// Anything else; handed to `WindowHandler::on_message`.
    Other,
}

impl WindowEvent {
    pub fn classify(message: &Message, builtins: &BuiltinMessages) -> Self {
        let point = || Point::new(message.x_lparam(), message.y_lparam());
        let wheel = || MouseWheel {
            delta: message.wparam_hi() as i16,
            keys: message.wparam_lo(),
            point: point(),
        };

        match message.code {
            WM_DESTROY | WM_NCDESTROY => Self::Destroy,
            WM_PAINT => Self::Paint,
            WM_SIZE => Self::Resize(Size::new(
                message.lparam_lo() as i32,
                message.lparam_hi() as i32,
            )),
            WM_DPICHANGED => Self::DpiChanged(message.wparam_hi() as u32),

            WM_MOUSEMOVE => Self::MouseMove(point()),
            WM_MOUSEWHEEL => Self::MouseWheel(wheel()),
            WM_MOUSEHWHEEL => Self::MouseHWheel(wheel()),
            WM_MOUSELEAVE => Self::MouseLeave,
            WM_MOUSEHOVER => Self::MouseHover(point()),
            WM_LBUTTONDOWN => Self::MouseDown(MouseButton::Left, point()),
            WM_MBUTTONDOWN => Self::MouseDown(MouseButton::Middle, point()),
            WM_RBUTTONDOWN => Self::MouseDown(MouseButton::Right, point()),
            WM_LBUTTONUP => Self::MouseUp(MouseButton::Left, point()),
            WM_MBUTTONUP => Self::MouseUp(MouseButton::Middle, point()),
            WM_RBUTTONUP => Self::MouseUp(MouseButton::Right, point()),

            WM_KEYDOWN => Self::Key(KeyMessage::Down),
            WM_KEYUP => Self::Key(KeyMessage::Up),
            WM_SYSKEYDOWN => Self::Key(KeyMessage::SystemDown),
            WM_SYSKEYUP => Self::Key(KeyMessage::SystemUp),
            WM_CHAR => Self::Key(KeyMessage::Char),
            WM_DEADCHAR => Self::Key(KeyMessage::DeadChar),

            WM_GETMINMAXINFO => Self::GetMinMaxInfo,

            code if code == builtins.layout => Self::Layout,
            code if code == builtins.invalidate => {
                Self::Invalidate(InvalidateMessage::decode(message).rect)
            }

            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_message::CustomMessage;
    use crate::message::make_long;

    const BUILTINS: BuiltinMessages = BuiltinMessages {
        layout: 0xC100,
        invalidate: 0xC101,
    };

    #[test]
    fn resize_unpacks_width_then_height() {
        let msg = Message::new(WM_SIZE, 0, make_long(800, 600));
        assert_eq!(
            WindowEvent::classify(&msg, &BUILTINS),
            WindowEvent::Resize(Size::new(800, 600))
        );
    }

    #[test]
    fn wheel_delta_is_signed_high_word() {
        let msg = Message::new(
            WM_MOUSEWHEEL,
            make_long(0x0008, (-120i16) as u16) as usize,
            make_long(100, 50),
        );
        let WindowEvent::MouseWheel(wheel) = WindowEvent::classify(&msg, &BUILTINS) else {
            panic!("not a wheel event");
        };
        assert_eq!(wheel.delta, -120);
        assert_eq!(wheel.keys, 0x0008);
        assert_eq!(wheel.point, Point::new(100, 50));
    }

    #[test]
    fn dpi_comes_from_high_word() {
        let msg = Message::new(WM_DPICHANGED, make_long(144, 144) as usize, 0);
        assert_eq!(WindowEvent::classify(&msg, &BUILTINS), WindowEvent::DpiChanged(144));
    }

    #[test]
    fn both_destroy_codes_are_destroy() {
        for code in [WM_DESTROY, WM_NCDESTROY] {
            assert_eq!(
                WindowEvent::classify(&Message::new(code, 0, 0), &BUILTINS),
                WindowEvent::Destroy
            );
        }
    }

    #[test]
    fn builtin_messages_recognised_by_resolved_id() {
        let layout = Message::new(0xC100, 0, 0);
        assert_eq!(WindowEvent::classify(&layout, &BUILTINS), WindowEvent::Layout);

        let invalidate = InvalidateMessage::new(Rect::new(1, 2, 3, 4)).envelope(0xC101);
        assert_eq!(
            WindowEvent::classify(&invalidate, &BUILTINS),
            WindowEvent::Invalidate(Rect::new(1, 2, 3, 4))
        );
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(
            WindowEvent::classify(&Message::new(WM_CLOSE, 0, 0), &BUILTINS),
            WindowEvent::Other
        );
        assert_eq!(
            WindowEvent::classify(&Message::new(0xC555, 0, 0), &BUILTINS),
            WindowEvent::Other
        );
    }
}
