// Overridable per-window hooks.

use super::{MouseButton, MouseWheel, Window};
use crate::{
    geometry::{Point, Size},
    input::keyboard::KeyMessage,
    message::Message,
};

/// One method per `WindowEvent` variant.
///
/// The router has already updated `Window` state (size, DPI, tracking flags,
/// lifecycle) by the time a hook runs, so overriding a hook never breaks those
/// invariants.  Hooks returning `Option<isize>` decide whether the message is
/// consumed (`Some(result)`) or falls through to default processing (`None`);
/// every default falls through.
pub trait WindowHandler {
    /// Runs while `window.needs_layout()` is set, until it is cleared.  The
    /// default clears it immediately.
    fn on_layout(&mut self, window: &mut Window) {
        window.clear_needs_layout();
    }

    /// The window received `WM_DESTROY`.  Called once.
    fn on_close(&mut self, _window: &mut Window) {}

    /// Implementations that draw must validate the update region and call
    /// `window.clear_needs_display()`.  The default fills the background.
    fn on_paint(&mut self, window: &mut Window) {
        window.paint_background();
    }

    fn on_resize(&mut self, _window: &mut Window, _size: Size) {}

    /// The window moved to a monitor with a different DPI.  Bounds have
    /// already been moved to the system's suggestion.
    fn on_dpi_changed(&mut self, _window: &mut Window, _dpi: u32) {}

    fn on_mouse_move(&mut self, _window: &mut Window, _point: Point) -> Option<isize> {
        None
    }

    fn on_mouse_wheel(&mut self, _window: &mut Window, _wheel: MouseWheel) -> Option<isize> {
        None
    }

    fn on_mouse_hwheel(&mut self, _window: &mut Window, _wheel: MouseWheel) -> Option<isize> {
        None
    }

    fn on_mouse_leave(&mut self, _window: &mut Window) {}

    /// Only raised when the application itself requested hover tracking.
    fn on_mouse_hover(&mut self, _window: &mut Window, _point: Point) {}

    fn on_mouse_down(
        &mut self,
        _window: &mut Window,
        _button: MouseButton,
        _point: Point,
    ) -> Option<isize> {
        None
    }

    fn on_mouse_up(
        &mut self,
        _window: &mut Window,
        _button: MouseButton,
        _point: Point,
    ) -> Option<isize> {
        None
    }

    /// Any key message.  The default decodes it and reports it to the
    /// window's keyboard delegate.
    fn on_key(&mut self, window: &mut Window, kind: KeyMessage, message: &Message) -> Option<isize> {
        window.route_key(kind, message)
    }

    /// Messages the router does not classify.
    fn on_message(&mut self, _window: &mut Window, _message: &Message) -> Option<isize> {
        None
    }
}

/// Handler with every default.
impl WindowHandler for () {}
