// ── Window message router ─────────────────────────────────────────────────────
//
// Classifies each envelope, applies the state changes the window owns, then
// calls the matching `WindowHandler` hook.  Never blocks.

use super::{event::WindowEvent, Window, WindowHandler, MIN_CLIENT_SIZE};
use crate::{
    geometry::{Point, Rect},
    message::Message,
    platform::{NativeWindow, PositionFlags, WindowHandle},
};

/// Upper bound on layout hook calls per pass.
const MAX_LAYOUT_PASSES: usize = 64;

/// Object-safe face of a router, as stored by the `WindowRegistry`.
pub trait Dispatch {
    fn handle(&self) -> WindowHandle;

    /// `Some(result)` if handled, `None` to fall through to default
    /// processing.
    fn dispatch(&mut self, message: Message) -> Option<isize>;

    fn is_destroyed(&self) -> bool;

    fn window(&self) -> &Window;

    fn window_mut(&mut self) -> &mut Window;
}

/// Owns a window's state and its handler.
pub struct WindowRouter<H> {
    window: Window,
    handler: H,
}

impl<H: WindowHandler> WindowRouter<H> {
    pub fn new(window: Window, handler: H) -> Self {
        Self { window, handler }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn dispatch(&mut self, message: Message) -> Option<isize> {
        let event = WindowEvent::classify(&message, &self.window.messages());

        if self.window.is_destroyed() {
            // Teardown messages after the first are no-ops; everything else
            // goes straight to default processing.
            return match event {
                WindowEvent::Destroy => Some(0),
                _ => None,
            };
        }

        let window = &mut self.window;
        let handler = &mut self.handler;

        match event {
            WindowEvent::Destroy => {
                tracing::debug!(handle = ?window.handle(), "window destroyed");
                window.mark_destroyed();
                handler.on_close(window);
                Some(0)
            }

            WindowEvent::Paint => {
                // Never paint stale geometry.
                if window.needs_layout() {
                    self.run_layout();
                }
                self.handler.on_paint(&mut self.window);
                Some(0)
            }

            WindowEvent::Resize(size) => {
                window.set_size(size);
                handler.on_resize(window, size);
                Some(0)
            }

            WindowEvent::DpiChanged(dpi) => {
                window.set_dpi(dpi);
                match window.native().dpi_suggested_rect(&message) {
                    Some(rect) => {
                        if let Err(e) = window.native().set_position(
                            window.handle(),
                            rect,
                            PositionFlags::NO_ZORDER | PositionFlags::NO_ACTIVATE,
                        ) {
                            tracing::error!("repositioning after DPI change: {e}");
                        }
                    }
                    None => tracing::warn!("WM_DPICHANGED without a suggested rectangle"),
                }
                handler.on_dpi_changed(window, dpi);
                Some(0)
            }

            WindowEvent::MouseMove(point) => {
                window.arm_mouse_tracking();
                handler.on_mouse_move(window, point)
            }
            WindowEvent::MouseWheel(wheel) => handler.on_mouse_wheel(window, wheel),
            WindowEvent::MouseHWheel(wheel) => handler.on_mouse_hwheel(window, wheel),
            WindowEvent::MouseLeave => {
                window.disarm_mouse_tracking();
                handler.on_mouse_leave(window);
                Some(0)
            }
            WindowEvent::MouseHover(point) => {
                // TME_HOVER is one-shot too; the next move re-arms.
                window.disarm_mouse_tracking();
                handler.on_mouse_hover(window, point);
                Some(0)
            }
            WindowEvent::MouseDown(button, point) => handler.on_mouse_down(window, button, point),
            WindowEvent::MouseUp(button, point) => handler.on_mouse_up(window, button, point),

            WindowEvent::Key(kind) => handler.on_key(window, kind, &message),

            WindowEvent::GetMinMaxInfo => {
                answer_min_max_info(window.native(), window.dpi(), &message);
                Some(0)
            }

            WindowEvent::Layout => {
                self.run_layout();
                Some(0)
            }

            WindowEvent::Invalidate(rect) => {
                window.set_needs_display_in(rect);
                Some(0)
            }

            WindowEvent::Other => handler.on_message(window, &message),
        }
    }

    /// Call the layout hook until it leaves `needs_layout` cleared.
    fn run_layout(&mut self) {
        if self.window.layout_in_progress {
            return;
        }
        self.window.layout_in_progress = true;

        let mut passes = 0;
        while self.window.needs_layout() {
            if passes == MAX_LAYOUT_PASSES {
                tracing::warn!(
                    handle = ?self.window.handle(),
                    "layout still requested after {MAX_LAYOUT_PASSES} passes; giving up"
                );
                self.window.clear_needs_layout();
                break;
            }
            self.handler.on_layout(&mut self.window);
            passes += 1;
        }

        self.window.layout_in_progress = false;
    }
}

/// Store the smallest outer size that keeps `MIN_CLIENT_SIZE` of client area
/// at `dpi` into a `WM_GETMINMAXINFO` message.
pub(crate) fn answer_min_max_info(native: &dyn NativeWindow, dpi: u32, message: &Message) {
    let client = Rect {
        origin: Point::default(),
        size: MIN_CLIENT_SIZE,
    };
    let size = match native.adjust_for_chrome(client, dpi) {
        Ok(outer) => outer.size,
        Err(e) => {
            tracing::warn!("AdjustWindowRectExForDpi: {e}");
            MIN_CLIENT_SIZE
        }
    };
    native.set_min_track_size(message, size);
}

impl<H: WindowHandler> Dispatch for WindowRouter<H> {
    fn handle(&self) -> WindowHandle {
        self.window.handle()
    }

    fn dispatch(&mut self, message: Message) -> Option<isize> {
        WindowRouter::dispatch(self, message)
    }

    fn is_destroyed(&self) -> bool {
        self.window.is_destroyed()
    }

    fn window(&self) -> &Window {
        &self.window
    }

    fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }
}
