// ── Windows ───────────────────────────────────────────────────────────────────
//
// `Window` is the state one native window carries between messages; the
// `router` turns envelopes into calls on a `WindowHandler`; the `registry`
// maps live native handles to their routers.  All of it is UI-thread only.

use std::{cell::Cell, rc::Rc};

use crate::{
    custom_message::{BuiltinMessages, CustomMessage, LayoutMessage},
    geometry::{Point, Rect, Size},
    input::{keyboard::KeyMessage, KeyboardManager},
    message::Message,
    platform::{NativeWindow, PositionFlags, WindowHandle},
};

pub mod event;
pub mod handler;
pub mod registry;
pub mod router;

pub use event::{MouseButton, MouseWheel, WindowEvent};
pub use handler::WindowHandler;
pub use registry::WindowRegistry;
pub use router::{Dispatch, WindowRouter};

/// Reference DPI; a window at this DPI has a scaling factor of 1.0.
pub const DEFAULT_DPI: u32 = 96;

/// Smallest client area a user can drag a window down to, at 96 DPI.
pub const MIN_CLIENT_SIZE: Size = Size::new(200, 150);

/// Lifecycle of one native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Active,
    /// `WM_DESTROY` has been received.  Terminal.
    Destroyed,
}

/// Where `Window::show` places the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitialPosition {
    /// Leave the position the system picked.
    #[default]
    Default,
    /// Center on the work area of the nearest monitor.
    Centered,
}

/// Parameters for creating a top-level window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    pub title: String,
    /// Client area at 96 DPI; scaled to the window's DPI on creation.
    pub size: Size,
    pub position: InitialPosition,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Window".to_owned(),
            size: Size::new(800, 600),
            position: InitialPosition::Default,
        }
    }
}

impl WindowOptions {
    pub fn new(title: impl Into<String>, size: Size) -> Self {
        Self {
            title: title.into(),
            size,
            ..Self::default()
        }
    }

    pub fn centered(mut self) -> Self {
        self.position = InitialPosition::Centered;
        self
    }
}

/// Window-local state, owned by the window's router.
pub struct Window {
    handle: WindowHandle,
    native: Rc<dyn NativeWindow>,
    messages: BuiltinMessages,

    size: Size,
    /// Shared with the registry, which answers some messages while the
    /// router is busy.
    dpi: Rc<Cell<u32>>,
    dpi_scaling_factor: f64,

    needs_display: bool,
    needs_layout: bool,
    pub(crate) layout_in_progress: bool,

    state: WindowState,
    mouse_tracking_on: bool,

    /// Arm `WM_MOUSELEAVE` tracking whenever the mouse moves over the client
    /// area.  Defaults to `true`.
    pub track_mouse_leave: bool,

    keyboard: KeyboardManager,
}

impl Window {
    pub fn new(
        handle: WindowHandle,
        native: Rc<dyn NativeWindow>,
        messages: BuiltinMessages,
        size: Size,
    ) -> Self {
        Self {
            handle,
            native,
            messages,
            size,
            dpi: Rc::new(Cell::new(DEFAULT_DPI)),
            dpi_scaling_factor: 1.0,
            needs_display: false,
            needs_layout: false,
            layout_in_progress: false,
            state: WindowState::Active,
            mouse_tracking_on: false,
            track_mouse_leave: true,
            keyboard: KeyboardManager::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn native(&self) -> &dyn NativeWindow {
        &*self.native
    }

    pub fn messages(&self) -> BuiltinMessages {
        self.messages
    }

    /// Client size from the last `WM_SIZE`.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn dpi(&self) -> u32 {
        self.dpi.get()
    }

    /// Always `dpi / DEFAULT_DPI`.
    pub fn dpi_scaling_factor(&self) -> f64 {
        self.dpi_scaling_factor
    }

    pub fn needs_display(&self) -> bool {
        self.needs_display
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == WindowState::Destroyed
    }

    pub fn is_mouse_tracking_on(&self) -> bool {
        self.mouse_tracking_on
    }

    pub fn keyboard(&self) -> &KeyboardManager {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardManager {
        &mut self.keyboard
    }

    // ── State changes ─────────────────────────────────────────────────────────

    pub fn set_dpi(&mut self, dpi: u32) {
        self.dpi.set(dpi);
        self.dpi_scaling_factor = dpi as f64 / DEFAULT_DPI as f64;
    }

    pub(crate) fn shared_native(&self) -> Rc<dyn NativeWindow> {
        Rc::clone(&self.native)
    }

    pub(crate) fn shared_dpi(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.dpi)
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.state = WindowState::Destroyed;
    }

    /// Arm leave-tracking if enabled and not already armed.
    pub(crate) fn arm_mouse_tracking(&mut self) {
        if self.track_mouse_leave && !self.mouse_tracking_on {
            self.mouse_tracking_on = self.native.track_mouse_leave(self.handle);
        }
    }

    pub(crate) fn disarm_mouse_tracking(&mut self) {
        self.mouse_tracking_on = false;
    }

    // ── Display ───────────────────────────────────────────────────────────────

    /// Show the window on screen.
    pub fn show(&mut self, position: InitialPosition) {
        if self.is_destroyed() {
            tracing::warn!(
                handle = ?self.handle,
                "show() called after WM_DESTROY; the window will not be shown"
            );
            return;
        }

        self.native.show(self.handle);

        if position == InitialPosition::Centered {
            match self.native.monitor_work_area(self.handle) {
                Ok(work) => {
                    let origin = work.centered(self.size);
                    let rect = Rect {
                        origin,
                        size: self.size,
                    };
                    if let Err(e) = self.native.set_position(
                        self.handle,
                        rect,
                        PositionFlags::NO_ZORDER | PositionFlags::NO_SIZE,
                    ) {
                        tracing::error!("centering window: {e}");
                    }
                }
                Err(e) => tracing::error!("querying monitor work area: {e}"),
            }
        }
    }

    /// Request a layout pass before the next paint.
    ///
    /// The pass runs when the posted layout message comes back through the
    /// queue, or earlier if a paint arrives first.  Requests made while a pass
    /// is running are picked up by that pass.
    pub fn set_needs_layout(&mut self) {
        if self.is_destroyed() {
            tracing::warn!(handle = ?self.handle, "set_needs_layout() after WM_DESTROY ignored");
            return;
        }
        if self.needs_layout {
            return;
        }
        self.needs_layout = true;

        if !self.layout_in_progress {
            let envelope = LayoutMessage.envelope(self.messages.layout);
            if let Err(e) = self.native.post_message(self.handle, envelope) {
                // Left set, the flag would swallow every later request.
                tracing::error!(handle = ?self.handle, "posting layout request: {e}");
                self.needs_layout = false;
            }
        }
    }

    pub fn clear_needs_layout(&mut self) {
        self.needs_layout = false;
    }

    /// Invalidate the whole client area.
    pub fn set_needs_display(&mut self) {
        let rect = Rect {
            origin: Point::default(),
            size: self.size,
        };
        self.set_needs_display_in(rect);
    }

    /// Invalidate `rect` of the client area.
    pub fn set_needs_display_in(&mut self, rect: Rect) {
        if self.is_destroyed() {
            tracing::warn!(handle = ?self.handle, "set_needs_display() after WM_DESTROY ignored");
            return;
        }
        if let Err(e) = self.native.invalidate(self.handle, rect) {
            tracing::error!("invalidating {rect:?}: {e}");
        }
        self.needs_display = true;
    }

    pub fn clear_needs_display(&mut self) {
        self.needs_display = false;
    }

    /// Fill the update region with the window background and mark the
    /// display as up to date.
    pub fn paint_background(&mut self) {
        if let Err(e) = self.native.paint_background(self.handle) {
            tracing::error!("painting background: {e}");
        }
        self.needs_display = false;
    }

    // ── Messaging ─────────────────────────────────────────────────────────────

    /// Post a raw message to this window's queue.
    pub fn post(&self, message: Message) {
        if let Err(e) = self.native.post_message(self.handle, message) {
            tracing::error!(code = message.code, "posting message: {e}");
        }
    }

    /// Post a custom message using its resolved identifier.
    pub fn post_custom<M: CustomMessage>(&self, message: &M, code: u32) {
        self.post(message.envelope(code));
    }

    /// Decode a key message and report it to the keyboard delegate.
    pub fn route_key(&mut self, kind: KeyMessage, message: &Message) -> Option<isize> {
        self.keyboard.handle(kind, message, &*self.native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNative, NativeCall};

    fn window(native: &Rc<FakeNative>) -> Window {
        Window::new(
            WindowHandle(7),
            native.clone(),
            BuiltinMessages::PRIVATE,
            Size::new(640, 480),
        )
    }

    #[test]
    fn scaling_factor_tracks_dpi() {
        let native = FakeNative::new();
        let mut w = window(&native);
        assert_eq!(w.dpi_scaling_factor(), 1.0);
        w.set_dpi(144);
        assert_eq!(w.dpi_scaling_factor(), 1.5);
        w.set_dpi(192);
        assert_eq!(w.dpi_scaling_factor(), 2.0);
    }

    #[test]
    fn needs_display_defaults_to_whole_client() {
        let native = FakeNative::new();
        let mut w = window(&native);
        w.set_needs_display();
        assert!(w.needs_display());
        assert_eq!(native.calls(), vec![NativeCall::Invalidate(Rect::new(0, 0, 640, 480))]);
    }

    #[test]
    fn needs_layout_posts_once() {
        let native = FakeNative::new();
        let mut w = window(&native);
        w.set_needs_layout();
        w.set_needs_layout();
        assert!(w.needs_layout());
        assert_eq!(
            native.calls(),
            vec![NativeCall::Post(Message::new(BuiltinMessages::PRIVATE.layout, 0, 0))]
        );
    }

    #[test]
    fn failed_layout_post_does_not_block_later_requests() {
        let native = FakeNative::new();
        let mut w = window(&native);

        native.set_posts_fail(true);
        w.set_needs_layout();
        assert!(!w.needs_layout());
        assert!(native.posted().is_empty());

        native.set_posts_fail(false);
        w.set_needs_layout();
        assert!(w.needs_layout());
        assert_eq!(
            native.posted(),
            vec![Message::new(BuiltinMessages::PRIVATE.layout, 0, 0)]
        );
    }

    #[test]
    fn centered_show_uses_work_area() {
        let native = FakeNative::new();
        native.set_work_area(Rect::new(0, 0, 1920, 1040));
        let mut w = window(&native);
        w.show(InitialPosition::Centered);
        assert_eq!(
            native.calls(),
            vec![
                NativeCall::Show,
                NativeCall::SetPosition(
                    Rect::new(640, 280, 640, 480),
                    PositionFlags::NO_ZORDER | PositionFlags::NO_SIZE
                ),
            ]
        );
    }

    #[test]
    fn operations_after_destroy_are_no_ops() {
        let native = FakeNative::new();
        let mut w = window(&native);
        w.mark_destroyed();
        w.show(InitialPosition::Default);
        w.set_needs_layout();
        w.set_needs_display();
        assert!(!w.needs_layout());
        assert!(!w.needs_display());
        assert!(native.calls().is_empty());
    }

    #[test]
    fn tracking_not_armed_when_disabled() {
        let native = FakeNative::new();
        let mut w = window(&native);
        w.track_mouse_leave = false;
        w.arm_mouse_tracking();
        assert!(!w.is_mouse_tracking_on());
        assert!(native.calls().is_empty());
    }
}
