// ── Platform abstraction layer ────────────────────────────────────────────────
//
// The traits in this module are everything the dispatch core asks of the OS.
// No `unsafe` lives here; all Win32 FFI is confined to the `win32` sub-module
// and never leaks outward.  Every call is fallible and most failures are
// logged by the caller rather than propagated.

use std::{sync::Arc, time::Duration};

use crate::{
    custom_message::MessageAllocator,
    error::Result,
    geometry::{Point, Rect, Size},
    input::KeyState,
    message::Message,
    runloop::AppStateNotifier,
};

#[cfg(windows)]
pub mod win32;

/// Opaque, non-owning reference to a native window (`HWND` bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

bitflags::bitflags! {
    /// Subset of `SWP_*` flags used when repositioning a window.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PositionFlags: u32 {
        const NO_SIZE = 0x0001;
        const NO_MOVE = 0x0002;
        const NO_ZORDER = 0x0004;
        const NO_ACTIVATE = 0x0010;
    }
}

/// Per-window native operations.
pub trait NativeWindow: KeyState {
    /// `PostMessageW` to `handle`.
    fn post_message(&self, handle: WindowHandle, message: Message) -> Result<()>;

    /// Mark `rect` of the client area for repaint.
    fn invalidate(&self, handle: WindowHandle, rect: Rect) -> Result<()>;

    /// `SetWindowPos` without changing z-order relative to other windows
    /// unless `flags` says otherwise.
    fn set_position(&self, handle: WindowHandle, rect: Rect, flags: PositionFlags) -> Result<()>;

    /// Arm a one-shot `WM_MOUSELEAVE`.  Returns `true` if tracking is active.
    fn track_mouse_leave(&self, handle: WindowHandle) -> bool;

    /// Show (restoring if minimized).
    fn show(&self, handle: WindowHandle);

    /// Work area of the monitor nearest to `handle`.
    fn monitor_work_area(&self, handle: WindowHandle) -> Result<Rect>;

    /// Grow a client rectangle by the window chrome at `dpi`.
    fn adjust_for_chrome(&self, client: Rect, dpi: u32) -> Result<Rect>;

    /// Validate the update region, filling it with the window background.
    fn paint_background(&self, handle: WindowHandle) -> Result<()>;

    /// Suggested bounds carried by a `WM_DPICHANGED` message.
    fn dpi_suggested_rect(&self, message: &Message) -> Option<Rect>;

    /// Store the minimum tracking size into a `WM_GETMINMAXINFO` message.
    fn set_min_track_size(&self, message: &Message, size: Size);
}

/// Thread-safe pokes at the UI thread's message queue.
pub trait NativeSignal: Send + Sync {
    /// Wake a blocked `NativeQueue::wait` without delivering anything.
    fn wake(&self);

    /// Post `WM_QUIT` carrying `exit_code` to the UI thread.
    fn post_quit(&self, exit_code: i32);
}

/// One message taken off the UI thread's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedMessage {
    /// `None` for thread messages.
    pub handle: Option<WindowHandle>,
    pub message: Message,
    pub time: u32,
    pub point: Point,
}

/// The UI thread's native message queue.
pub trait NativeQueue {
    /// Remove and return the next queued message without blocking.
    fn peek(&mut self) -> Option<QueuedMessage>;

    /// Translate and dispatch a message returned by `peek`.
    fn dispatch(&mut self, queued: &QueuedMessage);

    /// Block until input arrives or `timeout` elapses (`None` waits forever).
    fn wait(&mut self, timeout: Option<Duration>);

    fn signal(&self) -> Arc<dyn NativeSignal>;
}

/// Process-level services used while launching.
pub trait Platform {
    type Queue: NativeQueue;

    /// COM for the UI thread.  Failure aborts launch.
    fn initialize_com(&self) -> Result<()>;

    /// Per-monitor v2 DPI awareness.  Must precede window creation.
    fn enable_dpi_awareness(&self) -> Result<()>;

    /// Common controls (`InitCommonControlsEx`).
    fn init_common_controls(&self) -> Result<()>;

    /// Start reporting foreground/background transitions to `notifier`.
    fn watch_app_state(&self, notifier: AppStateNotifier) -> Result<()>;

    fn message_allocator(&self) -> Box<dyn MessageAllocator>;

    /// The calling thread's message queue.
    fn queue(&self) -> Self::Queue;
}
