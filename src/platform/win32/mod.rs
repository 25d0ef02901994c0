// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the codebase where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{GetLastError, HWND, RECT},
        System::Com::{CoInitializeEx, COINIT_APARTMENTTHREADED},
        UI::{
            Controls::{
                InitCommonControlsEx, ICC_STANDARD_CLASSES, ICC_WIN95_CLASSES,
                INITCOMMONCONTROLSEX,
            },
            WindowsAndMessaging::RegisterWindowMessageW,
        },
    },
};

use crate::{
    custom_message::MessageAllocator,
    error::{Error, Result},
    geometry::Rect,
    runloop::AppStateNotifier,
};

use super::{Platform, WindowHandle};

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod dialogs; // fatal-error message box
pub mod queue; // PeekMessageW / MsgWaitForMultipleObjects
pub mod window; // window class, subclass procedure, native operations

pub(crate) mod dpi; // per-monitor DPI v2 helpers

pub use dialogs::show_error_dialog;
pub use queue::{Win32Queue, Win32Signal};
pub use window::{create_window, with_window, Win32Native};

// ── Platform ──────────────────────────────────────────────────────────────────

/// Process-level Win32 services.
#[derive(Debug, Default)]
pub struct Win32Platform;

impl Win32Platform {
    pub fn new() -> Self {
        Self
    }
}

impl Platform for Win32Platform {
    type Queue = Win32Queue;

    fn initialize_com(&self) -> Result<()> {
        // SAFETY: No pointer arguments; the UI thread joins a single-threaded
        // apartment for the life of the process and never uninitialises it.
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        hr.ok().map_err(|e| Error::Win32 {
            function: "CoInitializeEx",
            code: e.code().0 as u32,
        })
    }

    fn enable_dpi_awareness(&self) -> Result<()> {
        dpi::enable_awareness()
    }

    fn init_common_controls(&self) -> Result<()> {
        let icc = INITCOMMONCONTROLSEX {
            // INITCOMMONCONTROLSEX is 8 bytes; the cast to u32 is always lossless.
            dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
            dwICC: ICC_STANDARD_CLASSES | ICC_WIN95_CLASSES,
        };
        // SAFETY: `icc` is fully initialised and outlives the call.
        if unsafe { InitCommonControlsEx(&icc) }.as_bool() {
            Ok(())
        } else {
            Err(last_error("InitCommonControlsEx"))
        }
    }

    fn watch_app_state(&self, notifier: AppStateNotifier) -> Result<()> {
        window::set_app_state_notifier(notifier);
        Ok(())
    }

    fn message_allocator(&self) -> Box<dyn MessageAllocator> {
        Box::new(Win32MessageAllocator)
    }

    fn queue(&self) -> Win32Queue {
        Win32Queue::for_current_thread()
    }
}

// ── Message allocation ────────────────────────────────────────────────────────

/// `RegisterWindowMessageW`: the same name yields the same identifier in every
/// process for the rest of the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32MessageAllocator;

impl MessageAllocator for Win32MessageAllocator {
    fn register(&self, name: &str) -> Result<u32> {
        let wide = wide(name);
        // SAFETY: `wide` is a valid null-terminated UTF-16 string that remains
        // allocated for the duration of the call.
        let id = unsafe { RegisterWindowMessageW(PCWSTR(wide.as_ptr())) };
        if id == 0 {
            // SAFETY: GetLastError reads thread-local state set by the call above.
            let code = unsafe { GetLastError() }.0;
            return Err(Error::Registration {
                name: name.to_owned(),
                code,
            });
        }
        Ok(id)
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

pub(crate) fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as *mut _)
}

pub(crate) fn handle_of(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as isize)
}

pub(crate) fn to_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.origin.x,
        top: rect.origin.y,
        right: rect.right(),
        bottom: rect.bottom(),
    }
}

pub(crate) fn from_rect(rect: &RECT) -> Rect {
    Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom)
}

/// Null-terminated UTF-16 copy of `s`.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in an `Error`.
///
/// Call immediately after a Win32 function that signals failure; `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
pub(crate) fn last_error(function: &'static str) -> Error {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    Error::Win32 {
        function,
        code: code.0,
    }
}
