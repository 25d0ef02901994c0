#![allow(unsafe_code)]

use windows::Win32::{
    Foundation::{FALSE, HWND, RECT},
    UI::{
        HiDpi::{
            AdjustWindowRectExForDpi, GetDpiForSystem, GetDpiForWindow,
            SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
        },
        WindowsAndMessaging::{WINDOW_EX_STYLE, WINDOW_STYLE},
    },
};

use super::{from_rect, to_rect};
use crate::{error::Result, geometry::Rect, window::DEFAULT_DPI};

/// Opt into Per-Monitor v2 DPI awareness.
/// MUST be called before any window is created on the calling thread.
pub(crate) fn enable_awareness() -> Result<()> {
    // SAFETY: Process-wide setting with no pointer arguments; called once at
    // startup before any window exists.
    unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) }?;
    Ok(())
}

/// Return the DPI for `hwnd`. Falls back to 96 on failure.
pub(crate) fn for_window(hwnd: HWND) -> u32 {
    // SAFETY: hwnd is a valid window handle provided by the caller.
    let v = unsafe { GetDpiForWindow(hwnd) };
    if v == 0 {
        DEFAULT_DPI
    } else {
        v
    }
}

/// Return the primary-monitor system DPI. Used before window creation.
pub(crate) fn system() -> u32 {
    // SAFETY: GetDpiForSystem takes no parameters and always succeeds on Win10+.
    let v = unsafe { GetDpiForSystem() };
    if v == 0 {
        DEFAULT_DPI
    } else {
        v
    }
}

/// Grow `client` by the non-client area a window with `style`/`ex_style`
/// has at `dpi`.
pub(crate) fn adjust_for_chrome(
    client: Rect,
    style: WINDOW_STYLE,
    ex_style: WINDOW_EX_STYLE,
    dpi: u32,
) -> Result<Rect> {
    let mut rect: RECT = to_rect(client);
    // SAFETY: `rect` is a valid, initialised RECT owned by this frame.
    unsafe { AdjustWindowRectExForDpi(&mut rect, style, FALSE, ex_style, dpi) }?;
    Ok(from_rect(&rect))
}
