// ── Native windows ────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the window class once per process.
//   • Create top-level windows and bind a router to each.
//   • Route every message through the live-window registry from a subclass
//     procedure; unhandled messages go to `DefSubclassProc`.
//   • Implement `NativeWindow` on top of the Win32 calls the router needs.
//   • Report WM_ACTIVATEAPP as foreground/background transitions.

#![allow(unsafe_code)]

use std::{cell::RefCell, rc::Rc, sync::OnceLock};

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{FALSE, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{
            BeginPaint, EndPaint, FillRect, GetMonitorInfoW, GetSysColorBrush, InvalidateRect,
            MonitorFromWindow, UpdateWindow, COLOR_WINDOW, MONITORINFO,
            MONITOR_DEFAULTTONEAREST, PAINTSTRUCT,
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Input::KeyboardAndMouse::{GetKeyState, TrackMouseEvent, TME_LEAVE, TRACKMOUSEEVENT},
            Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass},
            WindowsAndMessaging::{
                CreateWindowExW, DefWindowProcW, DestroyWindow, LoadCursorW, LoadIconW,
                PostMessageW, RegisterClassExW, SetWindowPos, ShowWindow, CS_HREDRAW,
                CS_VREDRAW, CW_USEDEFAULT, HMENU, IDC_ARROW, IDI_APPLICATION, MINMAXINFO,
                SET_WINDOW_POS_FLAGS, SW_SHOW, WINDOW_EX_STYLE, WINDOW_STYLE, WNDCLASSEXW,
                WS_EX_CLIENTEDGE, WS_OVERLAPPEDWINDOW,
            },
        },
    },
};

use super::{dpi, from_rect, handle_of, hwnd, last_error, to_rect, wide};
use crate::{
    app::LaunchContext,
    error::{Error, Result},
    geometry::{Point, Rect, Size},
    input::{Key, KeyState},
    message::{
        codes::{WM_ACTIVATEAPP, WM_DPICHANGED, WM_GETMINMAXINFO, WM_NCDESTROY},
        Message,
    },
    platform::{NativeWindow, PositionFlags, WindowHandle},
    runloop::{AppState, AppStateNotifier},
    window::{Window, WindowHandler, WindowOptions, WindowRegistry, WindowRouter},
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the window class.
const CLASS_NAME: PCWSTR = w!("MinWin32Window");

/// Style used both to create windows and to size them for their chrome.
const STYLE: WINDOW_STYLE = WS_OVERLAPPEDWINDOW;
const EX_STYLE: WINDOW_EX_STYLE = WS_EX_CLIENTEDGE;

/// `uIdSubclass` for the routing subclass.
const SUBCLASS_ID: usize = 1;

// ── UI-thread state ───────────────────────────────────────────────────────────

thread_local! {
    /// Every live window created on this thread.
    static REGISTRY: WindowRegistry = WindowRegistry::new();

    /// Where WM_ACTIVATEAPP transitions are reported, once the app watches.
    static APP_STATE: RefCell<Option<AppStateNotifier>> = const { RefCell::new(None) };
}

pub(crate) fn set_app_state_notifier(notifier: AppStateNotifier) {
    APP_STATE.with(|slot| *slot.borrow_mut() = Some(notifier));
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Create a top-level window, route its messages to `handler`, and show it.
pub fn create_window<H: WindowHandler + 'static>(
    context: &LaunchContext<'_>,
    options: &WindowOptions,
    handler: H,
) -> Result<WindowHandle> {
    let hinstance = module_instance()?;
    register_class(hinstance)?;

    let system_dpi = dpi::system();
    let client = Rect {
        origin: Point::default(),
        size: options.size.scaled(system_dpi),
    };
    let outer = dpi::adjust_for_chrome(client, STYLE, EX_STYLE, system_dpi)
        .unwrap_or_else(|e| {
            tracing::warn!("AdjustWindowRectExForDpi: {e}");
            client
        });

    let title = wide(&options.title);
    // SAFETY: CLASS_NAME was registered above; hinstance is the exe's module;
    // `title` is a valid null-terminated UTF-16 string that outlives the call.
    // HWND::default() (null parent) creates a top-level window.
    // None for lpParam: routing is attached afterwards by subclassing.
    let hwnd = unsafe {
        CreateWindowExW(
            EX_STYLE,
            CLASS_NAME,
            PCWSTR(title.as_ptr()),
            STYLE,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            outer.size.width,
            outer.size.height,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .map_err(|e| Error::Win32 {
        function: "CreateWindowExW",
        code: e.code().0 as u32,
    })?;
    let handle = handle_of(hwnd);

    let mut window = Window::new(handle, Rc::new(Win32Native), context.messages(), client.size);
    window.set_dpi(dpi::for_window(hwnd));
    REGISTRY.with(|registry| registry.bind(Box::new(WindowRouter::new(window, handler))));

    // SAFETY: hwnd was just created on this thread; subclass_proc stays valid
    // for the program's lifetime and is removed again on WM_NCDESTROY.
    if !unsafe { SetWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID, 0) }.as_bool() {
        let err = last_error("SetWindowSubclass");
        // SAFETY: hwnd is valid and owned by this thread.
        let _ = unsafe { DestroyWindow(hwnd) };
        return Err(err);
    }

    with_window(handle, |window| window.show(options.position));
    tracing::info!(?handle, title = %options.title, "window created");
    Ok(handle)
}

/// Run `f` on the state of a live window created on this thread.
///
/// `None` if `handle` is not a live window or its router is busy (that is,
/// `f` was called from inside one of the window's own hooks).
pub fn with_window<R>(handle: WindowHandle, f: impl FnOnce(&mut Window) -> R) -> Option<R> {
    REGISTRY.with(|registry| registry.with_router(handle, |router| f(router.window_mut())))
}

// ── Window class registration ─────────────────────────────────────────────────

fn module_instance() -> Result<HINSTANCE> {
    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // always valid for the process lifetime and never fails in practice.
    let hmodule = unsafe { GetModuleHandleW(None) }?;
    Ok(HINSTANCE(hmodule.0))
}

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    static CLASS_ATOM: OnceLock<u16> = OnceLock::new();
    if CLASS_ATOM.get().is_some() {
        return Ok(());
    }

    // SAFETY: LoadIconW with IDI_APPLICATION always succeeds; it loads the
    // built-in application icon resource, which exists on all Windows versions.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }?;

    // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
    // a built-in resource guaranteed to exist on all Windows versions.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }?;

    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~72 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(class_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        // The default paint hook fills with COLOR_WINDOW itself.
        hbrBackground: Default::default(),
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    let _ = CLASS_ATOM.set(atom);
    Ok(())
}

// ── Window procedures ─────────────────────────────────────────────────────────

// SAFETY: Called by Windows with valid parameters.  All routing happens in
// the subclass procedure; the class itself only does default processing.
unsafe extern "system" fn class_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    DefWindowProcW(hwnd, msg, wparam, lparam)
}

// SAFETY: installed with SetWindowSubclass on windows this module created.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; hwnd is only stored as the registry key.
unsafe extern "system" fn subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _id: usize,
    _data: usize,
) -> LRESULT {
    if msg == WM_ACTIVATEAPP {
        let state = if wparam.0 != 0 {
            AppState::Foreground
        } else {
            AppState::Background
        };
        let _ = APP_STATE.try_with(|slot| {
            if let Some(notifier) = slot.borrow().as_ref() {
                notifier.notify(state);
            }
        });
    }

    let message = Message::new(msg, wparam.0, lparam.0);
    // `try_with`: messages can still arrive while thread-locals are torn down.
    let routed = REGISTRY
        .try_with(|registry| registry.deliver(handle_of(hwnd), message))
        .ok()
        .flatten();

    if msg == WM_NCDESTROY {
        // SAFETY: removing our own subclass from a window being destroyed.
        let _ = RemoveWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID);
    }

    match routed {
        Some(result) => LRESULT(result),
        // SAFETY: hwnd and message parameters are valid; Windows provides them.
        None => DefSubclassProc(hwnd, msg, wparam, lparam),
    }
}

// ── Native operations ─────────────────────────────────────────────────────────

/// `NativeWindow` backed by the Win32 API.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Native;

impl KeyState for Win32Native {
    fn is_key_down(&self, key: Key) -> bool {
        // SAFETY: GetKeyState reads this thread's keyboard state; any virtual
        // key code is accepted.  The high bit (sign) is set while held.
        unsafe { GetKeyState(key.vk() as i32) < 0 }
    }
}

impl NativeWindow for Win32Native {
    fn post_message(&self, handle: WindowHandle, message: Message) -> Result<()> {
        // SAFETY: PostMessageW copies the parameters; a stale handle makes
        // the call fail rather than misbehave.
        unsafe {
            PostMessageW(
                hwnd(handle),
                message.code,
                WPARAM(message.wparam),
                LPARAM(message.lparam),
            )
        }?;
        Ok(())
    }

    fn invalidate(&self, handle: WindowHandle, rect: Rect) -> Result<()> {
        let rect = to_rect(rect);
        // SAFETY: `rect` outlives the call; InvalidateRect copies it.
        if unsafe { InvalidateRect(hwnd(handle), Some(&rect as *const RECT), FALSE) }.as_bool() {
            Ok(())
        } else {
            Err(last_error("InvalidateRect"))
        }
    }

    fn set_position(&self, handle: WindowHandle, rect: Rect, flags: PositionFlags) -> Result<()> {
        // SAFETY: No pointer arguments; HWND::default() as insert-after is
        // ignored whenever NO_ZORDER is set, and means HWND_TOP otherwise.
        unsafe {
            SetWindowPos(
                hwnd(handle),
                HWND::default(),
                rect.origin.x,
                rect.origin.y,
                rect.size.width,
                rect.size.height,
                SET_WINDOW_POS_FLAGS(flags.bits()),
            )
        }?;
        Ok(())
    }

    fn track_mouse_leave(&self, handle: WindowHandle) -> bool {
        let mut tme = TRACKMOUSEEVENT {
            cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
            dwFlags: TME_LEAVE,
            hwndTrack: hwnd(handle),
            dwHoverTime: 0,
        };
        // SAFETY: `tme` is fully initialised and outlives the call.
        match unsafe { TrackMouseEvent(&mut tme) } {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("TrackMouseEvent: {e}");
                false
            }
        }
    }

    fn show(&self, handle: WindowHandle) {
        // SAFETY: ShowWindow returns the previous visibility state; UpdateWindow
        // returns a success BOOL; neither matters here.
        unsafe {
            let _ = ShowWindow(hwnd(handle), SW_SHOW);
            let _ = UpdateWindow(hwnd(handle));
        }
    }

    fn monitor_work_area(&self, handle: WindowHandle) -> Result<Rect> {
        // SAFETY: MONITOR_DEFAULTTONEAREST always yields a monitor handle.
        let monitor = unsafe { MonitorFromWindow(hwnd(handle), MONITOR_DEFAULTTONEAREST) };
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        // SAFETY: `info` has cbSize set and outlives the call.
        if unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
            Ok(from_rect(&info.rcWork))
        } else {
            Err(last_error("GetMonitorInfoW"))
        }
    }

    fn adjust_for_chrome(&self, client: Rect, dpi: u32) -> Result<Rect> {
        dpi::adjust_for_chrome(client, STYLE, EX_STYLE, dpi)
    }

    fn paint_background(&self, handle: WindowHandle) -> Result<()> {
        let mut ps = PAINTSTRUCT::default();
        // SAFETY: Called while handling WM_PAINT for `handle`; BeginPaint and
        // EndPaint are paired on the same PAINTSTRUCT, and the system colour
        // brush is never freed by us.
        unsafe {
            let hdc = BeginPaint(hwnd(handle), &mut ps);
            if hdc.is_invalid() {
                return Err(last_error("BeginPaint"));
            }
            let _ = FillRect(hdc, &ps.rcPaint, GetSysColorBrush(COLOR_WINDOW));
            let _ = EndPaint(hwnd(handle), &ps);
        }
        Ok(())
    }

    fn dpi_suggested_rect(&self, message: &Message) -> Option<Rect> {
        if message.code != WM_DPICHANGED || message.lparam == 0 {
            return None;
        }
        // SAFETY: For WM_DPICHANGED the system passes a pointer to a RECT
        // that is valid for the duration of the message.
        let rect = unsafe { &*(message.lparam as *const RECT) };
        Some(from_rect(rect))
    }

    fn set_min_track_size(&self, message: &Message, size: Size) {
        if message.code != WM_GETMINMAXINFO || message.lparam == 0 {
            return;
        }
        // SAFETY: For WM_GETMINMAXINFO the system passes a writable MINMAXINFO
        // that is valid for the duration of the message.
        let info = unsafe { &mut *(message.lparam as *mut MINMAXINFO) };
        info.ptMinTrackSize.x = size.width;
        info.ptMinTrackSize.y = size.height;
    }
}
