// ── Thread message queue ──────────────────────────────────────────────────────
//
// Non-blocking drain (`PeekMessageW`) plus a single bounded wait
// (`MsgWaitForMultipleObjects`) in place of a blocking `GetMessageW` loop, so
// the run loop can interleave scheduled work with input.

#![allow(unsafe_code)]

use std::{sync::Arc, time::Duration};

use windows::Win32::{
    Foundation::{FALSE, HWND, LPARAM, POINT, WPARAM},
    System::Threading::{GetCurrentThreadId, INFINITE},
    UI::WindowsAndMessaging::{
        DispatchMessageW, MsgWaitForMultipleObjects, PeekMessageW, PostQuitMessage,
        PostThreadMessageW, TranslateMessage, MSG, PM_REMOVE, QS_ALLINPUT,
    },
};

use super::{handle_of, hwnd};
use crate::{
    geometry::Point,
    message::{
        codes::{WM_NULL, WM_QUIT},
        Message,
    },
    platform::{NativeQueue, NativeSignal, QueuedMessage},
};

/// Wakes and stops the UI thread from any thread.
#[derive(Debug)]
pub struct Win32Signal {
    thread_id: u32,
}

impl Win32Signal {
    fn post(&self, code: u32, wparam: usize) -> bool {
        // SAFETY: Posting to a thread id is sound even if the thread has
        // exited; the call then fails and returns an error we report.
        unsafe { PostThreadMessageW(self.thread_id, code, WPARAM(wparam), LPARAM(0)) }
            .map_err(|e| tracing::error!(code, "PostThreadMessageW: {e}"))
            .is_ok()
    }
}

impl NativeSignal for Win32Signal {
    fn wake(&self) {
        // A null thread message is enough to end MsgWaitForMultipleObjects.
        self.post(WM_NULL, 0);
    }

    fn post_quit(&self, exit_code: i32) {
        // SAFETY: GetCurrentThreadId has no preconditions.
        if unsafe { GetCurrentThreadId() } == self.thread_id {
            // SAFETY: Called on the thread that owns the queue; WM_QUIT is
            // synthesised once the queue is otherwise empty.
            unsafe { PostQuitMessage(exit_code) };
        } else {
            self.post(WM_QUIT, exit_code as usize);
        }
    }
}

/// Message queue of the thread that created it.
pub struct Win32Queue {
    signal: Arc<Win32Signal>,
}

impl Win32Queue {
    pub fn for_current_thread() -> Self {
        // SAFETY: GetCurrentThreadId has no preconditions.
        let thread_id = unsafe { GetCurrentThreadId() };
        Self {
            signal: Arc::new(Win32Signal { thread_id }),
        }
    }
}

impl NativeQueue for Win32Queue {
    fn peek(&mut self) -> Option<QueuedMessage> {
        let mut msg = MSG::default();
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let got = unsafe { PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE) };
        if !got.as_bool() {
            return None;
        }

        Some(QueuedMessage {
            handle: (!msg.hwnd.0.is_null()).then(|| handle_of(msg.hwnd)),
            message: Message::new(msg.message, msg.wParam.0, msg.lParam.0),
            time: msg.time,
            point: Point::new(msg.pt.x, msg.pt.y),
        })
    }

    fn dispatch(&mut self, queued: &QueuedMessage) {
        let msg = MSG {
            hwnd: queued.handle.map(hwnd).unwrap_or_default(),
            message: queued.message.code,
            wParam: WPARAM(queued.message.wparam),
            lParam: LPARAM(queued.message.lparam),
            time: queued.time,
            pt: POINT {
                x: queued.point.x,
                y: queued.point.y,
            },
        };
        // SAFETY: msg was rebuilt field-for-field from a message PeekMessageW
        // returned on this thread.  TranslateMessage return value (whether it
        // generated WM_CHAR) and DispatchMessageW's LRESULT are intentionally
        // unused.
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    fn wait(&mut self, timeout: Option<Duration>) {
        let millis = timeout.map_or(INFINITE, duration_to_timeout);
        // SAFETY: No handles are passed; the call only inspects this thread's
        // input queue.
        let _ = unsafe { MsgWaitForMultipleObjects(None, FALSE, millis, QS_ALLINPUT) };
    }

    fn signal(&self) -> Arc<dyn NativeSignal> {
        self.signal.clone()
    }
}

/// Milliseconds for a Win32 wait, rounding sub-millisecond remainders up so a
/// timer is never woken early.  Durations past the `u32` range wait forever.
fn duration_to_timeout(duration: Duration) -> u32 {
    let nanos = duration.as_nanos();
    let millis = nanos.div_ceil(1_000_000);
    u32::try_from(millis)
        .ok()
        .filter(|ms| *ms != INFINITE)
        .unwrap_or(INFINITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_round_up() {
        assert_eq!(duration_to_timeout(Duration::ZERO), 0);
        assert_eq!(duration_to_timeout(Duration::from_micros(1)), 1);
        assert_eq!(duration_to_timeout(Duration::from_millis(16)), 16);
        assert_eq!(duration_to_timeout(Duration::from_secs(60 * 86_400)), INFINITE);
    }
}
