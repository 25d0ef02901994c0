// ── Live-window registry ──────────────────────────────────────────────────────
//
// Maps native handles to their routers for the window procedure.  A router
// stays registered from creation until it reports itself destroyed.
//
// Win32 sends some messages synchronously from inside calls a handler makes
// (SetWindowPos → WM_SIZE, DestroyWindow → WM_DESTROY, …).  Those arrive while
// the router is already borrowed; they are queued and delivered in order once
// the outer dispatch returns, and fall through to default processing meanwhile.
//
// Two kinds are never queued.  Messages whose lparam points into the sender's
// frame are answered in place (WM_GETMINMAXINFO) or left to default processing.
// A nested WM_PAINT is validated by default processing, so the whole client
// area is invalidated again once the router is free.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use super::{router::answer_min_max_info, Dispatch};
use crate::{
    message::{
        codes::{WM_GETMINMAXINFO, WM_PAINT},
        Message,
    },
    platform::{NativeWindow, WindowHandle},
};

struct Binding {
    router: RefCell<Box<dyn Dispatch>>,
    deferred: RefCell<VecDeque<Message>>,
    /// Readable while the router is borrowed.
    native: Rc<dyn NativeWindow>,
    dpi: Rc<Cell<u32>>,
    repaint: Cell<bool>,
}

impl Binding {
    /// Run `f` on the router, then deliver anything deferred meanwhile.
    /// `None` if the router is already busy.
    fn with<R>(&self, f: impl FnOnce(&mut dyn Dispatch) -> R) -> Option<R> {
        let mut router = self.router.try_borrow_mut().ok()?;
        let result = f(&mut **router);

        loop {
            // Not held across dispatch: the router may defer more.
            let next = self.deferred.borrow_mut().pop_front();
            match next {
                Some(deferred) => {
                    router.dispatch(deferred);
                }
                None => break,
            }
        }

        if self.repaint.replace(false) && !router.is_destroyed() {
            router.window_mut().set_needs_display();
        }

        Some(result)
    }

    fn deliver(&self, message: Message) -> Option<isize> {
        if let Some(result) = self.with(|router| router.dispatch(message)) {
            return result;
        }

        if message.code == WM_GETMINMAXINFO {
            answer_min_max_info(&*self.native, self.dpi.get(), &message);
            Some(0)
        } else if message.borrows_lparam() {
            tracing::trace!(code = message.code, "re-entrant message left to default processing");
            None
        } else if message.code == WM_PAINT {
            tracing::trace!("re-entrant paint; repainting afterwards");
            self.repaint.set(true);
            None
        } else {
            tracing::trace!(code = message.code, "re-entrant message deferred");
            self.deferred.borrow_mut().push_back(message);
            None
        }
    }

    fn is_destroyed(&self) -> bool {
        self.router
            .try_borrow()
            .map(|router| router.is_destroyed())
            .unwrap_or(false)
    }
}

/// Handle → router table for one UI thread.
#[derive(Default)]
pub struct WindowRegistry {
    windows: RefCell<HashMap<WindowHandle, Rc<Binding>>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start routing messages for `router.handle()`.
    pub fn bind(&self, router: Box<dyn Dispatch>) {
        let handle = router.handle();
        let native = router.window().shared_native();
        let dpi = router.window().shared_dpi();
        let binding = Rc::new(Binding {
            router: RefCell::new(router),
            deferred: RefCell::new(VecDeque::new()),
            native,
            dpi,
            repaint: Cell::new(false),
        });
        if self.windows.borrow_mut().insert(handle, binding).is_some() {
            tracing::warn!(?handle, "window handle bound twice; previous router dropped");
        }
    }

    pub fn is_bound(&self, handle: WindowHandle) -> bool {
        self.windows.borrow().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.windows.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.borrow().is_empty()
    }

    /// Route `message` to the router bound to `handle`.
    ///
    /// `None` means "not handled": either nothing is bound to `handle` or the
    /// router let the message fall through.
    pub fn deliver(&self, handle: WindowHandle, message: Message) -> Option<isize> {
        let binding = self.windows.borrow().get(&handle).cloned()?;

        let result = binding.deliver(message);

        if binding.is_destroyed() && self.windows.borrow_mut().remove(&handle).is_some() {
            tracing::debug!(?handle, "window unregistered");
        }

        result
    }

    /// Run `f` on the router bound to `handle`, if it is not busy.  Messages
    /// sent to the window from inside `f` are delivered before returning.
    pub fn with_router<R>(
        &self,
        handle: WindowHandle,
        f: impl FnOnce(&mut dyn Dispatch) -> R,
    ) -> Option<R> {
        let binding = self.windows.borrow().get(&handle).cloned()?;
        let result = binding.with(f);

        if binding.is_destroyed() && self.windows.borrow_mut().remove(&handle).is_some() {
            tracing::debug!(?handle, "window unregistered");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        custom_message::BuiltinMessages,
        geometry::{Point, Rect, Size},
        message::{codes::*, make_long},
        platform::PositionFlags,
        testing::{FakeNative, NativeCall},
        window::{MouseButton, Window, WindowHandler, WindowRouter},
    };

    const HANDLE: WindowHandle = WindowHandle(0x42);

    thread_local! {
        static REGISTRY: WindowRegistry = WindowRegistry::new();
    }

    /// Sends a WM_SIZE to itself from inside a click, like SetWindowPos would.
    struct Resizer {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl WindowHandler for Resizer {
        fn on_mouse_down(&mut self, _w: &mut Window, _b: MouseButton, _p: Point) -> Option<isize> {
            self.log.borrow_mut().push("click".into());
            let nested = REGISTRY
                .with(|r| r.deliver(HANDLE, Message::new(WM_SIZE, 0, make_long(50, 60))));
            self.log.borrow_mut().push(format!("nested -> {nested:?}"));
            Some(0)
        }

        fn on_resize(&mut self, _w: &mut Window, size: Size) {
            self.log
                .borrow_mut()
                .push(format!("resize {}x{}", size.width, size.height));
        }
    }

    /// Records every unclassified message it sees.
    #[derive(Default)]
    struct Recorder {
        seen: Rc<RefCell<Vec<u32>>>,
    }

    impl WindowHandler for Recorder {
        fn on_message(&mut self, _w: &mut Window, message: &Message) -> Option<isize> {
            self.seen.borrow_mut().push(message.code);
            None
        }
    }

    fn bind<H: WindowHandler + 'static>(registry: &WindowRegistry, handler: H) {
        bind_native(registry, FakeNative::new(), handler);
    }

    fn bind_native<H: WindowHandler + 'static>(
        registry: &WindowRegistry,
        native: Rc<FakeNative>,
        handler: H,
    ) {
        let window = Window::new(HANDLE, native, BuiltinMessages::PRIVATE, Size::new(10, 10));
        registry.bind(Box::new(WindowRouter::new(window, handler)));
    }

    #[test]
    fn unbound_handles_fall_through() {
        let registry = WindowRegistry::new();
        assert_eq!(registry.deliver(HANDLE, Message::new(WM_PAINT, 0, 0)), None);
    }

    #[test]
    fn destroy_unregisters() {
        let registry = WindowRegistry::new();
        bind(&registry, ());
        assert!(registry.is_bound(HANDLE));

        assert_eq!(registry.deliver(HANDLE, Message::new(WM_DESTROY, 0, 0)), Some(0));
        assert!(!registry.is_bound(HANDLE));

        // WM_NCDESTROY that follows goes to default processing.
        assert_eq!(registry.deliver(HANDLE, Message::new(WM_NCDESTROY, 0, 0)), None);
    }

    #[test]
    fn re_entrant_messages_are_delivered_after_the_outer_one() {
        let log = Rc::new(RefCell::new(Vec::new()));
        REGISTRY.with(|r| bind(r, Resizer { log: log.clone() }));

        let result =
            REGISTRY.with(|r| r.deliver(HANDLE, Message::new(WM_LBUTTONDOWN, 0, make_long(1, 1))));

        assert_eq!(result, Some(0));
        assert_eq!(
            *log.borrow(),
            vec!["click", "nested -> None", "resize 50x60"]
        );
        // The router is free again once the outer dispatch is done.
        let busy = REGISTRY.with(|r| r.with_router(HANDLE, |router| router.is_destroyed()));
        assert_eq!(busy, Some(false));
    }

    #[test]
    fn messages_sent_inside_with_router_arrive_afterwards() {
        let registry = WindowRegistry::new();
        bind(&registry, ());

        // Synchronous send while the router is held, as ShowWindow does.
        let nested = registry.with_router(HANDLE, |_router| {
            registry.deliver(HANDLE, Message::new(WM_SIZE, 0, make_long(30, 40)))
        });

        assert_eq!(nested, Some(None));
        let size = registry.with_router(HANDLE, |router| router.window().size());
        assert_eq!(size, Some(Size::new(30, 40)));
    }

    #[test]
    fn min_max_query_during_reposition_is_answered_in_place() {
        let native = FakeNative::new();
        native.set_chrome(8, 31);
        let suggested = Rect::new(100, 100, 900, 700);
        native.set_suggested_rect(Some(suggested));

        let nested = Rc::new(Cell::new(None));
        let answer = Rc::clone(&nested);
        native.on_set_position(move || {
            // SetWindowPos asks for the tracking limits before it returns.
            let query = Message::new(WM_GETMINMAXINFO, 0, 0x1000);
            answer.set(Some(REGISTRY.with(|r| r.deliver(HANDLE, query))));
        });
        REGISTRY.with(|r| bind_native(r, native.clone(), ()));

        let dpi_changed = Message::new(WM_DPICHANGED, make_long(144, 144) as usize, 0x2000);
        let result = REGISTRY.with(|r| r.deliver(HANDLE, dpi_changed));

        assert_eq!(result, Some(0));
        assert_eq!(nested.get(), Some(Some(0)));
        assert_eq!(
            native.calls(),
            vec![
                NativeCall::SetPosition(suggested, PositionFlags::NO_ZORDER | PositionFlags::NO_ACTIVATE),
                NativeCall::MinTrackSize(Size::new(216, 189)),
            ]
        );
    }

    #[test]
    fn pointer_carrying_messages_are_never_replayed() {
        let registry = WindowRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        bind(&registry, Recorder { seen: Rc::clone(&seen) });

        let nested = registry.with_router(HANDLE, |_router| {
            [WM_WINDOWPOSCHANGING, WM_WINDOWPOSCHANGED, WM_NCCALCSIZE]
                .map(|code| registry.deliver(HANDLE, Message::new(code, 0, 0x3000)))
        });

        assert_eq!(nested, Some([None, None, None]));
        assert!(seen.borrow().is_empty());
        // The next dispatch does not pick them up either.
        registry.deliver(HANDLE, Message::new(0x0500, 0, 0));
        assert_eq!(*seen.borrow(), vec![0x0500]);
    }

    #[test]
    fn paint_during_dispatch_is_redone_as_invalidation() {
        let registry = WindowRegistry::new();
        let native = FakeNative::new();
        bind_native(&registry, native.clone(), ());

        let nested = registry.with_router(HANDLE, |_router| {
            registry.deliver(HANDLE, Message::new(WM_PAINT, 0, 0))
        });

        assert_eq!(nested, Some(None));
        assert_eq!(native.calls(), vec![NativeCall::Invalidate(Rect::new(0, 0, 10, 10))]);
        assert_eq!(
            registry.with_router(HANDLE, |router| router.window().needs_display()),
            Some(true)
        );
    }
}
