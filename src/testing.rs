// ── Test doubles ──────────────────────────────────────────────────────────────
//
// Recording fakes for the platform traits so the dispatch core can be driven
// without a real message queue.  Compiled for tests only.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    rc::Rc,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use crate::{
    custom_message::MessageAllocator,
    error::{Error, Result},
    geometry::{Point, Rect, Size},
    input::{Key, KeyEvent, KeyPressEvent, KeyState, KeyboardDelegate},
    message::{codes::WM_QUIT, Message},
    platform::{NativeQueue, NativeSignal, NativeWindow, PositionFlags, QueuedMessage, WindowHandle},
};

// ── Keyboard ──────────────────────────────────────────────────────────────────

/// Keyboard whose held keys the test controls.
#[derive(Debug, Default)]
pub struct FakeKeys {
    held: RefCell<Vec<Key>>,
}

impl FakeKeys {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn held(keys: &[Key]) -> Self {
        Self {
            held: RefCell::new(keys.to_vec()),
        }
    }

    pub fn press(&self, key: Key) {
        let mut held = self.held.borrow_mut();
        if !held.contains(&key) {
            held.push(key);
        }
    }

    pub fn release(&self, key: Key) {
        self.held.borrow_mut().retain(|k| *k != key);
    }
}

impl KeyState for FakeKeys {
    fn is_key_down(&self, key: Key) -> bool {
        self.held.borrow().contains(&key)
    }
}

#[derive(Debug, Default)]
struct KeyLogInner {
    downs: Vec<Key>,
    ups: Vec<Key>,
    presses: Vec<char>,
    dead: Vec<char>,
}

/// Keyboard delegate that records what it was told.  Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct KeyLog {
    inner: Rc<RefCell<KeyLogInner>>,
}

impl KeyLog {
    pub fn downs(&self) -> Vec<Key> {
        self.inner.borrow().downs.clone()
    }

    pub fn ups(&self) -> Vec<Key> {
        self.inner.borrow().ups.clone()
    }

    pub fn presses(&self) -> Vec<char> {
        self.inner.borrow().presses.clone()
    }

    pub fn dead(&self) -> Vec<char> {
        self.inner.borrow().dead.clone()
    }
}

impl KeyboardDelegate for KeyLog {
    fn on_key_press(&mut self, event: KeyPressEvent) {
        self.inner.borrow_mut().presses.push(event.key_char);
    }

    fn on_key_down(&mut self, event: KeyEvent) {
        self.inner.borrow_mut().downs.push(event.key_code);
    }

    fn on_key_up(&mut self, event: KeyEvent) {
        self.inner.borrow_mut().ups.push(event.key_code);
    }

    fn on_dead_char(&mut self, event: KeyPressEvent) {
        self.inner.borrow_mut().dead.push(event.key_char);
    }
}

// ── Message allocation ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct AllocatorInner {
    calls: HashMap<String, usize>,
    ids: HashMap<String, u32>,
    failing: Option<String>,
}

/// Hands out ids from the registered-message range and counts requests per
/// name.  Clones share the counters.
#[derive(Debug, Clone, Default)]
pub struct CountingAllocator {
    inner: Arc<Mutex<AllocatorInner>>,
}

impl CountingAllocator {
    const FIRST_ID: u32 = 0xC000;

    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator that refuses `name`.
    pub fn failing(name: &str) -> Self {
        let allocator = Self::new();
        allocator.inner.lock().unwrap().failing = Some(name.to_owned());
        allocator
    }

    pub fn calls(&self, name: &str) -> usize {
        self.inner.lock().unwrap().calls.get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.inner.lock().unwrap().calls.values().sum()
    }
}

impl MessageAllocator for CountingAllocator {
    fn register(&self, name: &str) -> Result<u32> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(name.to_owned()).or_default() += 1;

        if inner.failing.as_deref() == Some(name) {
            return Err(Error::Registration {
                name: name.to_owned(),
                code: 5,
            });
        }

        let next = Self::FIRST_ID + inner.ids.len() as u32;
        Ok(*inner.ids.entry(name.to_owned()).or_insert(next))
    }
}

// ── Native window ─────────────────────────────────────────────────────────────

/// Side effects a `FakeNative` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCall {
    Post(Message),
    Invalidate(Rect),
    SetPosition(Rect, PositionFlags),
    TrackMouseLeave,
    Show,
    PaintBackground,
    MinTrackSize(Size),
}

/// `NativeWindow` that records side effects and answers queries from
/// test-controlled settings.
pub struct FakeNative {
    calls: RefCell<Vec<NativeCall>>,
    keys: FakeKeys,
    work_area: Cell<Rect>,
    suggested_rect: Cell<Option<Rect>>,
    tracking_succeeds: Cell<bool>,
    /// Border and caption thickness added by `adjust_for_chrome`.
    chrome: Cell<(i32, i32)>,
    adjust_fails: Cell<bool>,
    posts_fail: Cell<bool>,
    /// Runs inside `set_position`, as the messages SetWindowPos sends would.
    on_set_position: RefCell<Option<Box<dyn Fn()>>>,
}

impl FakeNative {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            calls: RefCell::new(Vec::new()),
            keys: FakeKeys::none(),
            work_area: Cell::new(Rect::new(0, 0, 1920, 1080)),
            suggested_rect: Cell::new(None),
            tracking_succeeds: Cell::new(true),
            chrome: Cell::new((0, 0)),
            adjust_fails: Cell::new(false),
            posts_fail: Cell::new(false),
            on_set_position: RefCell::new(None),
        })
    }

    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.borrow().clone()
    }

    pub fn posted(&self) -> Vec<Message> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                NativeCall::Post(message) => Some(*message),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &NativeCall) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn keys(&self) -> &FakeKeys {
        &self.keys
    }

    pub fn set_work_area(&self, rect: Rect) {
        self.work_area.set(rect);
    }

    pub fn set_suggested_rect(&self, rect: Option<Rect>) {
        self.suggested_rect.set(rect);
    }

    pub fn set_tracking_succeeds(&self, succeeds: bool) {
        self.tracking_succeeds.set(succeeds);
    }

    pub fn set_chrome(&self, border: i32, caption: i32) {
        self.chrome.set((border, caption));
    }

    pub fn fail_adjust(&self) {
        self.adjust_fails.set(true);
    }

    pub fn set_posts_fail(&self, fail: bool) {
        self.posts_fail.set(fail);
    }

    pub fn on_set_position(&self, hook: impl Fn() + 'static) {
        *self.on_set_position.borrow_mut() = Some(Box::new(hook));
    }

    fn record(&self, call: NativeCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl KeyState for FakeNative {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys.is_key_down(key)
    }
}

impl NativeWindow for FakeNative {
    fn post_message(&self, _handle: WindowHandle, message: Message) -> Result<()> {
        if self.posts_fail.get() {
            return Err(Error::Win32 {
                function: "PostMessageW",
                code: 1816,
            });
        }
        self.record(NativeCall::Post(message));
        Ok(())
    }

    fn invalidate(&self, _handle: WindowHandle, rect: Rect) -> Result<()> {
        self.record(NativeCall::Invalidate(rect));
        Ok(())
    }

    fn set_position(&self, _handle: WindowHandle, rect: Rect, flags: PositionFlags) -> Result<()> {
        self.record(NativeCall::SetPosition(rect, flags));
        if let Some(hook) = self.on_set_position.borrow().as_ref() {
            hook();
        }
        Ok(())
    }

    fn track_mouse_leave(&self, _handle: WindowHandle) -> bool {
        self.record(NativeCall::TrackMouseLeave);
        self.tracking_succeeds.get()
    }

    fn show(&self, _handle: WindowHandle) {
        self.record(NativeCall::Show);
    }

    fn monitor_work_area(&self, _handle: WindowHandle) -> Result<Rect> {
        Ok(self.work_area.get())
    }

    fn adjust_for_chrome(&self, client: Rect, _dpi: u32) -> Result<Rect> {
        if self.adjust_fails.get() {
            return Err(Error::Win32 {
                function: "AdjustWindowRectExForDpi",
                code: 87,
            });
        }
        let (border, caption) = self.chrome.get();
        Ok(Rect::from_edges(
            client.origin.x - border,
            client.origin.y - caption,
            client.right() + border,
            client.bottom() + border,
        ))
    }

    fn paint_background(&self, _handle: WindowHandle) -> Result<()> {
        self.record(NativeCall::PaintBackground);
        Ok(())
    }

    fn dpi_suggested_rect(&self, _message: &Message) -> Option<Rect> {
        self.suggested_rect.get()
    }

    fn set_min_track_size(&self, _message: &Message, size: Size) {
        self.record(NativeCall::MinTrackSize(size));
    }
}

// ── Message queue ─────────────────────────────────────────────────────────────

/// One scripted answer from `FakeQueue::peek`.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Deliver(Message),
    /// `peek` reports an empty queue once.
    Idle,
}

/// Exit code returned when a test script runs out.
pub const SCRIPT_EXHAUSTED: i32 = -99;

#[derive(Debug, Default)]
struct SignalState {
    quit: Option<i32>,
}

/// `NativeSignal` that records wakes and holds a posted quit until the
/// scripted queue reaches an idle point.
#[derive(Debug, Default)]
pub struct FakeSignal {
    state: Mutex<SignalState>,
    wakes: AtomicUsize,
}

impl FakeSignal {
    pub fn wakes(&self) -> usize {
        self.wakes.load(Ordering::SeqCst)
    }

    fn take_quit(&self) -> Option<i32> {
        self.state.lock().unwrap().quit.take()
    }
}

impl NativeSignal for FakeSignal {
    fn wake(&self) {
        self.wakes.fetch_add(1, Ordering::SeqCst);
    }

    fn post_quit(&self, exit_code: i32) {
        self.state.lock().unwrap().quit = Some(exit_code);
    }
}

/// Scripted `NativeQueue`.
///
/// Like `WM_QUIT`, a posted quit is only returned once no other message is
/// ready.  When the script is exhausted `peek` returns a quit carrying
/// `SCRIPT_EXHAUSTED` so a loop under test always terminates.
pub struct FakeQueue {
    script: VecDeque<Step>,
    signal: Arc<FakeSignal>,
    dispatched: Rc<RefCell<Vec<Message>>>,
    waits: Vec<Option<Duration>>,
    on_dispatch: Option<Box<dyn FnMut(&Message)>>,
}

impl FakeQueue {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: script.into_iter().collect(),
            signal: Arc::new(FakeSignal::default()),
            dispatched: Rc::default(),
            waits: Vec::new(),
            on_dispatch: None,
        }
    }

    pub fn fake_signal(&self) -> Arc<FakeSignal> {
        Arc::clone(&self.signal)
    }

    /// Run `hook` for every dispatched message, after recording it.
    pub fn on_dispatch(&mut self, hook: impl FnMut(&Message) + 'static) {
        self.on_dispatch = Some(Box::new(hook));
    }

    pub fn dispatched(&self) -> Vec<Message> {
        self.dispatched.borrow().clone()
    }

    pub fn waits(&self) -> &[Option<Duration>] {
        &self.waits
    }

    fn quit(code: i32) -> QueuedMessage {
        thread_message(Message::new(WM_QUIT, code as usize, 0))
    }
}

/// Wrap `message` as if posted to the thread rather than a window.
pub fn thread_message(message: Message) -> QueuedMessage {
    QueuedMessage {
        handle: None,
        message,
        time: 0,
        point: Point::default(),
    }
}

impl NativeQueue for FakeQueue {
    fn peek(&mut self) -> Option<QueuedMessage> {
        match self.script.front().copied() {
            Some(Step::Deliver(message)) => {
                self.script.pop_front();
                Some(thread_message(message))
            }
            Some(Step::Idle) => match self.signal.take_quit() {
                Some(code) => Some(Self::quit(code)),
                None => {
                    self.script.pop_front();
                    None
                }
            },
            None => Some(Self::quit(self.signal.take_quit().unwrap_or(SCRIPT_EXHAUSTED))),
        }
    }

    fn dispatch(&mut self, queued: &QueuedMessage) {
        self.dispatched.borrow_mut().push(queued.message);
        if let Some(hook) = self.on_dispatch.as_mut() {
            hook(&queued.message);
        }
    }

    fn wait(&mut self, timeout: Option<Duration>) {
        self.waits.push(timeout);
    }

    fn signal(&self) -> Arc<dyn NativeSignal> {
        self.signal.clone()
    }
}
