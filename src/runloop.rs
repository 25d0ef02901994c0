// ── Run loop ──────────────────────────────────────────────────────────────────
//
// One iteration:
//
//   1. drain the native queue (`WM_QUIT` ends the loop with its exit code)
//   2. deliver a pending foreground/background transition
//   3. advance the scheduler until nothing is immediately due
//   4. wait for input, bounded by the next timer (skipped in real-time mode)
//
// The wait in step 4 is the only place the UI thread blocks.

use std::{
    cell::Cell,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use serde::{Deserialize, Serialize};

use crate::{
    message::codes::WM_QUIT,
    platform::{NativeQueue, NativeSignal},
    scheduler::{Scheduler, SendTask},
};

/// Scheduler rounds per iteration before the queue is polled again.
const MAX_SCHEDULER_ROUNDS: usize = 16;

/// How the loop idles between iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Block until input arrives or the next timer is due.
    #[default]
    Wait,
    /// Never block; iterate continuously.
    RealTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLoopState {
    Running,
    /// Quit requested; pending work still runs until `WM_QUIT` is drained.
    Quitting,
    Stopped,
}

/// Whether the application owns the foreground window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Foreground,
    Background,
}

/// Reports foreground/background transitions to the run loop from any thread.
#[derive(Clone)]
pub struct AppStateNotifier {
    tx: flume::Sender<AppState>,
    signal: Arc<dyn NativeSignal>,
}

impl AppStateNotifier {
    /// Never blocks.  Duplicate reports are filtered by the loop.
    pub fn notify(&self, state: AppState) {
        if self.tx.send(state).is_ok() {
            self.signal.wake();
        }
    }
}

/// Cross-thread handle to a running loop.
#[derive(Clone)]
pub struct LoopHandle {
    remote: flume::Sender<SendTask>,
    signal: Arc<dyn NativeSignal>,
    quitting: Arc<AtomicBool>,
}

impl LoopHandle {
    /// Queue `task` to run on the UI thread and wake the loop.  Never runs
    /// `task` inline, even when called from the UI thread.
    pub fn dispatch_main(&self, task: impl FnOnce() + Send + 'static) {
        if self.remote.send(Box::new(task)).is_err() {
            tracing::warn!("dispatch_main() after the run loop was dropped; task discarded");
            return;
        }
        self.signal.wake();
    }

    /// Ask the loop to stop with `exit_code` once it drains the quit message.
    pub fn request_quit(&self, exit_code: i32) {
        tracing::info!(exit_code, "quit requested");
        self.quitting.store(true, Ordering::SeqCst);
        self.signal.post_quit(exit_code);
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }
}

/// The UI thread's event loop.
pub struct RunLoop {
    mode: LoopMode,
    scheduler: Scheduler,
    signal: Arc<dyn NativeSignal>,
    quitting: Arc<AtomicBool>,
    stopped: Cell<bool>,

    app_state: AppState,
    app_state_tx: flume::Sender<AppState>,
    app_state_rx: flume::Receiver<AppState>,
}

impl RunLoop {
    pub fn new(mode: LoopMode, signal: Arc<dyn NativeSignal>) -> Self {
        let (app_state_tx, app_state_rx) = flume::unbounded();
        Self {
            mode,
            scheduler: Scheduler::new(),
            signal,
            quitting: Arc::new(AtomicBool::new(false)),
            stopped: Cell::new(false),
            app_state: AppState::Foreground,
            app_state_tx,
            app_state_rx,
        }
    }

    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    pub fn state(&self) -> RunLoopState {
        if self.stopped.get() {
            RunLoopState::Stopped
        } else if self.quitting.load(Ordering::SeqCst) {
            RunLoopState::Quitting
        } else {
            RunLoopState::Running
        }
    }

    /// Last app state delivered.  Starts as `Foreground`.
    pub fn app_state(&self) -> AppState {
        self.app_state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            remote: self.scheduler.remote(),
            signal: Arc::clone(&self.signal),
            quitting: Arc::clone(&self.quitting),
        }
    }

    pub fn app_state_notifier(&self) -> AppStateNotifier {
        AppStateNotifier {
            tx: self.app_state_tx.clone(),
            signal: Arc::clone(&self.signal),
        }
    }

    /// Run until `WM_QUIT` is drained and return its exit code.
    ///
    /// `on_app_state` receives each foreground/background transition once.
    pub fn run<Q: NativeQueue + ?Sized>(
        &mut self,
        queue: &mut Q,
        mut on_app_state: impl FnMut(AppState),
    ) -> i32 {
        tracing::info!(mode = ?self.mode, "run loop started");

        loop {
            while let Some(queued) = queue.peek() {
                if queued.message.code == WM_QUIT {
                    let exit_code = queued.message.wparam as i32;
                    self.stopped.set(true);
                    tracing::info!(exit_code, "run loop stopped");
                    return exit_code;
                }
                queue.dispatch(&queued);
            }

            for state in self.app_state_rx.try_iter() {
                if state != self.app_state {
                    tracing::debug!(?state, "app state changed");
                    self.app_state = state;
                    on_app_state(state);
                }
            }

            let now = Instant::now();
            let mut next = None;
            for _ in 0..MAX_SCHEDULER_ROUNDS {
                next = self.scheduler.advance(now);
                if !matches!(next, Some(due) if due <= now) {
                    break;
                }
            }

            if self.mode == LoopMode::RealTime {
                continue;
            }
            let timeout = next.map(|due| due.saturating_duration_since(Instant::now()));
            queue.wait(timeout);
        }
    }
}
