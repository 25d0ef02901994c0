// ── Application lifecycle ─────────────────────────────────────────────────────
//
// `App::run` brings the process up in a fixed order, hands control to the
// application delegate once, then runs the loop until quit:
//
//   built-in message registration → COM → DPI awareness → common controls
//   → app-state watch → `app_did_launch` → run loop
//
// Registration, COM and launch failures abort with an error; the others are
// logged and startup continues.

use std::sync::Arc;

use crate::{
    config::AppConfig,
    custom_message::{BuiltinMessages, MessageRegistry},
    error::Result,
    platform::{NativeQueue, Platform},
    runloop::{AppState, LoopHandle, RunLoop},
    scheduler::Scheduler,
};

/// Application-level hooks.  Everything except launch defaults to a no-op.
pub trait AppDelegate {
    /// Create windows and start work here.  An error ends the process before
    /// the run loop is entered.
    fn app_did_launch(&mut self, context: &LaunchContext<'_>) -> Result<()>;

    fn app_will_move_to_background(&mut self) {}
    fn app_did_move_to_background(&mut self) {}
    fn app_will_move_to_foreground(&mut self) {}
    fn app_did_move_to_foreground(&mut self) {}
}

/// Services available to `AppDelegate::app_did_launch`.
pub struct LaunchContext<'a> {
    config: &'a AppConfig,
    registry: Arc<MessageRegistry>,
    messages: BuiltinMessages,
    handle: LoopHandle,
    scheduler: Scheduler,
}

impl LaunchContext<'_> {
    pub fn config(&self) -> &AppConfig {
        self.config
    }

    /// Resolves application-defined custom messages.
    pub fn registry(&self) -> &Arc<MessageRegistry> {
        &self.registry
    }

    /// Identifiers of the library's own messages.
    pub fn messages(&self) -> BuiltinMessages {
        self.messages
    }

    /// Cross-thread handle to the run loop about to start.
    pub fn loop_handle(&self) -> &LoopHandle {
        &self.handle
    }

    /// UI-thread task queue.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

/// Owns the delegate for the lifetime of the process.
pub struct App<D> {
    delegate: D,
    config: AppConfig,
}

impl<D: AppDelegate> App<D> {
    pub fn new(delegate: D, config: AppConfig) -> Self {
        Self { delegate, config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// Start up on `platform` and run until quit.  Returns the exit code
    /// carried by `WM_QUIT`.
    pub fn run<P: Platform>(&mut self, platform: &P) -> Result<i32> {
        let registry = Arc::new(MessageRegistry::with_allocator(platform.message_allocator()));
        let messages = registry.register_builtins()?;

        platform.initialize_com()?;

        if let Err(e) = platform.enable_dpi_awareness() {
            tracing::error!("enabling per-monitor DPI awareness: {e}");
        }
        if let Err(e) = platform.init_common_controls() {
            tracing::error!("initializing common controls: {e}");
        }

        let mut queue = platform.queue();
        let mut run_loop = RunLoop::new(self.config.loop_mode, queue.signal());

        if let Err(e) = platform.watch_app_state(run_loop.app_state_notifier()) {
            tracing::error!("watching foreground/background changes: {e}");
        }

        let context = LaunchContext {
            config: &self.config,
            registry,
            messages,
            handle: run_loop.handle(),
            scheduler: run_loop.scheduler().clone(),
        };
        self.delegate.app_did_launch(&context)?;
        tracing::info!("application launched");

        let delegate = &mut self.delegate;
        let exit_code = run_loop.run(&mut queue, |state| match state {
            AppState::Background => {
                delegate.app_will_move_to_background();
                delegate.app_did_move_to_background();
            }
            AppState::Foreground => {
                delegate.app_will_move_to_foreground();
                delegate.app_did_move_to_foreground();
            }
        });

        tracing::info!(exit_code, "application exiting");
        Ok(exit_code)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
