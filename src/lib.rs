// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block there MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! A small layer over Win32 windows: typed message envelopes, named custom
//! messages, keyboard decoding, per-window routing, and a run loop that mixes
//! native input with scheduled work.

pub mod app;
pub mod config;
pub mod custom_message;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod message;
pub mod platform;
pub mod runloop;
pub mod scheduler;
pub mod window;

#[cfg(test)]
mod testing;

pub use app::{App, AppDelegate, LaunchContext};
pub use config::AppConfig;
pub use custom_message::{CustomMessage, MessageRegistry};
pub use error::{Error, Result};
pub use geometry::{Point, Rect, Size};
pub use input::{Key, KeyEvent, KeyPressEvent, KeyboardDelegate, Modifiers};
pub use message::Message;
pub use platform::WindowHandle;
pub use runloop::{AppState, LoopHandle, LoopMode, RunLoop};
pub use scheduler::Scheduler;
pub use window::{InitialPosition, Window, WindowHandler, WindowOptions};
