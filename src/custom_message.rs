// ── Custom messages ───────────────────────────────────────────────────────────
//
// Named window messages, resolved to numeric identifiers once per name.  The
// registry is an ordinary value: the app creates one at startup and hands it
// (or the `BuiltinMessages` it resolves) to whoever needs it.

use std::{collections::HashMap, sync::Mutex};

use crate::{
    error::Result,
    geometry::Rect,
    message::{codes::WM_USER, make_long, Message},
};

/// Turns a message name into a system-wide identifier
/// (`RegisterWindowMessageW`).
pub trait MessageAllocator: Send + Sync {
    fn register(&self, name: &str) -> Result<u32>;
}

/// Process-wide name → identifier cache.
///
/// Each name is passed to the allocator at most once for the lifetime of the
/// registry, even under concurrent first use.
pub struct MessageRegistry {
    allocator: Box<dyn MessageAllocator>,
    resolved: Mutex<HashMap<String, u32>>,
}

impl MessageRegistry {
    pub fn new(allocator: impl MessageAllocator + 'static) -> Self {
        Self::with_allocator(Box::new(allocator))
    }

    pub fn with_allocator(allocator: Box<dyn MessageAllocator>) -> Self {
        Self {
            allocator,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// Identifier for `name`, registering it on first use.
    pub fn resolve(&self, name: &str) -> Result<u32> {
        debug_assert!(!name.is_empty(), "custom message names must not be empty");

        // Held across the allocator call so two first uses of one name cannot
        // both register it.
        let mut resolved = self.lock();
        if let Some(&id) = resolved.get(name) {
            return Ok(id);
        }

        let id = self.allocator.register(name)?;
        tracing::debug!(name, id, "registered window message");
        resolved.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Identifier for a `CustomMessage` type.  Private messages are cached
    /// under their name without touching the allocator.
    pub fn resolve_message<M: CustomMessage>(&self) -> Result<u32> {
        match M::PRIVATE_ID {
            Some(id) => Ok(*self.lock().entry(M::NAME.to_owned()).or_insert(id)),
            None => self.resolve(M::NAME),
        }
    }

    /// Cached identifier for `name`, without registering.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.lock().get(name).copied()
    }

    /// Resolve every message the library itself posts.
    pub fn register_builtins(&self) -> Result<BuiltinMessages> {
        Ok(BuiltinMessages {
            layout: self.resolve_message::<LayoutMessage>()?,
            invalidate: self.resolve_message::<InvalidateMessage>()?,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, u32>> {
        // The map is only ever inserted into; a panic elsewhere cannot leave it
        // half-written.
        self.resolved
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// ── Message types ─────────────────────────────────────────────────────────────

/// An application-defined message.
pub trait CustomMessage {
    /// Name other processes use to find the same identifier.
    const NAME: &'static str;

    /// Fixed identifier in `WM_USER..=0x7FFF` for messages that never leave
    /// the process.  `None` means the name is registered with the system.
    const PRIVATE_ID: Option<u32> = None;

    fn wparam(&self) -> usize {
        0
    }

    fn lparam(&self) -> isize {
        0
    }

    /// The envelope to post, given this message's resolved identifier.
    fn envelope(&self, code: u32) -> Message {
        Message::new(code, self.wparam(), self.lparam())
    }
}

/// Identifiers of the messages the library posts to its own windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinMessages {
    pub layout: u32,
    pub invalidate: u32,
}

impl BuiltinMessages {
    /// Identifiers that cannot collide with system messages; for windows that
    /// are driven without a registry.
    pub const PRIVATE: BuiltinMessages = BuiltinMessages {
        layout: WM_USER + 0x001,
        invalidate: WM_USER + 0x002,
    };
}

/// Asks a window to run its layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutMessage;

impl CustomMessage for LayoutMessage {
    const NAME: &'static str = "MW32_LAYOUT";
}

/// Asks a window to invalidate a region.
///
/// `wparam` packs `(x, y)` and `lparam` packs `(width, height)`, each as
/// 16-bit signed halves, low half first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidateMessage {
    pub rect: Rect,
}

impl InvalidateMessage {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn decode(message: &Message) -> Self {
        Self {
            rect: Rect::new(
                message.wparam_lo() as i16 as i32,
                message.wparam_hi() as i16 as i32,
                message.lparam_lo() as i16 as i32,
                message.lparam_hi() as i16 as i32,
            ),
        }
    }
}

impl CustomMessage for InvalidateMessage {
    const NAME: &'static str = "MW32_INVALIDATE";

    fn wparam(&self) -> usize {
        make_long(self.rect.origin.x as u16, self.rect.origin.y as u16) as usize
    }

    fn lparam(&self) -> isize {
        make_long(self.rect.size.width as u16, self.rect.size.height as u16)
    }
}
