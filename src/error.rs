// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations return `error::Result<T>`.  Platform calls that are
// not essential to correctness log their failure and carry on; only the errors
// below ever reach a caller.

use thiserror::Error;

/// Every error that minwin32 can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// A Win32 API call returned a failure code.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A custom message name could not be turned into a message identifier.
    #[error("registering window message {name:?} failed (error {code:#010x})")]
    Registration { name: String, code: u32 },

    /// A standard I/O error (config file, log directory, …).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file exists but is not valid JSON for `AppConfig`.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The global tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// `AppDelegate::app_did_launch` failed; the run loop is never entered.
    #[error("application launch failed: {0}")]
    Launch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap any application error raised while launching.
    pub fn launch(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Launch(e.into())
    }
}

// Convert a windows-crate error (HRESULT) directly so that `?` can be used on
// `windows::core::Result<T>` throughout the Win32 backend.
#[cfg(windows)]
impl From<windows::core::Error> for Error {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win32_error_display_is_hex() {
        let e = Error::Win32 {
            function: "CreateWindowExW",
            code: 5,
        };
        assert_eq!(e.to_string(), "CreateWindowExW failed (error 0x00000005)");
    }

    #[test]
    fn launch_error_keeps_source() {
        let e = Error::launch("no main window");
        assert!(std::error::Error::source(&e).is_some());
        assert_eq!(e.to_string(), "application launch failed: no main window");
    }
}
