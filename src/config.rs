// ── Configuration ─────────────────────────────────────────────────────────────
//
// Reads `%LOCALAPPDATA%\MinWin32\config.json`.  Every field is optional on
// disk; a missing file is the all-defaults configuration.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::Result, runloop::LoopMode};

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Root of the JSON configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `"wait"` (default) or `"real_time"`.
    pub loop_mode: LoopMode,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set, e.g. `"info"` or
    /// `"minwin32=debug"`.
    pub level: String,
    /// Directory for the rolling log file.  `None` means the per-app default
    /// under `%LOCALAPPDATA%`.
    pub directory: Option<PathBuf>,
    /// Log file name prefix; the date is appended.
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            directory: None,
            file_prefix: "minwin32".to_owned(),
        }
    }
}

// ── Paths ─────────────────────────────────────────────────────────────────────

const VENDOR_DIR: &str = "MinWin32";
const CONFIG_FILE: &str = "config.json";

/// `%LOCALAPPDATA%\MinWin32`, or `None` if `LOCALAPPDATA` is not set.
pub fn data_dir() -> Option<PathBuf> {
    let local = std::env::var_os("LOCALAPPDATA")?;
    Some(PathBuf::from(local).join(VENDOR_DIR))
}

/// `%LOCALAPPDATA%\MinWin32\config.json`.
pub fn config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// `%LOCALAPPDATA%\MinWin32\<app>\logs`.
pub fn default_log_dir(app_name: &str) -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(app_name).join("logs"))
}

// ── Load ──────────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Parse the file at `path`.  A missing file yields the defaults; an
    /// unreadable or malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read(path) {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load from the standard location.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Like `load`, but a bad file is logged and replaced by the defaults.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::error!("loading configuration: {e}; using defaults");
            Self::default()
        })
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("minwin32-config-{}-{name}", std::process::id()))
            .join(CONFIG_FILE)
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let config: AppConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.loop_mode, LoopMode::Wait);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn partial_log_section_keeps_other_defaults() {
        let json = r#"{ "loop_mode": "real_time", "log": { "level": "debug" } }"#;
        let config: AppConfig = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.loop_mode, LoopMode::RealTime);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.file_prefix, "minwin32");
        assert_eq!(config.log.directory, None);
    }

    #[test]
    fn unknown_loop_mode_is_rejected() {
        assert!(serde_json::from_str::<AppConfig>(r#"{ "loop_mode": "spin" }"#).is_err());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = scratch("missing");
        let _ = fs::remove_file(&path);
        assert_eq!(AppConfig::load_from(&path).expect("load"), AppConfig::default());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let path = scratch("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn saved_file_loads_back() {
        let path = scratch("saved");
        let config = AppConfig {
            loop_mode: LoopMode::RealTime,
            log: LogConfig {
                level: "trace".to_owned(),
                directory: Some(PathBuf::from("logs")),
                file_prefix: "sample".to_owned(),
            },
        };

        config.save_to(&path).expect("save");
        assert_eq!(AppConfig::load_from(&path).expect("load"), config);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
