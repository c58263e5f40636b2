//! File-based debug logging, gated by `ADBOT_DEBUG=true`.
//!
//! Emits JSON lines to `~/.adbot/adbot-debug.log` with a per-process session
//! id so one resolution pass can be followed across components. Logging is
//! best-effort: I/O errors are swallowed so a full disk never takes the bot
//! down with it.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::Local;
use serde::Serialize;
use uuid::Uuid;

const ENV_DEBUG: &str = "ADBOT_DEBUG";
const LOG_DIR: &str = ".adbot";
const LOG_FILE: &str = "adbot-debug.log";

#[derive(Serialize)]
struct LogEntry<'a> {
    timestamp: String,
    level: &'a str,
    component: &'a str,
    message: &'a str,
    session_id: &'a str,
}

pub struct DebugLogger {
    enabled: bool,
    session_id: String,
    log_path: Option<PathBuf>,
    // Serializes writers within this process; cross-process appends are
    // line-buffered and small enough to stay intact.
    write_lock: Mutex<()>,
}

static LOGGER: OnceLock<Arc<DebugLogger>> = OnceLock::new();

/// Global logger accessor used by all connectivity components.
pub fn get_debug_logger() -> Arc<DebugLogger> {
    LOGGER.get_or_init(|| Arc::new(DebugLogger::from_env())).clone()
}

impl DebugLogger {
    /// Build a logger from the current environment: enabled only when
    /// `ADBOT_DEBUG` is `true` (case-insensitive), writing under the home
    /// directory. The process-wide instance comes from [`get_debug_logger`];
    /// constructing directly is for tooling and tests.
    pub fn from_env() -> Self {
        let enabled = std::env::var(ENV_DEBUG)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let log_path = dirs::home_dir().map(|home| home.join(LOG_DIR).join(LOG_FILE));
        if enabled {
            if let Some(parent) = log_path.as_ref().and_then(|p| p.parent()) {
                let _ = std::fs::create_dir_all(parent);
            }
        }

        Self {
            enabled,
            session_id: Uuid::new_v4().to_string(),
            log_path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn debug(&self, component: &str, message: &str) {
        self.write("DEBUG", component, message);
    }

    pub async fn warn(&self, component: &str, message: &str) {
        self.write("WARN", component, message);
    }

    pub async fn error(&self, component: &str, message: &str) {
        self.write("ERROR", component, message);
    }

    fn write(&self, level: &str, component: &str, message: &str) {
        if !self.enabled {
            return;
        }
        let Some(path) = &self.log_path else {
            return;
        };

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level,
            component,
            message,
            session_id: &self.session_id,
        };
        let Ok(line) = serde_json::to_string(&entry) else {
            return;
        };

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{}", line);
        }
    }
}
