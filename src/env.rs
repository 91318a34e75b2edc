use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

pub const STATE_FILE_VAR: &str = "FILE_COMMANDS_STATE_FILE";
pub const LOG_FILE_VAR: &str = "FILE_COMMANDS_LOG_FILE";
pub const STRICT_EXIT_VAR: &str = "FILE_COMMANDS_STRICT_EXIT";
/// Tracing filter directives, consulted when `RUST_LOG` is unset.
pub const LOG_FILTER_VAR: &str = "FILE_COMMANDS_LOG";

pub const DEFAULT_STATE_FILE: &str = "path.json";
pub const DEFAULT_LOG_FILE: &str = "logs.log";

/// Snapshot of the process environment the tool is configured from.
///
/// The environment contains:
/// - `vars`: environment variables captured at startup.
/// - `launch_dir`: the directory the process was started in. It is the
///   default working directory and the base for the state and log files.
///
/// Note: fields are public so tests can build one without touching the real
/// process environment.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub launch_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state.
    pub fn new() -> Self {
        let vars = stdenv::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        let launch_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, launch_dir }
    }

    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Where the working directory pointer is persisted.
    pub fn state_file(&self) -> PathBuf {
        self.file_setting(STATE_FILE_VAR, DEFAULT_STATE_FILE)
    }

    /// Where command log entries are appended.
    pub fn log_file(&self) -> PathBuf {
        self.file_setting(LOG_FILE_VAR, DEFAULT_LOG_FILE)
    }

    pub fn strict_exit_codes(&self) -> bool {
        self.get_var(STRICT_EXIT_VAR)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false)
    }

    // Relative overrides are taken from the launch directory.
    fn file_setting(&self, key: &str, default: &str) -> PathBuf {
        let name = self
            .get_var(key)
            .filter(|v| !v.is_empty())
            .unwrap_or(default);
        self.launch_dir.join(name)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
