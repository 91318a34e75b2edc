use crate::builtin::handler_for;
use crate::command::{Command, ExitCode};
use crate::command_log::{FileLog, LogEntry, LogSink};
use crate::env::Environment;
use crate::error::FsError;
use crate::ops::FileOps;
use crate::store::{JsonFileStore, WorkingDirectoryStore};
use std::io::Write;

/// Terminal state of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completed {
    Success,
    Error { message: String, code: ExitCode },
}

/// Runs commands against [`FileOps`] and records every outcome.
///
/// This is the only place failures are caught: whatever a command returns is
/// printed, written to the command log, and turned into a [`Completed`].
///
/// Example
/// ```
/// use file_commands::{Command, Completed, FileOps, Interpreter, MemoryLog, MemoryStore};
/// let mut sh = Interpreter::new(FileOps::new(MemoryStore::new("/")), MemoryLog::default());
/// let mut out = Vec::new();
/// let done = sh.run(&Command::new("pwd"), &mut out);
/// assert_eq!(done, Completed::Success);
/// assert_eq!(out, b"/\n");
/// ```
pub struct Interpreter<S, L> {
    ops: FileOps<S>,
    log: L,
    strict_exit: bool,
}

impl Interpreter<JsonFileStore, FileLog> {
    /// Interpreter backed by the state and log files named by `env`.
    pub fn from_environment(env: &Environment) -> Self {
        let store = JsonFileStore::new(env.state_file(), env.launch_dir.clone());
        Self::new(FileOps::new(store), FileLog::new(env.log_file()))
            .with_strict_exit(env.strict_exit_codes())
    }
}

impl<S: WorkingDirectoryStore, L: LogSink> Interpreter<S, L> {
    pub fn new(ops: FileOps<S>, log: L) -> Self {
        Self {
            ops,
            log,
            strict_exit: false,
        }
    }

    /// Map each failure kind to its own exit code instead of always 0.
    pub fn with_strict_exit(mut self, strict: bool) -> Self {
        self.strict_exit = strict;
        self
    }

    pub fn ops(&self) -> &FileOps<S> {
        &self.ops
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Run one command to completion. Never fails; see [`Completed`].
    pub fn run(&mut self, command: &Command, stdout: &mut dyn Write) -> Completed {
        let _span = tracing::debug_span!("dispatch", command = %command.name).entered();

        let outcome = match handler_for::<S>(&command.kind) {
            Some(handler) => handler(command, &mut self.ops, &self.log, stdout),
            None => Err(FsError::InvalidCommand(command.name.clone())),
        };

        let completed = match outcome {
            Ok(()) => Completed::Success,
            Err(err) => {
                let shown = match &err {
                    FsError::InvalidCommand(_) => "Invalid Command!".to_string(),
                    other => format!("Error: {}", other),
                };
                if let Err(e) = writeln!(stdout, "{}", shown) {
                    tracing::error!(error = %e, "failed to report command failure");
                }
                Completed::Error {
                    message: err.to_string(),
                    code: err.exit_code(),
                }
            }
        };

        let entry = match &completed {
            Completed::Success => LogEntry::success(&command.name),
            Completed::Error { message, .. } => LogEntry::error(&command.name, message),
        };
        if let Err(e) = self.log.append(&entry) {
            tracing::error!(error = %e, "failed to write command log");
        }

        tracing::debug!(?completed, "command finished");
        completed
    }

    /// Process exit code for `completed` under the configured policy.
    pub fn exit_code(&self, completed: &Completed) -> ExitCode {
        match completed {
            Completed::Error { code, .. } if self.strict_exit => *code,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_log::MemoryLog;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn interpreter_in(dir: &Path) -> Interpreter<MemoryStore, MemoryLog> {
        Interpreter::new(FileOps::new(MemoryStore::new(dir)), MemoryLog::default())
    }

    fn run(sh: &mut Interpreter<MemoryStore, MemoryLog>, cmd: Command) -> (Completed, String) {
        let mut out = Vec::new();
        let done = sh.run(&cmd, &mut out);
        (done, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_unknown_command_is_reported_and_logged() {
        let tmp = TempDir::new().unwrap();
        let mut sh = interpreter_in(tmp.path());

        let (done, out) = run(&mut sh, Command::new("zzz"));

        assert_eq!(out, "Invalid Command!\n");
        assert_eq!(
            done,
            Completed::Error {
                message: "Invalid command".into(),
                code: 64
            }
        );
        assert_eq!(sh.log().lines.len(), 1);
        assert!(sh.log().lines[0].ends_with(" - Command: zzz, Status: Error, Error: Invalid command"));
        assert_eq!(sh.exit_code(&done), 0);
    }

    #[test]
    fn test_failures_are_printed_and_logged() {
        let tmp = TempDir::new().unwrap();
        let mut sh = interpreter_in(tmp.path()).with_strict_exit(true);
        let missing = tmp.path().join("ghost");

        let (done, out) = run(&mut sh, Command::new("ls").with_path("ghost"));

        let message = format!("the path '{}' does not exist", missing.display());
        assert_eq!(out, format!("Error: {}\n", message));
        assert_eq!(
            done,
            Completed::Error {
                message: message.clone(),
                code: 2
            }
        );
        assert_eq!(sh.exit_code(&done), 2);
        assert!(sh.log().lines[0].ends_with(&format!(
            " - Command: ls, Status: Error, Error: {}",
            message
        )));
    }

    #[test]
    fn test_success_is_logged_once_per_command() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        let mut sh = interpreter_in(tmp.path());

        let (done, _) = run(&mut sh, Command::new("cd").with_path("sub"));
        assert_eq!(done, Completed::Success);
        let (_, out) = run(&mut sh, Command::new("pwd"));
        assert_eq!(out, format!("{}\n", tmp.path().join("sub").display()));

        let statuses: Vec<bool> = sh
            .log()
            .lines
            .iter()
            .map(|l| l.ends_with("Status: Success"))
            .collect();
        assert_eq!(statuses, vec![true, true]);
        assert_eq!(sh.ops().working_directory(), tmp.path().join("sub"));
        assert!(sh.log().lines[0].contains("Command: cd,"));
        assert!(sh.log().lines[1].contains("Command: pwd,"));
    }

    #[test]
    fn test_logs_command_sees_earlier_entries_only() {
        let tmp = TempDir::new().unwrap();
        let mut sh = interpreter_in(tmp.path());

        let (_, out) = run(&mut sh, Command::new("logs"));
        assert_eq!(out, "No logs available.\n");

        let (_, out) = run(&mut sh, Command::new("logs"));
        assert!(out.ends_with(" - Command: logs, Status: Success\n"));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_remove_then_list_fails_with_not_found() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("somedir/nested")).unwrap();
        fs::write(tmp.path().join("somedir/nested/f.txt"), "x").unwrap();
        let mut sh = interpreter_in(tmp.path()).with_strict_exit(true);

        let (done, _) = run(&mut sh, Command::new("rm").with_recursive("somedir"));
        assert_eq!(done, Completed::Success);

        let (done, out) = run(&mut sh, Command::new("ls").with_path("somedir"));
        assert!(out.starts_with("Error: the path"));
        assert_eq!(sh.exit_code(&done), 2);
    }
}
