//! File manipulation commands over a persisted working directory.
//!
//! Every invocation of the tool runs one command (`ls`, `cd`, `mkdir`, `rmdir`,
//! `rm`, `cp`, `mv`, `find`, `cat`, `logs`, `pwd`) relative to a "current
//! directory" that is saved to a small JSON file between runs, independent of
//! the OS process's working directory. Each outcome is appended to a command
//! log.
//!
//! The main entry point is [`Interpreter`], which dispatches a parsed
//! [`Command`] to [`FileOps`] and is the single place where failures are
//! caught, printed and logged. The store and log sink are traits so that tests
//! can swap in the in-memory [`MemoryStore`] and [`MemoryLog`].

mod builtin;
pub mod command;
pub mod command_log;
pub mod env;
pub mod error;
mod interpreter;
pub mod ops;
pub mod store;
pub mod validate;

pub use command::{Command, CommandKind, ExitCode, InvalidArgs, Invocation, parse_args};
pub use command_log::{FileLog, LogEntry, LogSink, MemoryLog, Status};
pub use env::Environment;
pub use error::{FsError, Result};
pub use interpreter::{Completed, Interpreter};
pub use ops::{FileOps, ListEntry, Transfer};
pub use store::{JsonFileStore, MemoryStore, WorkingDirectoryStore};
pub use validate::validate;
