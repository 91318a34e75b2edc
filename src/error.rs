use crate::command::ExitCode;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FsError>;

/// Every way a command can fail.
///
/// Lower layers return these; only the [`Interpreter`](crate::Interpreter)
/// turns them into printed messages and log entries.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("the path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),
    #[error("the path '{}' is not accessible", .0.display())]
    PathNotAccessible(PathBuf),
    #[error("directory '{}' is not empty", .0.display())]
    DirectoryNotEmpty(PathBuf),
    #[error("destination '{}' already exists", .0.display())]
    DestinationExists(PathBuf),
    #[error("the path '{}' is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("Invalid command")]
    InvalidCommand(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("{path}: {source}", path = .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

impl FsError {
    /// Classify an I/O error raised while operating on `path`.
    pub fn io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => FsError::PathNotFound(path.to_path_buf()),
            io::ErrorKind::DirectoryNotEmpty => FsError::DirectoryNotEmpty(path.to_path_buf()),
            _ => FsError::Filesystem {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Process exit code used when strict exit codes are enabled.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            FsError::PathNotFound(_) => 2,
            FsError::PathNotAccessible(_) => 3,
            FsError::DirectoryNotEmpty(_) => 4,
            FsError::DestinationExists(_) => 5,
            FsError::InvalidCommand(_) | FsError::MissingArgument(_) => 64,
            FsError::NonUtf8Path(_) | FsError::Filesystem { .. } | FsError::Output(_) => 1,
        }
    }
}

/// Shorthand for `map_err(|e| FsError::io(path, e))`.
pub(crate) fn at(path: &Path) -> impl FnOnce(io::Error) -> FsError + '_ {
    move |e| FsError::io(path, e)
}
