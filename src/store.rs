//! Persistence of the tool's own notion of "current directory".
//!
//! The pointer lives outside the process so that `cd` in one invocation is
//! seen by the next one. Nothing here validates paths; callers do that before
//! saving.

use crate::error::{FsError, Result, at};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Serialized form of the state file: `{"cwd": "<path>"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkingDirectoryState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

/// Loads and saves the persisted working directory.
pub trait WorkingDirectoryStore {
    /// The saved directory, or the fallback when nothing usable is saved.
    ///
    /// Never fails and never checks that the directory still exists.
    fn load(&self) -> PathBuf;

    /// Replace the saved directory with `path`.
    fn save(&mut self, path: &Path) -> Result<()>;
}

/// Store backed by a small JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    file: PathBuf,
    fallback: PathBuf,
}

impl JsonFileStore {
    /// `fallback` is returned by [`load`](WorkingDirectoryStore::load) until a
    /// directory has been saved, normally the process's launch directory.
    pub fn new(file: impl Into<PathBuf>, fallback: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            fallback: fallback.into(),
        }
    }

    fn read_state(&self) -> Option<WorkingDirectoryState> {
        let raw = fs::read_to_string(&self.file).ok()?;
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(
                    file = %self.file.display(),
                    error = %e,
                    "ignoring malformed working directory state"
                );
                None
            }
        }
    }
}

impl WorkingDirectoryStore for JsonFileStore {
    fn load(&self) -> PathBuf {
        self.read_state()
            .and_then(|state| state.cwd)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Fails with [`FsError::NonUtf8Path`] rather than saving a lossy copy
    /// that would name a different directory.
    fn save(&mut self, path: &Path) -> Result<()> {
        let cwd = path
            .to_str()
            .ok_or_else(|| FsError::NonUtf8Path(path.to_path_buf()))?;
        let state = WorkingDirectoryState {
            cwd: Some(cwd.to_string()),
        };
        let body = serde_json::to_string(&state)
            .map_err(|e| FsError::io(&self.file, e.into()))?;
        fs::write(&self.file, body).map_err(at(&self.file))
    }
}

/// In-memory store, mostly for tests.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    cwd: Option<PathBuf>,
    fallback: PathBuf,
}

impl MemoryStore {
    pub fn new(fallback: impl Into<PathBuf>) -> Self {
        Self {
            cwd: None,
            fallback: fallback.into(),
        }
    }
}

impl WorkingDirectoryStore for MemoryStore {
    fn load(&self) -> PathBuf {
        self.cwd.clone().unwrap_or_else(|| self.fallback.clone())
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        self.cwd = Some(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_falls_back_without_state_file() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::new(tmp.path().join("path.json"), "/launch");

        assert_eq!(store.load(), PathBuf::from("/launch"));
    }

    #[test]
    fn test_save_then_load_round_trips_missing_path() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(tmp.path().join("path.json"), "/launch");
        let gone = tmp.path().join("deleted").join("long ago");

        store.save(&gone).unwrap();

        assert_eq!(store.load(), gone);
    }

    #[test]
    fn test_save_writes_cwd_object() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("path.json");
        let mut store = JsonFileStore::new(&file, "/launch");

        store.save(Path::new("/srv/data")).unwrap();
        store.save(Path::new("/srv/other")).unwrap();

        let raw = fs::read_to_string(&file).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"cwd": "/srv/other"}));
    }

    #[test]
    fn test_malformed_or_keyless_state_falls_back() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("path.json");
        let store = JsonFileStore::new(&file, "/launch");

        fs::write(&file, "{not json").unwrap();
        assert_eq!(store.load(), PathBuf::from("/launch"));

        fs::write(&file, r#"{"other": 1}"#).unwrap();
        assert_eq!(store.load(), PathBuf::from("/launch"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_rejected_and_state_kept() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("path.json");
        let mut store = JsonFileStore::new(&file, "/launch");
        store.save(Path::new("/srv/data")).unwrap();

        let bad = tmp.path().join(OsStr::from_bytes(b"caf\xE9"));
        let err = store.save(&bad).unwrap_err();

        assert!(matches!(err, FsError::NonUtf8Path(ref p) if *p == bad));
        assert_eq!(store.load(), PathBuf::from("/srv/data"));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new("/launch");
        assert_eq!(store.load(), PathBuf::from("/launch"));

        store.save(Path::new("/a/b")).unwrap();
        assert_eq!(store.load(), PathBuf::from("/a/b"));
    }
}
