//! Filesystem operations behind each command.
//!
//! Every requested path is joined onto the persisted working directory and
//! passed through [`validate`] before anything touches the disk.

use crate::error::{FsError, Result, at};
use crate::store::WorkingDirectoryStore;
use crate::validate::validate;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Entries whose name starts with this are hidden from `list` by default.
pub const HIDDEN_MARKER: char = '.';

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// File name only, lossily decoded.
    pub name: String,
    pub is_dir: bool,
}

/// Result of a copy or move: where things came from and where they landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub source: PathBuf,
    /// Final location, inside the requested destination when that is a directory.
    pub destination: PathBuf,
    pub is_dir: bool,
}

/// Join `requested` onto `cwd`, dropping interior `.` components.
///
/// An absolute `requested` replaces `cwd`. `..` is kept as is, since it
/// cannot be resolved lexically in the presence of symlinks.
pub fn effective_path(cwd: &Path, requested: &str) -> PathBuf {
    cwd.join(requested).components().collect()
}

/// The command implementations, working on top of a [`WorkingDirectoryStore`].
pub struct FileOps<S> {
    store: S,
}

impl<S: WorkingDirectoryStore> FileOps<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The backing store, e.g. to inspect what `cd` saved.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Effective path of `requested` against the saved working directory.
    pub fn resolve(&self, requested: &str) -> PathBuf {
        effective_path(&self.store.load(), requested)
    }

    /// The saved working directory, or the store's fallback. Not validated.
    pub fn working_directory(&self) -> PathBuf {
        self.store.load()
    }

    /// Immediate children of `path`, sorted by name.
    pub fn list(&self, path: &str, show_hidden: bool) -> Result<Vec<ListEntry>> {
        let full = self.resolve(path);
        validate(&full)?;

        let mut entries = Vec::new();
        for entry in fs::read_dir(&full).map_err(at(&full))? {
            let entry = entry.map_err(at(&full))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !show_hidden && name.starts_with(HIDDEN_MARKER) {
                continue;
            }
            entries.push(ListEntry {
                name,
                is_dir: entry.path().is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Persist `path` as the new working directory and return it.
    ///
    /// On failure the saved directory is left untouched.
    pub fn change_directory(&mut self, path: &str) -> Result<PathBuf> {
        let cwd = self.store.load();
        let full = effective_path(&cwd, path);
        tracing::debug!(
            cwd = %cwd.display(),
            requested = path,
            full = %full.display(),
            "change directory"
        );

        validate(&full)?;
        if !full.is_dir() {
            return Err(FsError::io(
                &full,
                io::Error::from(io::ErrorKind::NotADirectory),
            ));
        }

        self.store.save(&full)?;
        Ok(full)
    }

    /// Create `name` and any missing components. Existing directories are fine.
    ///
    /// The parent of the target is validated, not the target itself.
    pub fn create_directory(&self, name: &str) -> Result<PathBuf> {
        let full = self.resolve(name);
        validate(parent_of(&full))?;

        fs::create_dir_all(&full).map_err(at(&full))?;
        Ok(full)
    }

    /// Remove an empty directory. A non-empty one fails with
    /// [`FsError::DirectoryNotEmpty`] and is left alone.
    pub fn remove_empty_directory(&self, path: &str) -> Result<PathBuf> {
        let full = self.resolve(path);
        validate(&full)?;

        fs::remove_dir(&full).map_err(at(&full))?;
        Ok(full)
    }

    /// Remove a directory and everything below it.
    pub fn remove_directory_recursive(&self, path: &str) -> Result<PathBuf> {
        let full = self.resolve(path);
        validate(&full)?;

        fs::remove_dir_all(&full).map_err(at(&full))?;
        Ok(full)
    }

    /// Remove a single file. Directories are refused by the OS.
    pub fn remove_file(&self, path: &str) -> Result<PathBuf> {
        let full = self.resolve(path);
        validate(&full)?;

        fs::remove_file(&full).map_err(at(&full))?;
        Ok(full)
    }

    /// Copy a file or a whole directory tree.
    ///
    /// Both ends must exist. When `destination` is a directory the source is
    /// placed inside it; a directory tree is never merged into an existing one.
    /// Copied files keep the source's access and modification times.
    pub fn copy(&self, source: &str, destination: &str) -> Result<Transfer> {
        let (src, dst) = self.resolve_pair(source, destination)?;
        let target = landing_path(&src, &dst)?;
        let is_dir = src.is_dir();

        if is_dir {
            if target.exists() {
                return Err(FsError::DestinationExists(target));
            }
            let inside_source = match (fs::canonicalize(&src), fs::canonicalize(&dst)) {
                (Ok(s), Ok(d)) => d.starts_with(s),
                _ => false,
            };
            if inside_source {
                return Err(FsError::io(
                    &target,
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "cannot copy a directory into itself",
                    ),
                ));
            }
            copy_tree(&src, &target)?;
        } else {
            if same_file(&src, &target) {
                return Err(FsError::DestinationExists(target));
            }
            copy_file(&src, &target)?;
        }

        Ok(Transfer {
            source: src,
            destination: target,
            is_dir,
        })
    }

    /// Move or rename a file or directory.
    ///
    /// Same placement rule as [`copy`](Self::copy). An existing file
    /// destination is replaced; cross-device moves are not attempted.
    pub fn move_entry(&self, source: &str, destination: &str) -> Result<Transfer> {
        let (src, dst) = self.resolve_pair(source, destination)?;
        let target = landing_path(&src, &dst)?;
        let is_dir = src.is_dir();

        if dst.is_dir() && target.exists() {
            return Err(FsError::DestinationExists(target));
        }

        fs::rename(&src, &target).map_err(at(&src))?;
        Ok(Transfer {
            source: src,
            destination: target,
            is_dir,
        })
    }

    /// Every non-directory below `path` whose name contains `pattern` literally.
    ///
    /// The walk is depth-first with siblings sorted by name, so the order only
    /// depends on the tree. Symlinked directories are not entered. Entries
    /// that cannot be read are skipped.
    pub fn find(&self, path: &str, pattern: &str) -> Result<Vec<PathBuf>> {
        let base = self.resolve(path);
        validate(&base)?;

        let mut matches = Vec::new();
        for entry in WalkDir::new(&base).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.path().is_dir() {
                continue;
            }
            if entry.file_name().to_string_lossy().contains(pattern) {
                matches.push(entry.into_path());
            }
        }
        Ok(matches)
    }

    /// Full contents of a text file.
    pub fn cat(&self, path: &str) -> Result<String> {
        let full = self.resolve(path);
        validate(&full)?;

        fs::read_to_string(&full).map_err(at(&full))
    }

    fn resolve_pair(&self, source: &str, destination: &str) -> Result<(PathBuf, PathBuf)> {
        let cwd = self.store.load();
        let src = effective_path(&cwd, source);
        let dst = effective_path(&cwd, destination);

        validate(&src)?;
        validate(&dst)?;
        Ok((src, dst))
    }
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => path,
    }
}

/// Where `src` ends up when copied or moved to `dst`.
fn landing_path(src: &Path, dst: &Path) -> Result<PathBuf> {
    if !dst.is_dir() {
        return Ok(dst.to_path_buf());
    }
    match src.file_name() {
        Some(name) => Ok(dst.join(name)),
        None => Err(FsError::io(
            src,
            io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
        )),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `fs::copy` plus the source's timestamps.
fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest).map_err(at(dest))?;

    let meta = fs::metadata(src).map_err(at(src))?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    // Read-only handle: the copy may have inherited a read-only mode.
    if let Err(e) = File::open(dest).and_then(|f| f.set_times(times)) {
        tracing::warn!(path = %dest.display(), error = %e, "timestamps not preserved");
    }
    Ok(())
}

fn copy_tree(src: &Path, target: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            FsError::io(&path, e.into())
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(at(&dest))?;
        } else {
            copy_file(entry.path(), &dest)?;
        }
    }
    Ok(())
}
