use crate::error::{FsError, Result};
use std::fs;
use std::path::Path;

/// Check that `path` exists and can be read.
///
/// Directories must be listable and regular files must open for reading.
/// Special files (FIFOs, sockets, devices) are only checked for existence,
/// since opening them may block.
pub fn validate(path: &Path) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "stat failed");
            return Err(FsError::PathNotFound(path.to_path_buf()));
        }
    };

    let readable = if metadata.is_dir() {
        fs::read_dir(path).map(drop)
    } else if metadata.is_file() {
        fs::File::open(path).map(drop)
    } else {
        Ok(())
    };

    readable.map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "read check failed");
        FsError::PathNotAccessible(path.to_path_buf())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn test_missing_path_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");

        let err = validate(&missing).unwrap_err();
        assert!(matches!(err, FsError::PathNotFound(ref p) if *p == missing));
    }

    #[test]
    fn test_existing_file_and_dir_are_valid() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "hi").unwrap();

        assert!(validate(tmp.path()).is_ok());
        assert!(validate(&file).is_ok());
    }

    #[test]
    fn test_unreadable_file_is_not_accessible() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("secret.txt");
        fs::write(&file, "hidden").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read anything, nothing to assert then.
        if fs::File::open(&file).is_ok() {
            return;
        }

        let err = validate(&file).unwrap_err();
        assert!(matches!(err, FsError::PathNotAccessible(_)));

        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn test_unlistable_dir_is_not_accessible() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("locked");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::read_dir(&dir).is_ok() {
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let err = validate(&dir).unwrap_err();
        assert!(matches!(err, FsError::PathNotAccessible(_)));

        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
