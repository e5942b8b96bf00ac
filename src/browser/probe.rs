//! Filesystem probes used by the cookie path resolver.
//!
//! Probes never fail: a path that cannot be inspected is reported as
//! missing, and a directory that cannot be read lists as empty.

use std::fs;
use std::path::Path;

/// Read-only filesystem capability consumed by [`CookiePathResolver`].
///
/// [`CookiePathResolver`]: super::CookiePathResolver
pub trait FsProbe {
    /// True when something exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;

    /// True when `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Names of the immediate entries of `path`, in listing order.
    fn list_dir(&self, path: &Path) -> Vec<String>;
}

/// [`FsProbe`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl FsProbe for StdFs {
    fn file_exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path)
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    fn list_dir(&self, path: &Path) -> Vec<String> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Cannot list {:?}: {}", path, e);
                return Vec::new();
            }
        };
        entries
            .flatten()
            .filter_map(|entry| match entry.file_name().into_string() {
                Ok(name) => Some(name),
                Err(name) => {
                    log::trace!("Skipping non UTF-8 entry {:?} in {:?}", name, path);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{FsProbe, StdFs};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn std_fs_reports_files_and_directories() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("Cookies");
        fs::write(&file, b"").expect("write file");

        assert!(StdFs.file_exists(&file));
        assert!(StdFs.file_exists(temp.path()));
        assert!(StdFs.is_dir(temp.path()));
        assert!(!StdFs.is_dir(&file));
    }

    #[test]
    fn std_fs_swallows_missing_paths() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("missing");

        assert!(!StdFs.file_exists(&missing));
        assert!(!StdFs.is_dir(&missing));
        assert!(StdFs.list_dir(&missing).is_empty());
    }

    #[test]
    fn std_fs_lists_entry_names() {
        let temp = tempdir().expect("tempdir");
        fs::create_dir(temp.path().join("Profile 1")).expect("create dir");
        fs::write(temp.path().join("Local State"), b"{}").expect("write file");

        let mut names = StdFs.list_dir(temp.path());
        names.sort();
        assert_eq!(names, vec!["Local State".to_string(), "Profile 1".to_string()]);
    }
}
