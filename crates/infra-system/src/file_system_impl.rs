// Filesystem probe implementation over std::fs

use std::fs;
use std::path::{Path, PathBuf};

use symsync_core::port::file_system::FileNameFilter;
use symsync_core::port::FileSystemProbe;
use tracing::debug;

/// Filesystem probe backed by the local filesystem
#[derive(Debug, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystemProbe for OsFileSystem {
    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn files_in_directory(&self, directory: &Path, filter: FileNameFilter<'_>) -> Vec<PathBuf> {
        // A missing path, or a path naming a file, yields an empty
        // listing rather than an error
        let Ok(entries) = fs::read_dir(directory) else {
            debug!(directory = %directory.display(), "Directory not listable");
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_type()
                    .map(|file_type| file_type.is_file())
                    .unwrap_or(false)
            })
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(filter)
                    .unwrap_or(false)
            })
            .map(|entry| entry.path())
            .collect();
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_directory_exists_for_real_directory() {
        let dir = tempfile::tempdir().unwrap();
        let probe = OsFileSystem::new();

        assert!(probe.directory_exists(dir.path()));
        assert!(!probe.directory_exists(&dir.path().join("missing")));
    }

    #[test]
    fn test_directory_exists_false_for_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("app.pdb");
        File::create(&file_path).unwrap();

        let probe = OsFileSystem::new();
        assert!(!probe.directory_exists(&file_path));
    }

    #[test]
    fn test_listing_returns_files_matching_filter() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("app.pdb")).unwrap();
        File::create(dir.path().join("tool.pdb")).unwrap();
        File::create(dir.path().join("readme.txt")).unwrap();

        let probe = OsFileSystem::new();
        let files = probe.files_in_directory(dir.path(), &|name| name.ends_with(".pdb"));

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "pdb"));
    }

    #[test]
    fn test_listing_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested.pdb")).unwrap();
        File::create(dir.path().join("app.pdb")).unwrap();

        let probe = OsFileSystem::new();
        let files = probe.files_in_directory(dir.path(), &|name| name.ends_with(".pdb"));

        assert_eq!(files, vec![dir.path().join("app.pdb")]);
    }

    #[test]
    fn test_listing_of_non_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("app.exe");
        File::create(&file_path).unwrap();

        let probe = OsFileSystem::new();
        let files = probe.files_in_directory(&file_path, &|_| true);

        assert!(files.is_empty());
    }
}
