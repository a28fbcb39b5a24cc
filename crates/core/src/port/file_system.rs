// Filesystem Probe Port

use std::path::{Path, PathBuf};

/// File-name predicate used when listing a directory
pub type FileNameFilter<'a> = &'a dyn Fn(&str) -> bool;

/// Read-only filesystem checks needed by the symbol path service
pub trait FileSystemProbe: Send + Sync {
    /// Whether `path` names an existing directory
    fn directory_exists(&self, path: &Path) -> bool;

    /// Files in `directory` whose name matches `filter`.
    ///
    /// Returns an empty sequence, never an error, when the directory
    /// does not exist or is not a directory.
    fn files_in_directory(&self, directory: &Path, filter: FileNameFilter<'_>) -> Vec<PathBuf>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory FileSystemProbe for testing
    #[derive(Default)]
    pub struct InMemoryFileSystem {
        directories: Mutex<HashMap<PathBuf, Vec<String>>>,
    }

    impl InMemoryFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register an existing directory with the given file names
        pub fn add_directory(&self, path: impl Into<PathBuf>, files: &[&str]) {
            self.directories
                .lock()
                .unwrap()
                .insert(path.into(), files.iter().map(|f| f.to_string()).collect());
        }

        pub fn with_directories(paths: &[&str]) -> Self {
            let fs = Self::default();
            for path in paths {
                fs.add_directory(*path, &[]);
            }
            fs
        }
    }

    impl FileSystemProbe for InMemoryFileSystem {
        fn directory_exists(&self, path: &Path) -> bool {
            self.directories.lock().unwrap().contains_key(path)
        }

        fn files_in_directory(
            &self,
            directory: &Path,
            filter: FileNameFilter<'_>,
        ) -> Vec<PathBuf> {
            let directories = self.directories.lock().unwrap();
            let Some(files) = directories.get(directory) else {
                return Vec::new();
            };
            files
                .iter()
                .filter(|name| filter(name))
                .map(|name| directory.join(name))
                .collect()
        }
    }
}
