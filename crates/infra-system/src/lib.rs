// symsync Infrastructure - System Adapters
// Implements: EnvironmentRepository, FileSystemProbe + OS process access

pub mod environment_repository_impl;
pub mod file_system_impl;
pub mod process;

pub use environment_repository_impl::OsEnvironment;
pub use file_system_impl::OsFileSystem;
pub use process::{ProcessDirectory, ProcessError, ProcessHandle};
