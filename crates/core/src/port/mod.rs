// Port Layer - Interfaces for external dependencies

pub mod environment_repository;
pub mod file_system;

// Re-exports
pub use environment_repository::EnvironmentRepository;
pub use file_system::FileSystemProbe;
