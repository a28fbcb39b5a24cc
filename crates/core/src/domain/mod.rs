// Domain Layer - Symbol path value types

pub mod error;
pub mod settings;
pub mod symbol_path;

pub use error::DomainError;
pub use settings::Settings;
pub use symbol_path::SymbolPath;
