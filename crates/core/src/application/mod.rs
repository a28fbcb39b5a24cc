// Application Layer - Symbol path state machine

pub mod symbol_path_service;

pub use symbol_path_service::{SymbolPathService, UpdateError};
