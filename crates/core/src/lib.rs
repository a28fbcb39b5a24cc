// symsync Core - Domain Logic & Ports
// NO infrastructure dependencies (hexagonal architecture)

pub mod application;
pub mod domain;
pub mod port;

pub use application::{SymbolPathService, UpdateError};
pub use domain::{Settings, SymbolPath};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
