// Symbol Path Service
//
// Owns the ordered segment list backing the symbol path variable and
// keeps the tracked application's directory in sync with it. Exactly one
// concurrent caller is supported; callers needing shared access must
// serialize externally (single-writer discipline).

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::symbol_path::SEGMENT_DELIMITER;
use crate::domain::{Settings, SymbolPath};
use crate::port::{EnvironmentRepository, FileSystemProbe};

/// Failure of a single `update_application_path` call
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UpdateError {
    /// The new path was rejected before any state change
    #[error("Invalid application path: {0}")]
    Validation(String),

    /// The store refused the write; in-memory state was rolled back
    #[error("Failed to persist symbol path variable '{variable}'")]
    Persistence { variable: String },
}

pub type Result<T> = std::result::Result<T, UpdateError>;

/// Service keeping the symbol path variable in step with the tracked
/// application directory
pub struct SymbolPathService {
    settings: Settings,
    environment: Arc<dyn EnvironmentRepository>,
    file_system: Arc<dyn FileSystemProbe>,
    symbol_path: SymbolPath,
    application_path: Option<String>,
}

impl SymbolPathService {
    /// Construct the service, reading the variable once to seed state.
    ///
    /// An unset or empty variable is seeded with the server marker and
    /// written back; a failed initial write is reported but the service
    /// still comes up with the marker-only path in memory.
    pub fn new(
        settings: Settings,
        environment: Arc<dyn EnvironmentRepository>,
        file_system: Arc<dyn FileSystemProbe>,
    ) -> Self {
        let symbol_path = match environment.get(&settings.variable_name) {
            Some(raw) if !raw.is_empty() => {
                let path = SymbolPath::parse(&settings.symbol_server, &raw);
                info!(
                    variable = %settings.variable_name,
                    value = %path,
                    "Seeded symbol path from existing variable"
                );
                path
            }
            _ => {
                let path = SymbolPath::seed(settings.symbol_server.clone());
                if environment.set(&settings.variable_name, &path.to_string()) {
                    info!(
                        variable = %settings.variable_name,
                        value = %path,
                        "Initialized symbol path variable"
                    );
                } else {
                    warn!(
                        variable = %settings.variable_name,
                        "Initial symbol path write failed, continuing with in-memory state"
                    );
                }
                path
            }
        };

        Self {
            settings,
            environment,
            file_system,
            symbol_path,
            application_path: None,
        }
    }

    /// Currently tracked application directory, if any
    pub fn application_path(&self) -> Option<&str> {
        self.application_path.as_deref()
    }

    /// Serialized segment list as last accepted in memory
    pub fn current_value(&self) -> String {
        self.symbol_path.to_string()
    }

    /// Replace the tracked application segment with `new_path` and
    /// persist the full segment list.
    ///
    /// Repeating the same path is idempotent in content but still
    /// issues a write, so the variable reflects this model even if it
    /// was mutated externally between calls. On a failed write the
    /// in-memory state rolls back to the last durably written value.
    pub fn update_application_path(&mut self, new_path: &str) -> Result<()> {
        if new_path.is_empty() {
            return Err(UpdateError::Validation("path is empty".to_string()));
        }
        if new_path.contains(SEGMENT_DELIMITER) {
            return Err(UpdateError::Validation(format!(
                "path contains reserved delimiter '{SEGMENT_DELIMITER}': {new_path}"
            )));
        }
        if !self.file_system.directory_exists(Path::new(new_path)) {
            return Err(UpdateError::Validation(format!(
                "directory does not exist: {new_path}"
            )));
        }

        let previous_path = self.symbol_path.clone();
        let previous_application = self.application_path.clone();

        if let Some(tracked) = &self.application_path {
            if tracked != new_path {
                self.symbol_path.remove(tracked);
            }
        }
        if let Err(rejected) = self.symbol_path.append(new_path) {
            // Unreachable after the checks above, but never mutate on rejection
            self.symbol_path = previous_path;
            return Err(UpdateError::Validation(rejected.to_string()));
        }
        self.application_path = Some(new_path.to_string());

        let serialized = self.symbol_path.to_string();
        if self.environment.set(&self.settings.variable_name, &serialized) {
            debug!(
                variable = %self.settings.variable_name,
                value = %serialized,
                application_path = %new_path,
                "Symbol path updated"
            );
            Ok(())
        } else {
            self.symbol_path = previous_path;
            self.application_path = previous_application;
            warn!(
                variable = %self.settings.variable_name,
                attempted = %serialized,
                "Symbol path write failed, state rolled back"
            );
            Err(UpdateError::Persistence {
                variable: self.settings.variable_name.clone(),
            })
        }
    }
}
