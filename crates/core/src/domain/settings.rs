// Service Settings Model

use serde::{Deserialize, Serialize};

/// Name of the variable a debugger reads its symbol search path from
pub const DEFAULT_SYMBOL_PATH_VAR: &str = "_NT_SYMBOL_PATH";

/// Symbol path service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Fixed first segment identifying the remote symbol server
    pub symbol_server: String,

    /// Environment variable holding the symbol search path
    #[serde(default = "default_variable_name")]
    pub variable_name: String,
}

fn default_variable_name() -> String {
    DEFAULT_SYMBOL_PATH_VAR.to_string()
}

impl Settings {
    pub fn new(symbol_server: impl Into<String>) -> Self {
        Self {
            symbol_server: symbol_server.into(),
            variable_name: default_variable_name(),
        }
    }

    pub fn with_variable_name(mut self, variable_name: impl Into<String>) -> Self {
        self.variable_name = variable_name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_variable() {
        let settings = Settings::new("*SRV");
        assert_eq!(settings.symbol_server, "*SRV");
        assert_eq!(settings.variable_name, DEFAULT_SYMBOL_PATH_VAR);
    }

    #[test]
    fn test_deserialize_defaults_variable_name() {
        let settings: Settings = serde_json::from_str(r#"{"symbol_server":"*SRV"}"#).unwrap();
        assert_eq!(settings.variable_name, DEFAULT_SYMBOL_PATH_VAR);
    }

    #[test]
    fn test_with_variable_name_overrides() {
        let settings = Settings::new("*SRV").with_variable_name("SYMSYNC_TEST_VAR");
        assert_eq!(settings.variable_name, "SYMSYNC_TEST_VAR");
    }
}
