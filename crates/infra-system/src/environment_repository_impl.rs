// Environment repository implementation over the process environment

use symsync_core::port::EnvironmentRepository;
use tracing::warn;

/// Environment store backed by this process's environment block
#[derive(Debug, Default)]
pub struct OsEnvironment;

impl OsEnvironment {
    pub fn new() -> Self {
        Self
    }
}

impl EnvironmentRepository for OsEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set(&self, name: &str, value: &str) -> bool {
        // std::env::set_var aborts on names/values the OS cannot
        // represent; validate first and report failure instead
        if name.is_empty() || name.contains('=') || name.contains('\0') || value.contains('\0') {
            warn!(name, "Rejected environment variable write");
            return false;
        }
        std::env::set_var(name, value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // Serialized: getenv/setenv from parallel test threads is a data
    // race on glibc

    #[test]
    #[serial(process_env)]
    fn test_set_then_get_roundtrip() {
        let environment = OsEnvironment::new();

        assert!(environment.set("SYMSYNC_TEST_ROUNDTRIP", "*SRV;/tmp/app"));

        assert_eq!(
            environment.get("SYMSYNC_TEST_ROUNDTRIP"),
            Some("*SRV;/tmp/app".to_string())
        );
    }

    #[test]
    #[serial(process_env)]
    fn test_get_unset_variable_returns_none() {
        let environment = OsEnvironment::new();
        assert_eq!(environment.get("SYMSYNC_TEST_NEVER_SET"), None);
    }

    #[test]
    #[serial(process_env)]
    fn test_set_rejects_invalid_name() {
        let environment = OsEnvironment::new();
        assert!(!environment.set("", "value"));
        assert!(!environment.set("BAD=NAME", "value"));
    }

    #[test]
    #[serial(process_env)]
    fn test_set_rejects_nul_in_value() {
        let environment = OsEnvironment::new();
        assert!(!environment.set("SYMSYNC_TEST_NUL", "a\0b"));
    }
}
