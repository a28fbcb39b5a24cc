// Environment Variable Store Port

/// Named environment variable access
///
/// The single write path for the symbol path variable; never touched as
/// ambient global state by the core.
pub trait EnvironmentRepository: Send + Sync {
    /// Read a variable, `None` when unset
    fn get(&self, name: &str) -> Option<String>;

    /// Write a variable; reports whether the store accepted the value
    fn set(&self, name: &str, value: &str) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory EnvironmentRepository for testing
    ///
    /// Records every accepted write and can be toggled to reject writes.
    #[derive(Default)]
    pub struct InMemoryEnvironment {
        vars: Mutex<HashMap<String, String>>,
        writes: Mutex<Vec<(String, String)>>,
        fail_writes: AtomicBool,
    }

    impl InMemoryEnvironment {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_var(name: impl Into<String>, value: impl Into<String>) -> Self {
            let env = Self::default();
            env.vars
                .lock()
                .unwrap()
                .insert(name.into(), value.into());
            env
        }

        /// Make every subsequent `set` report failure
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Accepted writes, oldest first
        pub fn writes(&self) -> Vec<(String, String)> {
            self.writes.lock().unwrap().clone()
        }

        pub fn value(&self, name: &str) -> Option<String> {
            self.vars.lock().unwrap().get(name).cloned()
        }
    }

    impl EnvironmentRepository for InMemoryEnvironment {
        fn get(&self, name: &str) -> Option<String> {
            self.vars.lock().unwrap().get(name).cloned()
        }

        fn set(&self, name: &str, value: &str) -> bool {
            if self.fail_writes.load(Ordering::SeqCst) {
                return false;
            }
            self.vars
                .lock()
                .unwrap()
                .insert(name.to_string(), value.to_string());
            self.writes
                .lock()
                .unwrap()
                .push((name.to_string(), value.to_string()));
            true
        }
    }
}
