// OS Process Access
//
// `ProcessDirectory` spawns and discovers processes; `ProcessHandle`
// tracks one of them. Handles over spawned processes own the OS child
// and wait for it on drop; handles over discovered processes only
// observe and are never signaled.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use std::thread;
use std::time::Duration;

use sysinfo::System;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Poll interval when waiting on a process we did not spawn
const DISCOVERED_WAIT_POLL: Duration = Duration::from_millis(100);

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to start process '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Handle over one OS process, spawned or discovered
pub struct ProcessHandle {
    pid: u32,
    // Present only for processes this directory spawned; carrying the
    // child is what lets us collect its exit status
    child: Option<Child>,
    exit_status: Option<ExitStatus>,
}

impl ProcessHandle {
    fn spawned(child: Child) -> Self {
        Self {
            pid: child.id(),
            child: Some(child),
            exit_status: None,
        }
    }

    fn discovered(pid: u32) -> Self {
        Self {
            pid,
            child: None,
            exit_status: None,
        }
    }

    /// OS process id, stable for the handle's lifetime
    pub fn id(&self) -> u32 {
        self.pid
    }

    /// Whether this handle spawned the process it tracks
    pub fn owns_lifecycle(&self) -> bool {
        self.child.is_some()
    }

    /// Live running check against the OS, never cached
    pub fn is_running(&mut self) -> bool {
        if self.exit_status.is_some() {
            return false;
        }
        match &mut self.child {
            Some(child) => match child.try_wait() {
                Ok(Some(status)) => {
                    self.exit_status = Some(status);
                    false
                }
                Ok(None) => true,
                Err(error) => {
                    warn!(pid = %self.pid, %error, "try_wait failed, probing process table");
                    process_alive(self.pid)
                }
            },
            None => process_alive(self.pid),
        }
    }

    /// Exit code, present only once the process has exited.
    ///
    /// Discovered processes never report one: the OS hands the status
    /// to the waiter, which is not us.
    pub fn exit_code(&mut self) -> Option<i32> {
        if self.exit_status.is_none() {
            if let Some(child) = &mut self.child {
                if let Ok(Some(status)) = child.try_wait() {
                    self.exit_status = Some(status);
                }
            }
        }
        self.exit_status.and_then(|status| status.code())
    }

    /// Block until the process exits; no-op when already exited.
    ///
    /// Unbounded by contract; callers needing a bounded wait poll
    /// `is_running` instead.
    pub fn wait_for_exit(&mut self) {
        if self.exit_status.is_some() {
            return;
        }
        match &mut self.child {
            Some(child) => match child.wait() {
                Ok(status) => {
                    debug!(pid = %self.pid, code = ?status.code(), "Process exited");
                    self.exit_status = Some(status);
                }
                Err(error) => {
                    warn!(pid = %self.pid, %error, "wait failed, abandoning wait");
                }
            },
            None => {
                while process_alive(self.pid) {
                    thread::sleep(DISCOVERED_WAIT_POLL);
                }
                debug!(pid = %self.pid, "Discovered process gone from process table");
            }
        }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // Spawned children must be reaped before release so the OS wait
        // handle is not leaked; discovered processes are left alone
        if self.owns_lifecycle() && self.exit_status.is_none() {
            self.wait_for_exit();
        }
    }
}

/// OS-level process operations: start, enumerate, resolve path
#[derive(Debug, Default)]
pub struct ProcessDirectory;

impl ProcessDirectory {
    pub fn new() -> Self {
        Self
    }

    /// Spawn a new process; no side effect when the spawn fails
    pub fn start(&self, program: &Path, args: &[String]) -> Result<ProcessHandle, ProcessError> {
        let child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.display().to_string(),
                source,
            })?;
        info!(pid = %child.id(), program = %program.display(), "Started process");
        Ok(ProcessHandle::spawned(child))
    }

    /// Handles for every running process whose executable name matches.
    ///
    /// One snapshot of the process table; processes starting or exiting
    /// during enumeration are best-effort. An empty name matches
    /// nothing, never everything.
    pub fn enumerate_by_name(&self, name: &str) -> Vec<ProcessHandle> {
        if name.is_empty() {
            return Vec::new();
        }
        let system = snapshot();
        system
            .processes()
            .values()
            .filter(|process| name_matches(process.name(), name))
            .map(|process| ProcessHandle::discovered(process.pid().as_u32()))
            .collect()
    }

    /// Full executable path of one running process matching `name`.
    ///
    /// Any miss (no such process, module information denied) collapses
    /// to `None` rather than surfacing an OS fault.
    pub fn resolve_path_of_running_process(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let system = snapshot();
        let path = system
            .processes()
            .values()
            .filter(|process| name_matches(process.name(), name))
            .find_map(|process| process.exe().map(Path::to_path_buf));
        match &path {
            Some(resolved) => debug!(name, path = %resolved.display(), "Resolved running process"),
            None => debug!(name, "No running process path resolved"),
        }
        path
    }
}

fn snapshot() -> System {
    let mut system = System::new();
    system.refresh_processes();
    system
}

#[cfg(not(windows))]
fn name_matches(process_name: &str, wanted: &str) -> bool {
    process_name == wanted
}

#[cfg(windows)]
fn name_matches(process_name: &str, wanted: &str) -> bool {
    process_name.eq_ignore_ascii_case(wanted)
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    // Signal 0 checks existence without sending anything
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[cfg(not(unix))]
fn process_alive(pid: u32) -> bool {
    let mut system = System::new();
    system.refresh_process(sysinfo::Pid::from_u32(pid));
    system.process(sysinfo::Pid::from_u32(pid)).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn shell() -> PathBuf {
        PathBuf::from("/bin/sh")
    }

    fn args(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_start_missing_executable_produces_no_handle() {
        let directory = ProcessDirectory::new();
        let result = directory.start(Path::new("/nonexistent/definitely-not-here"), &[]);
        assert!(matches!(result, Err(ProcessError::Spawn { .. })));
    }

    #[test]
    fn test_enumerate_empty_name_returns_nothing() {
        let directory = ProcessDirectory::new();
        assert!(directory.enumerate_by_name("").is_empty());
    }

    #[test]
    fn test_resolve_empty_name_returns_none() {
        let directory = ProcessDirectory::new();
        assert!(directory.resolve_path_of_running_process("").is_none());
    }

    #[test]
    fn test_resolve_unknown_name_returns_none() {
        let directory = ProcessDirectory::new();
        assert!(directory
            .resolve_path_of_running_process("no-such-process-symsync")
            .is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_zero_for_successful_command() {
        let directory = ProcessDirectory::new();
        let mut process = directory.start(&shell(), &args("exit 0")).unwrap();

        process.wait_for_exit();

        assert!(!process.is_running());
        assert_eq!(process.exit_code(), Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_nonzero_for_failing_command() {
        let directory = ProcessDirectory::new();
        let mut process = directory.start(&shell(), &args("exit 3")).unwrap();

        process.wait_for_exit();

        assert_eq!(process.exit_code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_absent_while_running() {
        let directory = ProcessDirectory::new();
        let mut process = directory.start(&shell(), &args("sleep 2")).unwrap();

        assert!(process.is_running());
        assert_eq!(process.exit_code(), None);

        process.wait_for_exit();
        assert_eq!(process.exit_code(), Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_blocks_until_process_ends() {
        let directory = ProcessDirectory::new();
        let start = Instant::now();

        let mut process = directory.start(&shell(), &args("sleep 1")).unwrap();
        process.wait_for_exit();

        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_is_noop_after_exit() {
        let directory = ProcessDirectory::new();
        let mut process = directory.start(&shell(), &args("exit 0")).unwrap();

        process.wait_for_exit();
        let start = Instant::now();
        process.wait_for_exit();

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_finds_spawned_shell() {
        let directory = ProcessDirectory::new();
        let mut process = directory.start(&shell(), &args("sleep 2")).unwrap();

        let matches = directory.enumerate_by_name("sh");
        let found = matches.iter().any(|handle| handle.id() == process.id());

        process.wait_for_exit();
        assert!(found);
    }

    #[cfg(unix)]
    #[test]
    fn test_discovered_handle_observes_without_owning() {
        let directory = ProcessDirectory::new();
        let mut process = directory.start(&shell(), &args("sleep 2")).unwrap();

        let mut handles = directory.enumerate_by_name("sh");
        let position = handles
            .iter()
            .position(|handle| handle.id() == process.id())
            .expect("spawned shell missing from snapshot");
        let discovered = &mut handles[position];

        assert!(!discovered.owns_lifecycle());
        assert!(discovered.is_running());
        assert_eq!(discovered.exit_code(), None);

        process.wait_for_exit();
        // Status went to the real waiter, not to the observer
        assert_eq!(discovered.exit_code(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_drop_of_running_spawned_handle_waits_for_exit() {
        let directory = ProcessDirectory::new();
        let start = Instant::now();

        {
            let _process = directory.start(&shell(), &args("sleep 1")).unwrap();
            // Dropped while still running; the handle must reap it
        }

        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[cfg(unix)]
    #[test]
    fn test_drop_of_discovered_handle_leaves_process_alone() {
        let directory = ProcessDirectory::new();
        let mut tracked = directory.start(&shell(), &args("sleep 2")).unwrap();

        let mut handles = directory.enumerate_by_name("sh");
        let position = handles
            .iter()
            .position(|handle| handle.id() == tracked.id())
            .expect("spawned shell missing from snapshot");

        let start = Instant::now();
        drop(handles.remove(position));

        // No implicit wait and no termination for an observed process
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(tracked.is_running());
        tracked.wait_for_exit();
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_path_of_spawned_shell() {
        let directory = ProcessDirectory::new();
        let mut process = directory.start(&shell(), &args("sleep 2")).unwrap();

        let path = directory.resolve_path_of_running_process("sh");

        process.wait_for_exit();
        assert!(path.is_some());
    }
}
