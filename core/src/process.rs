//! Process enumeration and termination.
//!
//! The [`ProcessTable`] trait is the seam between the matching logic and the
//! OS: production code uses [`SystemProcessTable`] (backed by `sysinfo`),
//! tests inject an in-memory table. Processes that vanish, deny access, or
//! are zombies during enumeration are skipped silently; killing is
//! best-effort, never transactional.

use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, System};
use tracing::{debug, warn};

use crate::matcher::is_blocked;

/// A live process observation. Derived from a snapshot, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    /// OS process id.
    pub pid: u32,
    /// Process title as reported by the OS.
    pub name: String,
    /// Final path component of the resolved executable, if known.
    pub exe_stem: Option<String>,
}

/// Source of live process records.
pub trait ProcessTable {
    /// Enumerate current processes. Zombies and unreadable entries are
    /// omitted; a transient enumeration hiccup yields a shorter snapshot,
    /// not an error.
    fn snapshot(&mut self) -> Vec<ProcessRecord>;

    /// Terminate a process. Returns false when the signal could not be
    /// delivered (already exited, access denied); callers treat that as a
    /// skip, not a failure.
    fn kill(&mut self, pid: u32) -> bool;
}

/// Process table backed by the live system via `sysinfo`.
pub struct SystemProcessTable {
    system: System,
}

impl SystemProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SystemProcessTable {
    fn snapshot(&mut self) -> Vec<ProcessRecord> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);
        self.system
            .processes()
            .iter()
            .filter(|(_, process)| !matches!(process.status(), ProcessStatus::Zombie))
            .map(|(pid, process)| ProcessRecord {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                exe_stem: process
                    .exe()
                    .and_then(|path| path.file_name())
                    .map(|stem| stem.to_string_lossy().into_owned()),
            })
            .collect()
    }

    fn kill(&mut self, pid: u32) -> bool {
        match self.system.process(Pid::from_u32(pid)) {
            Some(process) => process.kill(),
            None => false,
        }
    }
}

/// Applies the block-list matcher to live processes and terminates matches.
pub struct ProcessKiller<T: ProcessTable> {
    table: T,
}

impl<T: ProcessTable> ProcessKiller<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &T {
        &self.table
    }

    /// Check whether an app is currently running.
    ///
    /// An app counts as active when it equals a process name or exe stem
    /// verbatim (lowercased), or appears as a `-`-delimited token of the
    /// combined `"{name}-{exe}"` string. Used to filter lists before they
    /// are persisted, never to trigger a kill.
    pub fn is_active_app(&mut self, app: &str) -> bool {
        let app = app.trim().to_lowercase();
        if app.is_empty() {
            return false;
        }
        for record in self.table.snapshot() {
            let name = record.name.to_lowercase();
            let exe = record
                .exe_stem
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            if app == name || app == exe {
                debug!("App {:?} is active: exact match (PID {})", app, record.pid);
                return true;
            }
            let combined = format!("{}-{}", name, exe);
            if combined.trim_matches('-').split('-').any(|token| token == app) {
                debug!("App {:?} is active: token match (PID {})", app, record.pid);
                return true;
            }
        }
        false
    }

    /// Kill every live process matching the block list.
    ///
    /// Enumerates once per pass; matches are checked against both the
    /// process name and the exe stem. Each process name is targeted at most
    /// once per pass even when several PIDs share it. Returns the names of
    /// the processes that were targeted.
    pub fn kill_blocked(&mut self, block_list: &[String]) -> Vec<String> {
        if block_list.is_empty() {
            return Vec::new();
        }
        let mut killed: Vec<String> = Vec::new();
        for record in self.table.snapshot() {
            if killed.contains(&record.name) {
                continue;
            }
            let exe = record.exe_stem.as_deref().unwrap_or_default();
            if is_blocked(&record.name, block_list) || is_blocked(exe, block_list) {
                warn!("Killing {:?} (PID {})", record.name, record.pid);
                self.table.kill(record.pid);
                killed.push(record.name.clone());
            }
        }
        killed
    }
}
