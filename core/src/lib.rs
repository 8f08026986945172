//! AppBlocker Core Library
//!
//! Library for the app blocker daemon: periodically enumerates running
//! processes and terminates any whose name or executable matches a
//! user-editable block list, restoring a default subset of that list on a
//! timer.
//!
//! # Architecture
//! - `matcher`: pure block-list matching heuristic
//! - `store`: default/user list persistence with corruption recovery
//! - `process`: process enumeration and best-effort termination
//! - `daemon`: the polling/reset reconciliation loop
//! - `config`: file locations and tick intervals
//!
//! The daemon is strictly single-threaded and cooperative: one loop, one
//! state value, cancellation observed between ticks.

pub mod config;
pub mod daemon;
pub mod error;
pub mod matcher;
pub mod process;
pub mod store;

// Re-export commonly used types
pub use config::{ListPaths, Ticks};
pub use daemon::{Daemon, DaemonState};
pub use error::{Error, Result};
pub use matcher::is_blocked;
pub use process::{ProcessKiller, ProcessRecord, ProcessTable, SystemProcessTable};
pub use store::{diff_and_log, BlockListStore, DEFAULT_BLOCKED_APPS};
