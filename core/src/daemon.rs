//! The reconciliation loop.
//!
//! One logical thread of control: each tick reloads configuration, resets
//! the user list when the reset interval has elapsed, runs a kill pass, and
//! sleeps. Cancellation is cooperative, observed only at the top of an
//! iteration; an in-progress pass or sleep is never interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::Ticks;
use crate::error::Result;
use crate::process::{ProcessKiller, ProcessTable};
use crate::store::{diff_and_log, BlockListStore};

/// Loop state, owned by the loop and threaded through each step. There is no
/// module-level singleton; one value, one mutator.
#[derive(Debug, Clone)]
pub struct DaemonState {
    /// Current tick intervals, re-read from the environment each iteration.
    pub ticks: Ticks,
    /// The block list currently enforced.
    pub blocked_apps: Vec<String>,
    /// When the user list was last reset (loop start counts as a reset).
    last_reset: Instant,
}

/// The app blocker daemon.
pub struct Daemon<T: ProcessTable> {
    store: BlockListStore,
    killer: ProcessKiller<T>,
    shutdown: Arc<AtomicBool>,
}

impl<T: ProcessTable> Daemon<T> {
    /// Create a daemon over the given store and process table. `shutdown` is
    /// the cooperative cancellation flag, typically set from a signal
    /// handler.
    pub fn new(store: BlockListStore, table: T, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            store,
            killer: ProcessKiller::new(table),
            shutdown,
        }
    }

    /// Run the polling loop until the shutdown flag is observed.
    ///
    /// Only persistence failures terminate the loop with an error; corrupt
    /// list files and per-process kill failures are recovered or swallowed
    /// below this level.
    pub async fn run(&mut self) -> Result<()> {
        let mut state = self.init().await?;
        while !self.shutdown.load(Ordering::SeqCst) {
            state = self.tick(state).await?;
            tokio::time::sleep(state.ticks.check).await;
        }
        info!("Daemon stopped");
        Ok(())
    }

    /// INIT: load ticks and lists, log the starting state.
    async fn init(&mut self) -> Result<DaemonState> {
        let ticks = Ticks::from_env();
        let default = self.store.load_default().await?;
        let blocked_apps = self.store.load_user(&default, &mut self.killer).await?;

        info!("App blocker started");
        info!("Default block list file: {}", self.store.default_path().display());
        info!("User block list file: {}", self.store.user_path().display());
        let state = DaemonState {
            ticks,
            blocked_apps,
            last_reset: Instant::now(),
        };
        log_state(&state);
        Ok(state)
    }

    /// One POLLING iteration: reload + diff, maybe reset, kill pass.
    async fn tick(&mut self, mut state: DaemonState) -> Result<DaemonState> {
        // Pick up environment and file edits made since the last tick.
        let new_ticks = Ticks::from_env();
        let ticks_changed = new_ticks != state.ticks;
        if ticks_changed {
            info!(
                "Ticks changed: check {}s -> {}s, reset {}s -> {}s",
                state.ticks.check.as_secs_f64(),
                new_ticks.check.as_secs_f64(),
                state.ticks.reset.as_secs_f64(),
                new_ticks.reset.as_secs_f64()
            );
            state.ticks = new_ticks;
        }

        let default = self.store.load_default().await?;
        let reloaded = self.store.load_user(&default, &mut self.killer).await?;
        let list_changed = diff_and_log(&state.blocked_apps, &reloaded);
        if list_changed {
            state.blocked_apps = reloaded;
        }
        if ticks_changed || list_changed {
            log_state(&state);
        }

        // Periodic reset: reinstate the defaults, minus whatever is running.
        if state.last_reset.elapsed() >= state.ticks.reset {
            let mut candidates = state.blocked_apps.clone();
            candidates.extend(default.iter().cloned());
            let written = self
                .store
                .write_inactive(&candidates, &mut self.killer)
                .await?;
            info!("User block list was reset to: {:?}", written);
            state.blocked_apps = written;
            state.last_reset = Instant::now();
        }

        let killed = self.killer.kill_blocked(&state.blocked_apps);
        if !killed.is_empty() {
            debug!("Kill pass terminated {} process(es)", killed.len());
        }

        Ok(state)
    }
}

fn log_state(state: &DaemonState) {
    info!(
        "State: check_tick={}s reset_tick={}s blocked_apps={:?}",
        state.ticks.check.as_secs_f64(),
        state.ticks.reset.as_secs_f64(),
        state.blocked_apps
    );
}
