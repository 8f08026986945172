//! Block-list persistence.
//!
//! Two JSON files: a read-mostly default list and the user list the daemon
//! enforces. Both are flat JSON arrays of app names. Missing or corrupt
//! files are recovered in place; only write failures propagate, as
//! [`Error::Persistence`].
//!
//! Every write goes through [`BlockListStore::write_inactive`], which drops
//! apps that are currently running. Persisting an active app would get it
//! re-killed the moment a reset reinstated it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use crate::config::ListPaths;
use crate::error::{Error, Result};
use crate::process::{ProcessKiller, ProcessTable};

/// Hardcoded fallback used when the default list file is missing or corrupt.
pub const DEFAULT_BLOCKED_APPS: &[&str] = &["brave", "discord", "firefox", "signal", "slack", "steam"];

/// Outcome of reading a block-list file. Recoverable conditions are values,
/// not errors; the caller branches explicitly.
#[derive(Debug)]
enum LoadResult {
    /// Parsed, normalized (lowercase, trimmed), sorted, deduplicated.
    Loaded(Vec<String>),
    /// The file does not exist.
    NotFound,
    /// The file exists but is not a JSON array of non-empty strings.
    Malformed(String),
}

/// Store for the default and user block-list files.
pub struct BlockListStore {
    paths: ListPaths,
}

impl BlockListStore {
    pub fn new(paths: ListPaths) -> Self {
        Self { paths }
    }

    /// Path of the default list file.
    pub fn default_path(&self) -> &Path {
        &self.paths.default_list
    }

    /// Path of the user list file.
    pub fn user_path(&self) -> &Path {
        &self.paths.user_list
    }

    /// Load the default block list.
    ///
    /// A missing or malformed file is logged and rewritten from
    /// [`DEFAULT_BLOCKED_APPS`]; the constant list is returned. Only the
    /// rewrite itself can fail.
    pub async fn load_default(&self) -> Result<Vec<String>> {
        match read_list(&self.paths.default_list).await {
            LoadResult::Loaded(list) => Ok(list),
            LoadResult::NotFound => {
                warn!(
                    "{} not found; writing hardcoded defaults",
                    self.paths.default_list.display()
                );
                self.rewrite_default().await
            }
            LoadResult::Malformed(reason) => {
                error!(
                    "Error loading {}: {}",
                    self.paths.default_list.display(),
                    reason
                );
                info!("Using hardcoded defaults");
                self.rewrite_default().await
            }
        }
    }

    /// Load the user block list.
    ///
    /// When the file is absent it is created from `default` filtered to
    /// inactive apps; when malformed it is reset the same way. Either way the
    /// list actually on disk afterwards is returned.
    pub async fn load_user<T: ProcessTable>(
        &self,
        default: &[String],
        killer: &mut ProcessKiller<T>,
    ) -> Result<Vec<String>> {
        match read_list(&self.paths.user_list).await {
            LoadResult::Loaded(list) => Ok(list),
            LoadResult::NotFound => {
                warn!(
                    "{} not found; creating from default block list",
                    self.paths.user_list.display()
                );
                self.write_inactive(default, killer).await
            }
            LoadResult::Malformed(reason) => {
                error!("Error reading {}: {}", self.paths.user_list.display(), reason);
                warn!("Resetting user block list to defaults");
                self.write_inactive(default, killer).await
            }
        }
    }

    /// Filter `candidates` to apps that are not currently running, persist
    /// the result to the user list file, and return it.
    ///
    /// This is the sole write path for the user file, so the persisted list
    /// never contains an app observed active at write time.
    pub async fn write_inactive<T: ProcessTable>(
        &self,
        candidates: &[String],
        killer: &mut ProcessKiller<T>,
    ) -> Result<Vec<String>> {
        let inactive: Vec<String> = candidates
            .iter()
            .filter(|app| !killer.is_active_app(app))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        write_json(&self.paths.user_list, &inactive).await?;
        Ok(inactive)
    }

    async fn rewrite_default(&self) -> Result<Vec<String>> {
        let list: Vec<String> = DEFAULT_BLOCKED_APPS
            .iter()
            .map(|app| app.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        write_json(&self.paths.default_list, &list).await?;
        Ok(list)
    }
}

/// Log set differences between two list snapshots. Returns true when the
/// lists differ.
pub fn diff_and_log(old: &[String], new: &[String]) -> bool {
    let old_set: BTreeSet<&String> = old.iter().collect();
    let new_set: BTreeSet<&String> = new.iter().collect();

    let added: Vec<&&String> = new_set.difference(&old_set).collect();
    let removed: Vec<&&String> = old_set.difference(&new_set).collect();

    if !added.is_empty() {
        info!("Added to blocked apps: {:?}", added);
    }
    if !removed.is_empty() {
        info!("Removed from blocked apps: {:?}", removed);
    }
    !added.is_empty() || !removed.is_empty()
}

async fn read_list(path: &Path) -> LoadResult {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadResult::NotFound,
        Err(e) => return LoadResult::Malformed(e.to_string()),
    };
    let entries: Vec<String> = match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => return LoadResult::Malformed(e.to_string()),
    };
    let normalized: BTreeSet<String> = entries
        .iter()
        .map(|app| app.trim().to_lowercase())
        .collect();
    if normalized.iter().any(|app| app.is_empty()) {
        return LoadResult::Malformed("list contains an empty entry".to_string());
    }
    LoadResult::Loaded(normalized.into_iter().collect())
}

/// Write the list atomically: temp file, sync, rename.
async fn write_json(path: &Path, list: &[String]) -> Result<()> {
    let persistence = |source| Error::Persistence {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await.map_err(persistence)?;
    }

    // serde_json can only fail here on a malformed map key; a string list
    // always serializes.
    let content = serde_json::to_string_pretty(list)
        .map_err(|e| persistence(std::io::Error::other(e)))?;

    let temp_path = temp_path(path);
    let mut file = fs::File::create(&temp_path).await.map_err(persistence)?;
    file.write_all(content.as_bytes()).await.map_err(persistence)?;
    file.sync_all().await.map_err(persistence)?;
    fs::rename(&temp_path, path).await.map_err(persistence)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::tests::{record, FakeProcessTable};
    use tempfile::tempdir;

    fn test_store() -> (BlockListStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = BlockListStore::new(ListPaths::in_dir(dir.path()));
        (store, dir)
    }

    fn idle_killer() -> ProcessKiller<FakeProcessTable> {
        ProcessKiller::new(FakeProcessTable::empty())
    }

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_load_default_creates_file_from_constants() {
        let (store, _dir) = test_store();

        let loaded = store.load_default().await.unwrap();
        assert_eq!(loaded, list(DEFAULT_BLOCKED_APPS));
        assert!(store.default_path().exists());

        // Second load reads the healed file.
        let again = store.load_default().await.unwrap();
        assert_eq!(again, loaded);
    }

    #[tokio::test]
    async fn test_load_default_recovers_from_corrupt_file() {
        let (store, _dir) = test_store();
        std::fs::create_dir_all(store.default_path().parent().unwrap()).unwrap();
        std::fs::write(store.default_path(), "{not json").unwrap();

        let loaded = store.load_default().await.unwrap();
        assert_eq!(loaded, list(DEFAULT_BLOCKED_APPS));

        let healed = std::fs::read_to_string(store.default_path()).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&healed).unwrap();
        assert_eq!(parsed, loaded);
    }

    #[tokio::test]
    async fn test_load_default_normalizes_entries() {
        let (store, _dir) = test_store();
        std::fs::create_dir_all(store.default_path().parent().unwrap()).unwrap();
        std::fs::write(store.default_path(), r#"["Steam", " discord ", "steam"]"#).unwrap();

        let loaded = store.load_default().await.unwrap();
        assert_eq!(loaded, list(&["discord", "steam"]));
    }

    #[tokio::test]
    async fn test_load_user_creates_from_defaults_when_absent() {
        let (store, _dir) = test_store();
        let mut killer = idle_killer();

        let defaults = list(&["discord", "slack"]);
        let loaded = store.load_user(&defaults, &mut killer).await.unwrap();
        assert_eq!(loaded, defaults);

        let on_disk = std::fs::read_to_string(store.user_path()).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(parsed, defaults);
    }

    #[tokio::test]
    async fn test_load_user_is_idempotent() {
        let (store, _dir) = test_store();
        let mut killer = idle_killer();
        let defaults = list(&["discord", "slack"]);

        let first = store.load_user(&defaults, &mut killer).await.unwrap();
        let second = store.load_user(&defaults, &mut killer).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_load_user_resets_on_invalid_json() {
        let (store, _dir) = test_store();
        let mut killer = idle_killer();
        std::fs::create_dir_all(store.user_path().parent().unwrap()).unwrap();
        std::fs::write(store.user_path(), "[1, 2, 3]").unwrap();

        let defaults = list(&["firefox"]);
        let loaded = store.load_user(&defaults, &mut killer).await.unwrap();
        assert_eq!(loaded, defaults);
    }

    #[tokio::test]
    async fn test_load_user_rejects_empty_entries() {
        let (store, _dir) = test_store();
        let mut killer = idle_killer();
        std::fs::create_dir_all(store.user_path().parent().unwrap()).unwrap();
        std::fs::write(store.user_path(), r#"["discord", "  "]"#).unwrap();

        let loaded = store.load_user(&list(&["firefox"]), &mut killer).await.unwrap();
        assert_eq!(loaded, list(&["firefox"]));
    }

    #[tokio::test]
    async fn test_write_inactive_skips_running_apps() {
        let (store, _dir) = test_store();
        let mut killer = ProcessKiller::new(FakeProcessTable::new(vec![record(
            10,
            "signal-desktop",
            Some("signal-desktop"),
        )]));

        let written = store
            .write_inactive(&list(&["signal", "discord"]), &mut killer)
            .await
            .unwrap();
        assert_eq!(written, list(&["discord"]));

        // Round-trip: loading yields exactly what was written.
        let on_disk = std::fs::read_to_string(store.user_path()).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(parsed, written);
    }

    #[tokio::test]
    async fn test_write_inactive_sorts_and_dedupes() {
        let (store, _dir) = test_store();
        let mut killer = idle_killer();

        let written = store
            .write_inactive(&list(&["steam", "brave", "steam"]), &mut killer)
            .await
            .unwrap();
        assert_eq!(written, list(&["brave", "steam"]));
    }

    #[test]
    fn test_diff_and_log() {
        let old = list(&["discord", "slack"]);
        let new = list(&["discord", "steam"]);
        assert!(diff_and_log(&old, &new));
        assert!(!diff_and_log(&old, &old));
        assert!(!diff_and_log(&[], &[]));
    }
}
