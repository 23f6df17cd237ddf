//! Core ProfileStore implementations

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::Profile;

/// Everything stored for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_goals: Option<String>,
}

/// All records keyed by user identifier
type Records = BTreeMap<String, UserRecord>;

/// Keyed record storage for per-user profiles and last-submitted goals
///
/// Implementations serialize read-modify-write per store so concurrent updates
/// for the same user never interleave. There is no cross-user coordination.
pub trait ProfileStore: Send + Sync {
    /// Get the saved profile, if any
    fn get(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Replace the profile wholesale
    fn set(&self, user_id: &str, profile: &Profile) -> Result<()>;

    /// Get the most recent goals text, if any
    fn get_last_goal(&self, user_id: &str) -> Result<Option<String>>;

    /// Overwrite the goals text; no history is kept
    fn set_last_goal(&self, user_id: &str, goals_text: &str) -> Result<()>;

    /// Remove everything stored for the user
    fn delete(&self, user_id: &str) -> Result<()>;

    /// List user identifiers with a stored record
    fn list_users(&self) -> Result<Vec<String>>;
}

/// Store backed by a single JSON document on disk
///
/// Each operation takes an in-process mutex plus an advisory lock on a sibling
/// `.lock` file, so separate processes sharing the document also serialize.
pub struct JsonProfileStore {
    path: PathBuf,
    lock_path: PathBuf,
    guard: Mutex<()>,
}

impl JsonProfileStore {
    /// Open or create a store document at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context(format!("Failed to create store directory {}", parent.display()))?;
        }

        let mut lock_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);

        let store = Self {
            path,
            lock_path,
            guard: Mutex::new(()),
        };

        if !store.path.exists() {
            debug!(path = ?store.path, "JsonProfileStore::open: creating empty document");
            store.write_all(&Records::new())?;
        }

        info!(path = ?store.path, "Opened profile store");
        Ok(store)
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_file(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)
            .context(format!("Failed to open lock file {}", self.lock_path.display()))
    }

    fn read_all(&self) -> Result<Records> {
        if !self.path.exists() {
            debug!("JsonProfileStore::read_all: document missing, treating as empty");
            return Ok(Records::new());
        }

        let file = File::open(&self.path).context(format!("Failed to open {}", self.path.display()))?;
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Profile store document is not valid JSON, treating as empty");
                Ok(Records::new())
            }
        }
    }

    fn write_all(&self, records: &Records) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir).context("Failed to create temp file for store")?;
        serde_json::to_writer_pretty(&mut tmp, records).context("Failed to serialize store")?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| eyre!("Failed to replace {}: {}", self.path.display(), e))?;
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&Records) -> T) -> Result<T> {
        let _guard = self.guard.lock().map_err(|_| eyre!("Profile store mutex poisoned"))?;
        let lock = self.lock_file()?;
        FileExt::lock_shared(&lock).context("Failed to acquire shared store lock")?;

        let result = self.read_all().map(|records| f(&records));

        FileExt::unlock(&lock).context("Failed to release store lock")?;
        result
    }

    fn update(&self, f: impl FnOnce(&mut Records)) -> Result<()> {
        let _guard = self.guard.lock().map_err(|_| eyre!("Profile store mutex poisoned"))?;
        let lock = self.lock_file()?;
        FileExt::lock_exclusive(&lock).context("Failed to acquire exclusive store lock")?;

        let result = self.read_all().and_then(|mut records| {
            f(&mut records);
            self.write_all(&records)
        });

        FileExt::unlock(&lock).context("Failed to release store lock")?;
        result
    }
}

impl ProfileStore for JsonProfileStore {
    fn get(&self, user_id: &str) -> Result<Option<Profile>> {
        debug!(%user_id, "JsonProfileStore::get: called");
        self.read(|records| records.get(user_id).and_then(|r| r.profile.clone()))
    }

    fn set(&self, user_id: &str, profile: &Profile) -> Result<()> {
        debug!(%user_id, "JsonProfileStore::set: called");
        self.update(|records| {
            records.entry(user_id.to_string()).or_default().profile = Some(profile.clone());
        })
    }

    fn get_last_goal(&self, user_id: &str) -> Result<Option<String>> {
        debug!(%user_id, "JsonProfileStore::get_last_goal: called");
        self.read(|records| records.get(user_id).and_then(|r| r.last_goals.clone()))
    }

    fn set_last_goal(&self, user_id: &str, goals_text: &str) -> Result<()> {
        debug!(%user_id, goals_len = goals_text.len(), "JsonProfileStore::set_last_goal: called");
        self.update(|records| {
            records.entry(user_id.to_string()).or_default().last_goals = Some(goals_text.to_string());
        })
    }

    fn delete(&self, user_id: &str) -> Result<()> {
        debug!(%user_id, "JsonProfileStore::delete: called");
        self.update(|records| {
            records.remove(user_id);
        })
    }

    fn list_users(&self) -> Result<Vec<String>> {
        debug!("JsonProfileStore::list_users: called");
        self.read(|records| records.keys().cloned().collect())
    }
}

/// In-memory store, mainly for tests and one-shot runs
#[derive(Default)]
pub struct MemoryProfileStore {
    records: Mutex<Records>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_records<T>(&self, f: impl FnOnce(&mut Records) -> T) -> Result<T> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| eyre!("Profile store mutex poisoned"))?;
        Ok(f(&mut records))
    }
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, user_id: &str) -> Result<Option<Profile>> {
        self.with_records(|records| records.get(user_id).and_then(|r| r.profile.clone()))
    }

    fn set(&self, user_id: &str, profile: &Profile) -> Result<()> {
        self.with_records(|records| {
            records.entry(user_id.to_string()).or_default().profile = Some(profile.clone());
        })
    }

    fn get_last_goal(&self, user_id: &str) -> Result<Option<String>> {
        self.with_records(|records| records.get(user_id).and_then(|r| r.last_goals.clone()))
    }

    fn set_last_goal(&self, user_id: &str, goals_text: &str) -> Result<()> {
        self.with_records(|records| {
            records.entry(user_id.to_string()).or_default().last_goals = Some(goals_text.to_string());
        })
    }

    fn delete(&self, user_id: &str) -> Result<()> {
        self.with_records(|records| {
            records.remove(user_id);
        })
    }

    fn list_users(&self) -> Result<Vec<String>> {
        self.with_records(|records| records.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, JsonProfileStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonProfileStore::open(dir.path().join("data").join("memory.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_creates_empty_document() {
        let (_dir, store) = open_temp();
        assert!(store.path().exists());
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.trim(), "{}");
        assert!(store.list_users().unwrap().is_empty());
    }

    #[test]
    fn test_profile_and_goals_share_a_record() {
        let (_dir, store) = open_temp();
        let profile = Profile::new("Ada", "student").with_hours_per_day(2.0);

        store.set("42", &profile).unwrap();
        store.set_last_goal("42", "thesis; db course").unwrap();

        assert_eq!(store.get("42").unwrap(), Some(profile));
        assert_eq!(store.get_last_goal("42").unwrap().as_deref(), Some("thesis; db course"));
        assert_eq!(store.list_users().unwrap(), vec!["42".to_string()]);
    }

    #[test]
    fn test_set_overwrites_wholesale() {
        let (_dir, store) = open_temp();
        store.set("1", &Profile::new("Ada", "student").with_hours_per_week(10.0)).unwrap();
        store.set("1", &Profile::new("Ada", "engineer")).unwrap();

        let profile = store.get("1").unwrap().unwrap();
        assert_eq!(profile.role, "engineer");
        assert_eq!(profile.hours_per_week, None);
    }

    #[test]
    fn test_goal_overwrite_keeps_only_latest() {
        let (_dir, store) = open_temp();
        store.set_last_goal("1", "first").unwrap();
        store.set_last_goal("1", "second").unwrap();
        assert_eq!(store.get_last_goal("1").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_goal_without_profile() {
        let (_dir, store) = open_temp();
        store.set_last_goal("7", "guitar").unwrap();
        assert_eq!(store.get("7").unwrap(), None);
        assert_eq!(store.get_last_goal("7").unwrap().as_deref(), Some("guitar"));
    }

    #[test]
    fn test_delete_removes_record() {
        let (_dir, store) = open_temp();
        store.set("1", &Profile::new("Ada", "student")).unwrap();
        store.set_last_goal("1", "x").unwrap();
        store.set("2", &Profile::new("Bob", "tutor")).unwrap();

        store.delete("1").unwrap();

        assert_eq!(store.get("1").unwrap(), None);
        assert_eq!(store.get_last_goal("1").unwrap(), None);
        assert!(store.get("2").unwrap().is_some());
    }

    #[test]
    fn test_delete_unknown_user_is_ok() {
        let (_dir, store) = open_temp();
        assert!(store.delete("nobody").is_ok());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        {
            let store = JsonProfileStore::open(&path).unwrap();
            store.set("1", &Profile::new("Ada", "student")).unwrap();
        }
        let store = JsonProfileStore::open(&path).unwrap();
        assert_eq!(store.get("1").unwrap().unwrap().name, "Ada");
    }

    #[test]
    fn test_corrupt_document_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonProfileStore::open(&path).unwrap();
        assert_eq!(store.get("1").unwrap(), None);

        store.set_last_goal("1", "recovered").unwrap();
        assert_eq!(store.get_last_goal("1").unwrap().as_deref(), Some("recovered"));
    }

    #[test]
    fn test_reads_legacy_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        fs::write(
            &path,
            r#"{"123": {"profile": {"name": "Ada", "role": "", "hours_per_day": null, "hours_per_week": 5.0}, "last_goals": "a, b"}}"#,
        )
        .unwrap();

        let store = JsonProfileStore::open(&path).unwrap();
        let profile = store.get("123").unwrap().unwrap();
        assert_eq!(profile.hours_per_week, Some(5.0));
        assert_eq!(store.get_last_goal("123").unwrap().as_deref(), Some("a, b"));
    }

    #[test]
    fn test_concurrent_updates_do_not_lose_fields() {
        let (_dir, store) = open_temp();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        store.set("1", &Profile::new("Ada", format!("role-{}", i))).unwrap();
                    } else {
                        store.set_last_goal("1", &format!("goal-{}", i)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(store.get("1").unwrap().is_some());
        assert!(store.get_last_goal("1").unwrap().is_some());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryProfileStore::new();
        store.set("a", &Profile::new("Ada", "student")).unwrap();
        store.set_last_goal("a", "goals").unwrap();
        assert_eq!(store.list_users().unwrap(), vec!["a".to_string()]);

        store.delete("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get_last_goal("a").unwrap(), None);
    }
}
