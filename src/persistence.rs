//! Durable side channel for announcement read-state.
//!
//! The rest of the store lives in memory only; this is the one piece of state
//! that survives building a fresh store over the same backing.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::model::{AnnouncementId, UserId};
use crate::AppResult;

pub const ANNOUNCEMENT_READS_KEY: &str = "groupin_announcement_reads";

/// String key-value storage in the manner of browser local storage.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> AppResult<()>;
}

/// In-memory backing. Clones share entries, so two stores built over clones
/// of one `MemoryKv` see each other's writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> AppResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// A single JSON object file mapping keys to string values.
#[derive(Debug, Clone)]
pub struct JsonFileKv {
    path: PathBuf,
}

impl JsonFileKv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> AppResult<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl KeyValueStore for JsonFileKv {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> AppResult<()> {
        let mut entries = self.read_all().unwrap_or_else(|err| {
            warn!(path = %self.path.display(), "discarding unreadable key-value file: {err}");
            HashMap::new()
        });
        entries.insert(key.to_owned(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(&entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Whose read-state a store reflects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Viewer {
    /// The single local client.
    #[default]
    Local,
    User(UserId),
}

impl Viewer {
    fn storage_key(&self) -> String {
        match self {
            Viewer::Local => ANNOUNCEMENT_READS_KEY.to_owned(),
            Viewer::User(user_id) => format!("{ANNOUNCEMENT_READS_KEY}:{user_id}"),
        }
    }
}

/// Set of announcement ids one viewer has read, stored as a JSON array of
/// strings under the viewer's key.
pub struct AnnouncementReads {
    kv: Box<dyn KeyValueStore>,
    key: String,
}

impl AnnouncementReads {
    pub fn new(kv: impl KeyValueStore + 'static, viewer: &Viewer) -> Self {
        Self {
            kv: Box::new(kv),
            key: viewer.storage_key(),
        }
    }

    /// Never fails: a missing, unreadable or corrupted value reads as empty.
    pub fn load(&self) -> HashSet<AnnouncementId> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashSet::new(),
            Err(err) => {
                warn!(key = %self.key, "announcement reads unavailable: {err}");
                return HashSet::new();
            }
        };
        match serde_json::from_str::<Vec<AnnouncementId>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(err) => {
                warn!(key = %self.key, "ignoring corrupted announcement reads: {err}");
                HashSet::new()
            }
        }
    }

    /// Appends `id` if absent. Failures are logged and otherwise swallowed.
    pub fn record_read(&mut self, id: &AnnouncementId) {
        if let Err(err) = self.try_record_read(id) {
            warn!(key = %self.key, %id, "could not persist announcement read: {err}");
        }
    }

    fn try_record_read(&mut self, id: &AnnouncementId) -> AppResult<()> {
        let mut ids = match self.kv.get(&self.key) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<AnnouncementId>>(&raw).unwrap_or_default(),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(key = %self.key, "overwriting unreadable announcement reads: {err}");
                Vec::new()
            }
        };
        if ids.contains(id) {
            return Ok(());
        }
        ids.push(id.clone());
        self.kv.set(&self.key, serde_json::to_string(&ids)?)?;
        debug!(key = %self.key, %id, "announcement read recorded");
        Ok(())
    }
}

impl fmt::Debug for AnnouncementReads {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AnnouncementReads").field("key", &self.key).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_value_loads_empty() {
        let reads = AnnouncementReads::new(MemoryKv::new(), &Viewer::Local);
        assert!(reads.load().is_empty());
    }

    #[test]
    fn corrupted_value_loads_empty() {
        let mut kv = MemoryKv::new();
        kv.set(ANNOUNCEMENT_READS_KEY, "{not json".to_owned()).unwrap();
        let reads = AnnouncementReads::new(kv, &Viewer::Local);
        assert!(reads.load().is_empty());
    }

    #[test]
    fn records_are_stored_as_json_array_without_duplicates() {
        let kv = MemoryKv::new();
        let mut reads = AnnouncementReads::new(kv.clone(), &Viewer::Local);
        reads.record_read(&AnnouncementId::from("ann-1"));
        reads.record_read(&AnnouncementId::from("ann-1"));
        reads.record_read(&AnnouncementId::from("ann-2"));
        assert_eq!(
            kv.get(ANNOUNCEMENT_READS_KEY).unwrap().as_deref(),
            Some(r#"["ann-1","ann-2"]"#)
        );
    }

    #[test]
    fn recording_over_corrupted_value_starts_fresh() {
        let mut kv = MemoryKv::new();
        kv.set(ANNOUNCEMENT_READS_KEY, "42".to_owned()).unwrap();
        let mut reads = AnnouncementReads::new(kv, &Viewer::Local);
        reads.record_read(&AnnouncementId::from("ann-9"));
        assert_eq!(reads.load(), HashSet::from([AnnouncementId::from("ann-9")]));
    }

    #[test]
    fn viewers_are_kept_apart() {
        let kv = MemoryKv::new();
        let mut alice = AnnouncementReads::new(kv.clone(), &Viewer::User(UserId::from("user-1")));
        alice.record_read(&AnnouncementId::from("ann-1"));
        let local = AnnouncementReads::new(kv.clone(), &Viewer::Local);
        assert!(local.load().is_empty());
        assert!(kv.get("groupin_announcement_reads:user-1").unwrap().is_some());
    }

    #[test]
    fn file_backing_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reads.json");
        let mut reads = AnnouncementReads::new(JsonFileKv::new(&path), &Viewer::Local);
        reads.record_read(&AnnouncementId::from("ann-2"));

        let reopened = AnnouncementReads::new(JsonFileKv::new(&path), &Viewer::Local);
        assert_eq!(reopened.load(), HashSet::from([AnnouncementId::from("ann-2")]));
    }

    #[test]
    fn unparsable_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.json");
        fs::write(&path, "garbage").unwrap();
        let reads = AnnouncementReads::new(JsonFileKv::new(&path), &Viewer::Local);
        assert!(reads.load().is_empty());
    }

    #[test]
    fn recording_over_unparsable_file_rewrites_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.json");
        fs::write(&path, "garbage").unwrap();
        let mut reads = AnnouncementReads::new(JsonFileKv::new(&path), &Viewer::Local);
        reads.record_read(&AnnouncementId::from("ann-1"));

        let reopened = AnnouncementReads::new(JsonFileKv::new(&path), &Viewer::Local);
        assert_eq!(reopened.load(), HashSet::from([AnnouncementId::from("ann-1")]));
        assert_ne!(fs::read_to_string(&path).unwrap(), "garbage");
    }
}
