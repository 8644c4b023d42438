//! Persistence for the working draft between CLI invocations.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;
use crate::schedule::ScheduleDraft;

/// Somewhere a draft can be kept between sessions.
pub trait ScheduleStore {
    /// The stored draft, or `None` when nothing has been saved.
    fn load(&self) -> Result<Option<ScheduleDraft>>;

    fn save(&self, draft: &ScheduleDraft) -> Result<()>;

    /// Forget the stored draft. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// Pretty-printed JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleStore for JsonFileStore {
    fn load(&self) -> Result<Option<ScheduleDraft>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let draft = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), "draft loaded");
        Ok(Some(draft))
    }

    fn save(&self, draft: &ScheduleDraft) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(draft)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), "draft saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-process store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    draft: Mutex<Option<ScheduleDraft>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<ScheduleDraft>> {
        self.draft.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ScheduleStore for MemoryStore {
    fn load(&self) -> Result<Option<ScheduleDraft>> {
        Ok(self.slot().clone())
    }

    fn save(&self, draft: &ScheduleDraft) -> Result<()> {
        *self.slot() = Some(draft.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Meeting, MeetingType};

    fn sample() -> ScheduleDraft {
        let mut m = Meeting::new("Seminar", MeetingType::Regular);
        m.id = "m1".to_string();
        ScheduleDraft {
            meetings: vec![m],
            ..ScheduleDraft::default()
        }
    }

    #[test]
    fn file_store_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("draft.json"));
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn file_store_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("draft.json"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(JsonFileStore::new(path).load().is_err());
    }

    #[test]
    fn memory_store_behaves_like_file_store() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
