use super::StorageBackend;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed storage: one JSON file per key under a data directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open the default per-user store location.
    pub fn open_default() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| Error::Storage("no data directory available".to_string()))?;
        Self::new(base.join(super::keys::APP))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys follow the `<app>-<entity>` convention and are already safe
        // path components.
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<()> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        assert_eq!(store.get("showdeck-likes").unwrap(), None);
        store.set("showdeck-likes", "[]").unwrap();
        assert_eq!(store.get("showdeck-likes").unwrap().as_deref(), Some("[]"));

        store.remove("showdeck-likes").unwrap();
        assert_eq!(store.get("showdeck-likes").unwrap(), None);
    }

    #[test]
    fn test_overwrite_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        store.set("showdeck-user", r#"{"username":"a"}"#).unwrap();
        store.set("showdeck-user", r#"{"username":"b"}"#).unwrap();
        assert_eq!(
            store.get("showdeck-user").unwrap().as_deref(),
            Some(r#"{"username":"b"}"#)
        );
    }

    #[test]
    fn test_clear_removes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        store.set("showdeck-likes", "[]").unwrap();
        store.set("showdeck-user", "{}").unwrap();
        store.clear().unwrap();

        assert_eq!(store.get("showdeck-likes").unwrap(), None);
        assert_eq!(store.get("showdeck-user").unwrap(), None);
    }
}
