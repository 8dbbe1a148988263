//! # Key-value persistence
//! The history only needs `get / set / remove` on string values. Two
//! implementations ship: an in-memory map (tests, ephemeral runs) and a
//! directory of JSON files (one file per key).

use anyhow::{Context, Result};
use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
};

/// Minimal persistence contract. Every `set` replaces the whole value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Type-erased store so the HTTP layer can pick a backend at startup.
pub type DynStore = Box<dyn KeyValueStore + Send>;

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating store dir {}", self.dir.display()))?;
        let path = self.path_for(key);
        // Write-then-rename so readers never see a half-written list.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basics() {
        let mut s = MemoryStore::new();
        assert_eq!(s.get("k").unwrap(), None);
        s.set("k", "v1").unwrap();
        s.set("k", "v2").unwrap();
        assert_eq!(s.get("k").unwrap().as_deref(), Some("v2"));
        s.remove("k").unwrap();
        s.remove("k").unwrap();
        assert!(!s.contains("k"));
    }

    #[test]
    fn file_store_creates_dir_and_replaces_values() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = FileStore::new(tmp.path().join("nested/history"));
        assert_eq!(s.get("pastAnalyses").unwrap(), None);

        s.set("pastAnalyses", "[1]").unwrap();
        s.set("pastAnalyses", "[2]").unwrap();
        assert_eq!(s.get("pastAnalyses").unwrap().as_deref(), Some("[2]"));
        assert!(s.path_for("pastAnalyses").exists());

        s.remove("pastAnalyses").unwrap();
        assert!(!s.path_for("pastAnalyses").exists());
        s.remove("pastAnalyses").unwrap();
    }

    #[test]
    fn boxed_store_delegates() {
        let mut s: DynStore = Box::new(MemoryStore::new());
        s.set("a", "b").unwrap();
        assert_eq!(s.get("a").unwrap().as_deref(), Some("b"));
    }
}
