//! Persisted dish name → local image path mapping.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use platepic_common::PlatepicError;
use tracing::{info, warn};

pub struct CacheStore {
    /// Mapping values are relative to this directory.
    root: PathBuf,
    path: PathBuf,
    mapping: BTreeMap<String, String>,
}

impl CacheStore {
    /// Load the mapping at `path`. A missing file is an empty mapping; an
    /// unparseable one is replaced by an empty mapping with a warning.
    pub fn load(root: &Path, path: &Path) -> Self {
        let mapping = match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(mapping) => mapping,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Mapping file unreadable, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Mapping file unreadable, starting empty");
                BTreeMap::new()
            }
        };

        info!(path = %path.display(), entries = mapping.len(), "Loaded image mapping");
        Self {
            root: root.to_path_buf(),
            path: path.to_path_buf(),
            mapping,
        }
    }

    /// True when the name is mapped and the mapped file is still on disk.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.get(name)
            .map(|rel| self.root.join(rel).is_file())
            .unwrap_or(false)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.mapping.get(name).map(String::as_str)
    }

    pub fn put(&mut self, name: &str, rel_path: &str) {
        self.mapping.insert(name.to_string(), rel_path.to_string());
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole mapping, pretty-printed, replacing the file.
    pub fn flush(&self) -> Result<(), PlatepicError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.mapping)
            .map_err(|e| PlatepicError::Store(e.to_string()))?;
        std::fs::write(&self.path, json + "\n")?;
        info!(path = %self.path.display(), size = self.mapping.len(), "Image mapping saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::load(dir.path(), &dir.path().join("images.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("images.json");
        std::fs::write(&path, "{ \"麻婆豆腐\": ").unwrap();

        let store = CacheStore::load(dir.path(), &path);
        assert!(store.is_empty());
    }

    #[test]
    fn hit_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("assets/images")).unwrap();
        std::fs::write(dir.path().join("assets/images/叉烧.jpg"), b"jpg").unwrap();

        let mut store = CacheStore::load(dir.path(), &dir.path().join("images.json"));
        store.put("叉烧", "assets/images/叉烧.jpg");
        store.put("东坡肉", "assets/images/东坡肉.jpg");

        assert!(store.is_resolved("叉烧"));
        assert!(!store.is_resolved("东坡肉"), "dangling entry is a miss");
        assert!(!store.is_resolved("佛跳墙"));
    }

    #[test]
    fn flush_keeps_untouched_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes/images.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "东坡肉": "assets/images/东坡肉.jpg" }"#).unwrap();

        let mut store = CacheStore::load(dir.path(), &path);
        store.put("叉烧", "assets/images/叉烧.png");
        store.flush().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"叉烧\""), "non-ASCII is written unescaped");
        let saved: BTreeMap<String, String> = serde_json::from_str(&text).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved["东坡肉"], "assets/images/东坡肉.jpg");
        assert_eq!(saved["叉烧"], "assets/images/叉烧.png");
    }

    #[test]
    fn flush_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/images.json");
        CacheStore::load(dir.path(), &path).flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "{}");
    }
}
