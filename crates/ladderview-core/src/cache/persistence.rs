use std::path::{Path, PathBuf};

use super::errors::CacheError;
use super::store::KeyValueStore;
use crate::config::loading::ENV_CACHE_DIR;

/// File-backed store: one JSON file per key under a cache directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store at `LADDERVIEW_CACHE_DIR`, or `~/.ladderview/cache`.
    pub fn at_default_location() -> Self {
        Self::new(default_cache_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

/// Keys become file names. `[A-Za-z0-9-]` is kept; every other byte is
/// written as `_xx` (lowercase hex), so distinct keys never share a file.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("_{:02x}", byte));
        }
    }
    encoded
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::ReadFailed {
                key: key.to_string(),
                message: format!("{} ({})", e, path.display()),
            }),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::WriteFailed {
            key: key.to_string(),
            message: format!(
                "Failed to create directory ({}): {}",
                self.dir.display(),
                e
            ),
        })?;

        // Write-then-rename so readers never see a partial entry.
        let path = self.entry_path(key);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, value).map_err(|e| CacheError::WriteFailed {
            key: key.to_string(),
            message: format!("{} ({})", e, tmp_path.display()),
        })?;
        std::fs::rename(&tmp_path, &path).map_err(|e| CacheError::WriteFailed {
            key: key.to_string(),
            message: format!("{} ({})", e, path.display()),
        })?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::WriteFailed {
                key: key.to_string(),
                message: format!("{} ({})", e, path.display()),
            }),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    // Allow override via env var for testing.
    if let Ok(path_str) = std::env::var(ENV_CACHE_DIR)
        && !path_str.is_empty()
    {
        return PathBuf::from(path_str);
    }

    match dirs::home_dir() {
        Some(home) => home.join(".ladderview").join("cache"),
        None => {
            tracing::error!(
                event = "core.cache.home_dir_not_found",
                fallback = ".",
                "Could not determine home directory - using current directory as fallback"
            );
            PathBuf::from(".").join(".ladderview").join("cache")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{CACHE_DIR_ENV_LOCK, CacheDirEnvGuard};
    use tempfile::TempDir;

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("cache"));

        assert_eq!(store.get("ladderview-42").unwrap(), None);
        store.put("ladderview-42", r#"{"a":1}"#).unwrap();
        assert_eq!(
            store.get("ladderview-42").unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
        assert!(temp_dir.path().join("cache").join("ladderview-42.json").exists());

        store.remove("ladderview-42").unwrap();
        assert_eq!(store.get("ladderview-42").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites_and_leaves_no_tmp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.put("k", "one").unwrap();
        store.put("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert!(!temp_dir.path().join("k.json.tmp").exists());
    }

    #[test]
    fn test_keys_cannot_escape_directory() {
        assert_eq!(
            encode_key("../../etc/passwd"),
            "_2e_2e_2f_2e_2e_2fetc_2fpasswd"
        );
        assert_eq!(encode_key("lv-12345"), "lv-12345");
    }

    #[test]
    fn test_similar_keys_use_distinct_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert_ne!(encode_key("lv-a/b"), encode_key("lv-a_b"));
        assert_ne!(encode_key("lv-a.b"), encode_key("lv-a_2eb"));

        store.put("lv-a/b", "slash").unwrap();
        assert_eq!(store.get("lv-a_b").unwrap(), None);
        store.put("lv-a_b", "underscore").unwrap();
        assert_eq!(store.get("lv-a/b").unwrap().as_deref(), Some("slash"));
        assert_eq!(store.get("lv-a_b").unwrap().as_deref(), Some("underscore"));
    }

    #[test]
    fn test_unreadable_entry_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        // A directory where a file is expected causes a read error
        std::fs::create_dir_all(temp_dir.path().join("k.json")).unwrap();

        assert!(matches!(
            store.get("k"),
            Err(CacheError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_default_dir_env_override() {
        let _lock = CACHE_DIR_ENV_LOCK.lock().unwrap();

        let temp_dir = TempDir::new().unwrap();
        let _guard = CacheDirEnvGuard::new(temp_dir.path());

        let store = FileStore::at_default_location();
        assert_eq!(store.dir(), temp_dir.path());
    }

    #[test]
    fn test_default_dir_without_override() {
        let _lock = CACHE_DIR_ENV_LOCK.lock().unwrap();

        // SAFETY: We hold CACHE_DIR_ENV_LOCK to serialize test access
        unsafe { std::env::remove_var(ENV_CACHE_DIR) };

        let dir = default_cache_dir();
        assert!(dir.ends_with("cache"));
        assert!(dir.to_string_lossy().contains(".ladderview"));
    }
}
