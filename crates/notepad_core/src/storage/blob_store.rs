//! Key/value blob store contract and in-process implementations.
//!
//! # Responsibility
//! - Define the synchronous string-keyed store the note snapshot lives in.
//! - Provide memory and directory-backed stores.
//!
//! # Invariants
//! - `save` either replaces the whole value for a key or fails; no partial
//!   writes are observable through `load`.
//! - Keys are validated before touching any backend.

use crate::db::DbError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

static STORE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]{1,128}$").expect("valid store key regex"));

pub type StoreResult<T> = Result<T, StoreError>;

/// Blob store failure.
#[derive(Debug)]
pub enum StoreError {
    /// Write would exceed the configured capacity.
    QuotaExceeded { required: usize, limit: usize },
    /// Key is empty or contains characters outside `[A-Za-z0-9_.-]`.
    InvalidKey(String),
    Io(io::Error),
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded { required, limit } => write!(
                f,
                "storage quota exceeded: {required} bytes required, limit is {limit}"
            ),
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::InvalidKey(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string-keyed blob store.
pub trait BlobStore {
    /// Returns the stored value, or `None` when the key was never written.
    fn load(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn save(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).save(key, value)
    }
}

/// Validates a store key against the portable key alphabet.
pub fn validate_key(key: &str) -> StoreResult<()> {
    if STORE_KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Process-local store with an optional byte quota.
///
/// The quota counts key and value bytes across all entries, which is how
/// browser local storage accounts for its limit.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: RefCell<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes once `quota_bytes` would be exceeded.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Writes a raw value without quota checks. Useful to seed corrupt data.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.borrow_mut().insert(key.into(), value.into());
    }

    /// Total bytes currently held.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        if let Some(limit) = self.quota_bytes {
            let replaced = self
                .entries
                .borrow()
                .get(key)
                .map_or(0, |previous| key.len() + previous.len());
            let required = self.used_bytes() - replaced + key.len() + value.len();
            if required > limit {
                return Err(StoreError::QuotaExceeded { required, limit });
            }
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Opens a store rooted at `dir`, creating the directory when missing.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        // Rename is atomic on the same filesystem, so readers never see a
        // half-written snapshot.
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_key, BlobStore, FileBlobStore, MemoryBlobStore, StoreError};

    #[test]
    fn validate_key_rejects_path_like_values() {
        assert!(validate_key("notes_app_v1").is_ok());
        assert!(matches!(
            validate_key("../escape"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(validate_key("").is_err());
    }

    #[test]
    fn memory_store_quota_counts_replaced_value_once() {
        let store = MemoryBlobStore::with_quota(12);
        store.save("k", "12345").unwrap();
        store.save("k", "1234567890").unwrap();

        let err = store.save("k", "12345678901234").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { limit: 12, .. }));
        assert_eq!(store.load("k").unwrap().as_deref(), Some("1234567890"));
    }

    #[test]
    fn file_store_returns_none_for_unknown_key_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::open(dir.path().join("data")).unwrap();
        assert_eq!(store.load("notes").unwrap(), None);

        store.save("notes", "[1]").unwrap();
        store.save("notes", "[2]").unwrap();
        assert_eq!(store.load("notes").unwrap().as_deref(), Some("[2]"));
        assert!(!store.dir().join(".notes.json.tmp").exists());
    }
}
