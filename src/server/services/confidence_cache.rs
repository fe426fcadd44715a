use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::server::models::ConfidenceRecord;

/// Full contents of the cache file, keyed by `"{repo}:{issue_number}"`.
pub type ConfidenceScores = BTreeMap<String, ConfidenceRecord>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to access confidence cache {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Confidence cache {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to replace confidence cache: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("Confidence cache task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// JSON-file backed store of confidence records.
///
/// Every write replaces the whole file through a temp file and rename, and
/// read-modify-write cycles are serialized by an in-process lock.
#[derive(Debug)]
pub struct ConfidenceCache {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ConfidenceCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the whole cache. A missing file is an empty cache.
    pub async fn load(&self) -> Result<ConfidenceScores, CacheError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No confidence cache at {}", self.path.display());
                return Ok(ConfidenceScores::new());
            }
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| CacheError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrites the cache file with `scores`.
    pub async fn save(&self, scores: &ConfidenceScores) -> Result<(), CacheError> {
        let contents = serde_json::to_vec_pretty(scores).map_err(|source| CacheError::Json {
            path: self.path.clone(),
            source,
        })?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &contents)).await?
    }

    pub async fn get(&self, key: &str) -> Result<Option<ConfidenceRecord>, CacheError> {
        Ok(self.load().await?.remove(key))
    }

    /// Stores `record` under `key` unless a record is already there, and
    /// returns whichever record the cache holds afterwards.
    pub async fn insert_if_absent(
        &self,
        key: &str,
        record: ConfidenceRecord,
    ) -> Result<ConfidenceRecord, CacheError> {
        let _guard = self.write_lock.lock().await;

        let mut scores = self.load().await?;
        if let Some(existing) = scores.get(key) {
            debug!("Confidence record for {} already cached", key);
            return Ok(existing.clone());
        }

        scores.insert(key.to_string(), record.clone());
        self.save(&scores).await?;
        info!(
            "Cached confidence score {} for {}",
            record.confidence_score, key
        );

        Ok(record)
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), CacheError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let io_err = |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
    tmp.write_all(contents).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path)?;

    Ok(())
}
