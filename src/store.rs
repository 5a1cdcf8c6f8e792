use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Durable read/write failure on the reply store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write reply store at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode reply store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persisted trigger → reply map.
///
/// Triggers are lower-cased before storage and lookup. Every mutation is
/// written through to disk before it returns; on a failed write the
/// in-memory map is rolled back so memory and disk never disagree.
pub struct ReplyStore {
    path: PathBuf,
    entries: Mutex<IndexMap<String, String>>,
}

impl ReplyStore {
    /// Load the store from `path`.
    ///
    /// A missing, unreadable, or corrupt file is not an error: the store
    /// starts empty and the file is rewritten immediately.
    pub async fn load(path: &Path) -> Result<Self, PersistenceError> {
        let (entries, heal) = match tokio::fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice::<IndexMap<String, String>>(&bytes) {
                Ok(map) => (map, false),
                Err(e) => {
                    warn!(
                        "Corrupt reply store at {}, starting fresh: {}",
                        path.display(),
                        e
                    );
                    (IndexMap::new(), true)
                }
            },
            Err(e) => {
                info!("No reply store at {}, starting fresh: {}", path.display(), e);
                (IndexMap::new(), true)
            }
        };

        let store = Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        };

        if heal {
            if let Some(parent) = store.path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|source| PersistenceError::Write {
                            path: store.path.clone(),
                            source,
                        })?;
                }
            }
            let entries = store.entries.lock().await;
            store.persist(&entries).await?;
        }

        Ok(store)
    }

    /// Stored reply for the exact lower-cased text, if any.
    pub async fn lookup(&self, text: &str) -> Option<String> {
        self.entries.lock().await.get(&text.to_lowercase()).cloned()
    }

    /// Insert or overwrite a trigger, writing through to disk.
    pub async fn upsert(&self, trigger: &str, reply: &str) -> Result<(), PersistenceError> {
        let key = trigger.to_lowercase();
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(key.clone(), reply.to_string());
        if let Err(e) = self.persist(&entries).await {
            match previous {
                Some(old) => {
                    entries.insert(key, old);
                }
                None => {
                    entries.shift_remove(&key);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove a trigger, writing through to disk. Returns whether the
    /// trigger existed; an absent trigger is not an error.
    pub async fn delete(&self, trigger: &str) -> Result<bool, PersistenceError> {
        let normalized = trigger.to_lowercase();
        let mut entries = self.entries.lock().await;
        let Some((index, key, value)) = entries.shift_remove_full(&normalized) else {
            return Ok(false);
        };
        if let Err(e) = self.persist(&entries).await {
            entries.shift_insert(index, key, value);
            return Err(e);
        }
        Ok(true)
    }

    /// All entries in insertion order.
    pub async fn list(&self) -> Vec<(String, String)> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|(trigger, reply)| (trigger.clone(), reply.clone()))
            .collect()
    }

    async fn persist(&self, entries: &IndexMap<String, String>) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|source| PersistenceError::Write {
                path: self.path.clone(),
                source,
            })
    }
}
