//! JSON file key-value store.
//!
//! [`JsonFileStore`] keeps every key in one JSON object on disk:
//!
//! ```json
//! {
//!   "rules": [{"from": "mispell", "to": "misspell", "ic": false, "mw": false, "sc": false}],
//!   "useDynamicMode": false,
//!   "dynamicTimeoutMs": 2000,
//!   "skipPreTags": false,
//!   "skipCodeTags": false
//! }
//! ```
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the original, so a crash mid-write never leaves a half-written file.
//! A missing file reads as an empty store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::preferences_store::{KeyValueStore, StorageError, StorageRecord};

pub struct JsonFileStore {
    path: PathBuf,
    // Serialises read-modify-write cycles issued through this handle.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<StorageRecord, StorageError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file absent, reading as empty");
                return Ok(StorageRecord::new());
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(StorageRecord::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StorageError::Corrupt {
                path: self.path.clone(),
                reason: "top-level value is not an object".to_string(),
            }),
            Err(e) => Err(StorageError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    async fn write_all(&self, record: &StorageRecord) -> Result<(), StorageError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::Io {
                path: dir.clone(),
                source,
            })?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store.json".to_string());
        let tmp = dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

        let content = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|source| StorageError::Io {
                path: tmp.clone(),
                source,
            })?;

        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::Io {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, defaults: StorageRecord) -> Result<StorageRecord, StorageError> {
        let mut stored = self.read_all().await?;
        Ok(defaults
            .into_iter()
            .map(|(key, default)| {
                let value = stored.remove(&key).unwrap_or(default);
                (key, value)
            })
            .collect())
    }

    async fn set(&self, record: StorageRecord) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut stored = self.read_all().await?;
        let keys = record.len();
        stored.extend(record);
        self.write_all(&stored).await?;
        info!(path = %self.path.display(), keys, "store file written");
        Ok(())
    }
}
