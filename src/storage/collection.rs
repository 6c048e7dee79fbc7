// src/storage/collection.rs

use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tokio::{
    io::AsyncWriteExt,
    sync::{Mutex, MutexGuard},
};

use super::StoreError;

/// An append-only collection persisted as one pretty-printed JSON array file.
///
/// Writers are serialized through an async mutex held across the whole
/// read-append-write cycle. Each write goes to a temp file that is renamed
/// over the target, so readers only ever see a complete array.
pub struct JsonCollection<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _rows: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _rows: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every row. A missing file is an empty collection; an unparsable
    /// one is an error, never silently treated as empty.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| StoreError::corrupt(&self.path, e))
    }

    /// Takes the collection's write lock. Hold several writers in a fixed
    /// order to update more than one collection as a unit.
    pub async fn writer(&self) -> CollectionWriter<'_, T> {
        CollectionWriter {
            collection: self,
            _guard: self.write_lock.lock().await,
        }
    }

    /// Appends `rows` and returns the new row count.
    pub async fn append(&self, rows: Vec<T>) -> Result<usize, StoreError> {
        self.writer().await.append(rows).await
    }

    async fn write_all(&self, rows: &[T]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| StoreError::io(dir, e))?;
            }
        }

        let payload =
            serde_json::to_vec_pretty(rows).map_err(|e| StoreError::corrupt(&self.path, e))?;

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = tokio::fs::File::create(&tmp_path)
                .await
                .map_err(|e| StoreError::io(&tmp_path, e))?;
            file.write_all(&payload)
                .await
                .map_err(|e| StoreError::io(&tmp_path, e))?;
            file.sync_all()
                .await
                .map_err(|e| StoreError::io(&tmp_path, e))?;
        }

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))
    }
}

/// Exclusive append access to a [`JsonCollection`].
pub struct CollectionWriter<'a, T> {
    collection: &'a JsonCollection<T>,
    _guard: MutexGuard<'a, ()>,
}

impl<T> CollectionWriter<'_, T>
where
    T: Serialize + DeserializeOwned,
{
    pub async fn append(&mut self, rows: Vec<T>) -> Result<usize, StoreError> {
        let mut existing = self.collection.load().await?;
        existing.extend(rows);
        self.collection.write_all(&existing).await?;
        Ok(existing.len())
    }
}
