use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::constants::MESSAGE_FILE_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::model::{Blob, BlobBody, BlobId};
use crate::repo::{new_blob_id, BlobStore};

struct StoredBlob {
    filename: String,
    content_type: String,
    content: Bytes,
}

#[derive(Default)]
pub struct MemoryBlobRepo {
    blobs: Mutex<HashMap<BlobId, StoredBlob>>,
}

impl MemoryBlobRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<BlobId, StoredBlob>>> {
        self.blobs
            .lock()
            .map_err(|_| AppError::internal("blob store lock poisoned"))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or(0)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobRepo {
    async fn store(&self, content: Bytes, filename: &str, content_type: &str) -> Result<BlobId> {
        let id = new_blob_id();
        log::info!("## Storing blob {} ({} bytes)", id, content.len());
        self.lock()?.insert(
            id.clone(),
            StoredBlob {
                filename: filename.to_string(),
                content_type: content_type.to_string(),
                content,
            },
        );
        Ok(id)
    }

    async fn retrieve(&self, id: &str) -> Result<Blob> {
        let blobs = self.lock()?;
        let stored = blobs
            .get(id)
            .ok_or_else(|| AppError::not_found(MESSAGE_FILE_NOT_FOUND))?;
        Ok(Blob {
            id: id.to_string(),
            filename: stored.filename.clone(),
            content_type: stored.content_type.clone(),
            size: stored.content.len() as u64,
            // Bytes clones share the buffer.
            body: BlobBody::Bytes(stored.content.clone()),
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self.lock()?.remove(id) {
            Some(_) => {
                log::info!("## Deleted blob {}", id);
                Ok(())
            }
            None => Err(AppError::not_found(MESSAGE_FILE_NOT_FOUND)),
        }
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
