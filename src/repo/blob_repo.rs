use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::constants::MESSAGE_FILE_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::model::{Blob, BlobBody, BlobId};
use crate::repo::{new_blob_id, BlobStore};

/// Blob content as files under `dir`, metadata in the `blobs` table.
/// Files are named by blob id only, so client filenames never reach the filesystem.
pub struct DiskBlobRepo {
    pool: SqlitePool,
    dir: PathBuf,
}

impl DiskBlobRepo {
    pub async fn new(pool: SqlitePool, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { pool, dir })
    }
}

async fn write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut f = fs::File::create(path).await?;
    f.write_all(content).await?;
    f.flush().await
}

#[async_trait]
impl BlobStore for DiskBlobRepo {
    async fn store(&self, content: Bytes, filename: &str, content_type: &str) -> Result<BlobId> {
        let id = new_blob_id();
        let filepath = self.dir.join(&id);
        log::info!("## Writing blob {} to {}", id, filepath.display());

        if let Err(e) = write_file(&filepath, &content).await {
            // never leave a partial file behind
            let _ = fs::remove_file(&filepath).await;
            return Err(e.into());
        }

        let result = sqlx::query(
            "INSERT INTO blobs (id, filename, content_type, size, filepath) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(filename)
        .bind(content_type)
        .bind(content.len() as i64)
        .bind(filepath.to_string_lossy().into_owned())
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            // rm file if metadata insertion fails
            let _ = fs::remove_file(&filepath).await;
            return Err(e.into());
        }
        Ok(id)
    }

    async fn retrieve(&self, id: &str) -> Result<Blob> {
        let row = sqlx::query("SELECT id, filename, content_type, size, filepath FROM blobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(MESSAGE_FILE_NOT_FOUND))?;

        let filepath = PathBuf::from(row.try_get::<String, _>("filepath")?);
        if !fs::try_exists(&filepath).await? {
            log::warn!("## Blob {} has metadata but no file at {}", id, filepath.display());
            return Err(AppError::not_found(MESSAGE_FILE_NOT_FOUND));
        }

        Ok(Blob {
            id: row.try_get("id")?,
            filename: row.try_get("filename")?,
            content_type: row.try_get("content_type")?,
            size: row.try_get::<i64, _>("size")? as u64,
            body: BlobBody::File(filepath),
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let filepath: String = sqlx::query("SELECT filepath FROM blobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(MESSAGE_FILE_NOT_FOUND))?
            .try_get("filepath")?;

        sqlx::query("DELETE FROM blobs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        match fs::remove_file(&filepath).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        log::info!("## Deleted blob {}", id);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "disk"
    }
}
