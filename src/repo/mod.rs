mod atividade_repo;
mod blob_repo;
mod memory_blob_repo;
mod memory_record_repo;

pub use atividade_repo::SqliteRecordRepo;
pub use blob_repo::DiskBlobRepo;
pub use memory_blob_repo::MemoryBlobRepo;
pub use memory_record_repo::MemoryRecordRepo;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::model::{Atividade, AtividadeFields, AtividadeId, Attachment, AttachmentChange, Blob, BlobId};

/// Assignment records keyed by id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Snapshot of all records in insertion order.
    async fn list(&self) -> Result<Vec<Atividade>>;

    async fn get(&self, id: AtividadeId) -> Result<Atividade>;

    /// Assigns a fresh id. Ids are never handed out twice, even after a delete.
    async fn create(&self, fields: AtividadeFields, attachment: Option<Attachment>) -> Result<Atividade>;

    /// Replaces the record's fields and returns it together with the
    /// attachment it no longer references.
    async fn update(
        &self,
        id: AtividadeId,
        fields: AtividadeFields,
        attachment: AttachmentChange,
    ) -> Result<(Atividade, Option<Attachment>)>;

    /// Removes the record and returns it.
    async fn delete(&self, id: AtividadeId) -> Result<Atividade>;

    fn backend(&self) -> &'static str;
}

/// Attachment content keyed by a store-generated id.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, content: Bytes, filename: &str, content_type: &str) -> Result<BlobId>;

    async fn retrieve(&self, id: &str) -> Result<Blob>;

    async fn delete(&self, id: &str) -> Result<()>;

    fn backend(&self) -> &'static str;
}

fn new_blob_id() -> BlobId {
    uuid::Uuid::new_v4().to_string()
}
