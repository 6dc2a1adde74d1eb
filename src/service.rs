use std::sync::Arc;

use crate::error::Result;
use crate::model::{
    Atividade, AtividadeDraft, AtividadeId, Attachment, AttachmentChange, Blob, Upload,
};
use crate::repo::{BlobStore, RecordStore};
use crate::utils::{parse_blob_id, stored_filename};

/// Record and blob stores behind one API, so HTML and JSON handlers share the
/// same validation and attachment bookkeeping.
#[derive(Clone)]
pub struct AtividadeService {
    records: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
}

impl AtividadeService {
    pub fn new(records: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        log::info!(
            "## Record store: {}, blob store: {}",
            records.backend(),
            blobs.backend()
        );
        Self { records, blobs }
    }

    pub async fn list(&self) -> Result<Vec<Atividade>> {
        self.records.list().await
    }

    pub async fn get(&self, id: AtividadeId) -> Result<Atividade> {
        self.records.get(id).await
    }

    /// Validates first; nothing is stored for a rejected draft.
    pub async fn create(&self, draft: AtividadeDraft, upload: Option<Upload>) -> Result<Atividade> {
        let fields = draft.validate()?;
        let attachment = match upload {
            Some(upload) => Some(self.store_upload(upload).await?),
            None => None,
        };
        let blob_id = attachment.as_ref().map(|a| a.blob_id.clone());

        match self.records.create(fields, attachment).await {
            Ok(atividade) => Ok(atividade),
            Err(e) => {
                if let Some(blob_id) = blob_id {
                    self.discard_blob(&blob_id).await;
                }
                Err(e)
            }
        }
    }

    /// Full replace of the scalar fields. Without an upload the current
    /// attachment is kept unless `remove_attachment` is set.
    pub async fn update(
        &self,
        id: AtividadeId,
        draft: AtividadeDraft,
        upload: Option<Upload>,
        remove_attachment: bool,
    ) -> Result<Atividade> {
        // 404 wins over 400, and both come before any blob is written
        self.records.get(id).await?;
        let fields = draft.validate()?;

        let change = match upload {
            Some(upload) => AttachmentChange::Replace(self.store_upload(upload).await?),
            None if remove_attachment => AttachmentChange::Remove,
            None => AttachmentChange::Keep,
        };
        let new_blob = match &change {
            AttachmentChange::Replace(a) => Some(a.blob_id.clone()),
            _ => None,
        };

        match self.records.update(id, fields, change).await {
            Ok((atividade, released)) => {
                if let Some(old) = released {
                    self.discard_blob(&old.blob_id).await;
                }
                Ok(atividade)
            }
            Err(e) => {
                if let Some(blob_id) = new_blob {
                    self.discard_blob(&blob_id).await;
                }
                Err(e)
            }
        }
    }

    /// Deletes the attachment's blob first, then the record. Blob failures
    /// never block the record deletion.
    pub async fn delete(&self, id: AtividadeId) -> Result<()> {
        let atividade = self.records.get(id).await?;
        if let Some(attachment) = &atividade.attachment {
            self.discard_blob(&attachment.blob_id).await;
        }
        self.records.delete(id).await?;
        Ok(())
    }

    pub async fn download(&self, file_id: &str) -> Result<Blob> {
        let blob_id = parse_blob_id(file_id)?;
        self.blobs.retrieve(&blob_id).await
    }

    async fn store_upload(&self, upload: Upload) -> Result<Attachment> {
        let blob_id = self
            .blobs
            .store(upload.content, &upload.original_name, &upload.content_type)
            .await?;
        Ok(Attachment {
            blob_id,
            filename: stored_filename(&upload.original_name),
            original_name: upload.original_name,
            mime_type: upload.content_type,
        })
    }

    async fn discard_blob(&self, blob_id: &str) {
        if let Err(e) = self.blobs.delete(blob_id).await {
            log::warn!("## Could not delete blob {}: {}", blob_id, e);
        }
    }
}
