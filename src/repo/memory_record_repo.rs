use std::sync::Mutex;

use async_trait::async_trait;

use crate::constants::MESSAGE_ATIVIDADE_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::model::{Atividade, AtividadeFields, AtividadeId, Attachment, AttachmentChange};
use crate::repo::RecordStore;

/// Process-local records, lost on restart.
pub struct MemoryRecordRepo {
    inner: Mutex<Records>,
}

struct Records {
    next_id: AtividadeId,
    items: Vec<Atividade>,
}

impl MemoryRecordRepo {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Records {
                next_id: 1,
                items: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Records>> {
        self.inner
            .lock()
            .map_err(|_| AppError::internal("record store lock poisoned"))
    }
}

impl Default for MemoryRecordRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found() -> AppError {
    AppError::not_found(MESSAGE_ATIVIDADE_NOT_FOUND)
}

#[async_trait]
impl RecordStore for MemoryRecordRepo {
    async fn list(&self) -> Result<Vec<Atividade>> {
        Ok(self.lock()?.items.clone())
    }

    async fn get(&self, id: AtividadeId) -> Result<Atividade> {
        self.lock()?
            .items
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create(&self, fields: AtividadeFields, attachment: Option<Attachment>) -> Result<Atividade> {
        let mut records = self.lock()?;
        let id = records.next_id;
        records.next_id += 1;
        let atividade = fields.into_atividade(id, attachment);
        records.items.push(atividade.clone());
        log::info!("## Created atividade {}", id);
        Ok(atividade)
    }

    async fn update(
        &self,
        id: AtividadeId,
        fields: AtividadeFields,
        attachment: AttachmentChange,
    ) -> Result<(Atividade, Option<Attachment>)> {
        let mut records = self.lock()?;
        let atividade = records
            .items
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(not_found)?;
        let released = fields.apply_to(atividade, attachment);
        log::info!("## Updated atividade {}", id);
        Ok((atividade.clone(), released))
    }

    async fn delete(&self, id: AtividadeId) -> Result<Atividade> {
        let mut records = self.lock()?;
        let index = records
            .items
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(not_found)?;
        log::info!("## Deleted atividade {}", id);
        Ok(records.items.remove(index))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
