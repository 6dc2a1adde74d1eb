use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::constants::{DATE_FORMAT, MESSAGE_ATIVIDADE_NOT_FOUND};
use crate::error::{AppError, Result};
use crate::model::{Atividade, AtividadeFields, AtividadeId, Attachment, AttachmentChange};
use crate::repo::RecordStore;

const SELECT_ATIVIDADE: &str = "SELECT id, subject, description, grade, due_date, \
     attachment_blob_id, attachment_filename, attachment_original_name, attachment_mime_type \
     FROM atividades";

/// Records persisted in the `atividades` table.
pub struct SqliteRecordRepo {
    pool: SqlitePool,
}

impl SqliteRecordRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: AtividadeId) -> Result<Option<Atividade>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_ATIVIDADE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| row_to_atividade(&row)).transpose()
    }
}

fn not_found() -> AppError {
    AppError::not_found(MESSAGE_ATIVIDADE_NOT_FOUND)
}

fn row_to_atividade(row: &SqliteRow) -> Result<Atividade> {
    let due_date = row
        .try_get::<Option<String>, _>("due_date")?
        .map(|text| {
            NaiveDate::parse_from_str(&text, DATE_FORMAT)
                .map_err(|e| AppError::internal(format!("bad due_date {:?} in database: {}", text, e)))
        })
        .transpose()?;

    let attachment = match row.try_get::<Option<String>, _>("attachment_blob_id")? {
        Some(blob_id) => Some(Attachment {
            blob_id,
            filename: row.try_get("attachment_filename")?,
            original_name: row.try_get("attachment_original_name")?,
            mime_type: row.try_get("attachment_mime_type")?,
        }),
        None => None,
    };

    Ok(Atividade {
        id: row.try_get("id")?,
        subject: row.try_get("subject")?,
        description: row.try_get("description")?,
        grade: row.try_get("grade")?,
        due_date,
        attachment,
    })
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

#[async_trait]
impl RecordStore for SqliteRecordRepo {
    async fn list(&self) -> Result<Vec<Atividade>> {
        let rows = sqlx::query(&format!("{} ORDER BY id", SELECT_ATIVIDADE))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_atividade).collect()
    }

    async fn get(&self, id: AtividadeId) -> Result<Atividade> {
        log::debug!("## Fetching atividade {}", id);
        self.fetch(id).await?.ok_or_else(not_found)
    }

    async fn create(&self, fields: AtividadeFields, attachment: Option<Attachment>) -> Result<Atividade> {
        let result = sqlx::query(
            "INSERT INTO atividades (subject, description, grade, due_date, \
             attachment_blob_id, attachment_filename, attachment_original_name, attachment_mime_type) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(fields.subject())
        .bind(fields.description())
        .bind(fields.grade())
        .bind(format_date(fields.due_date()))
        .bind(attachment.as_ref().map(|a| a.blob_id.as_str()))
        .bind(attachment.as_ref().map(|a| a.filename.as_str()))
        .bind(attachment.as_ref().map(|a| a.original_name.as_str()))
        .bind(attachment.as_ref().map(|a| a.mime_type.as_str()))
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        log::info!("## Created atividade {}", id);
        Ok(fields.into_atividade(id, attachment))
    }

    async fn update(
        &self,
        id: AtividadeId,
        fields: AtividadeFields,
        attachment: AttachmentChange,
    ) -> Result<(Atividade, Option<Attachment>)> {
        let mut atividade = self.fetch(id).await?.ok_or_else(not_found)?;
        let released = fields.apply_to(&mut atividade, attachment);
        let current = atividade.attachment.as_ref();

        let result = sqlx::query(
            "UPDATE atividades SET subject = ?, description = ?, grade = ?, due_date = ?, \
             attachment_blob_id = ?, attachment_filename = ?, attachment_original_name = ?, \
             attachment_mime_type = ? WHERE id = ?",
        )
        .bind(&atividade.subject)
        .bind(&atividade.description)
        .bind(atividade.grade)
        .bind(format_date(atividade.due_date))
        .bind(current.map(|a| a.blob_id.as_str()))
        .bind(current.map(|a| a.filename.as_str()))
        .bind(current.map(|a| a.original_name.as_str()))
        .bind(current.map(|a| a.mime_type.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        // Deleted between the read and the write.
        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        log::info!("## Updated atividade {}", id);
        Ok((atividade, released))
    }

    async fn delete(&self, id: AtividadeId) -> Result<Atividade> {
        let atividade = self.fetch(id).await?.ok_or_else(not_found)?;
        let result = sqlx::query("DELETE FROM atividades WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        log::info!("## Deleted atividade {}", id);
        Ok(atividade)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
