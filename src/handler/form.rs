use actix_multipart::{Field, Multipart, MultipartError};
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt as _;
use serde::Deserialize;

use crate::constants::{
    FIELD_DESCRIPTION, FIELD_DUE_DATE, FIELD_FILE, FIELD_GRADE, FIELD_REMOVE_ATTACHMENT,
    FIELD_SUBJECT, MESSAGE_BAD_FORM, MESSAGE_UPLOAD_TOO_LARGE,
};
use crate::error::{AppError, Result};
use crate::model::{AtividadeDraft, GradeInput, Upload};
use crate::utils::detect_mime;

/// Per-field size limit for multipart bodies.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_bytes: usize,
}

/// Body of the create and edit forms.
#[derive(Debug, Default)]
pub struct AtividadeForm {
    pub draft: AtividadeDraft,
    pub upload: Option<Upload>,
    pub remove_attachment: bool,
}

/// Same form posted as `application/x-www-form-urlencoded`; no file part.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlencodedAtividadeForm {
    #[serde(default, alias = "materia")]
    pub subject: Option<String>,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "nota")]
    pub grade: Option<String>,
    #[serde(default, alias = "dataEntrega")]
    pub due_date: Option<String>,
    #[serde(default, rename = "removerAnexo", alias = "removeAttachment")]
    pub remove_attachment: Option<String>,
}

impl From<UrlencodedAtividadeForm> for AtividadeForm {
    fn from(form: UrlencodedAtividadeForm) -> Self {
        AtividadeForm {
            draft: AtividadeDraft {
                subject: form.subject,
                description: form.description,
                grade: form.grade.map(GradeInput::Text),
                due_date: form.due_date,
            },
            upload: None,
            remove_attachment: form.remove_attachment.as_deref().map(truthy).unwrap_or(false),
        }
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default, alias = "password")]
    pub senha: String,
}

fn multipart_error(e: MultipartError) -> AppError {
    log::warn!("## Multipart error: {}", e);
    AppError::validation(MESSAGE_BAD_FORM)
}

async fn read_field(field: &mut Field, limits: UploadLimits) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if buf.len() + chunk.len() > limits.max_bytes {
            return Err(AppError::PayloadTooLarge(MESSAGE_UPLOAD_TOO_LARGE.to_string()));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

fn text(content: Bytes) -> Result<String> {
    String::from_utf8(content.to_vec()).map_err(|_| AppError::validation(MESSAGE_BAD_FORM))
}

fn truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "on" | "true" | "1")
}

/// Reads every part of the form. Unknown fields are drained and ignored;
/// a file part with an empty filename means no file was chosen.
pub async fn read_atividade_form(mut payload: Multipart, limits: UploadLimits) -> Result<AtividadeForm> {
    let mut form = AtividadeForm::default();

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let declared = field.content_type().map(|m| m.essence_str().to_string());
        let content = read_field(&mut field, limits).await?;

        if FIELD_FILE.contains(&name.as_str()) {
            match filename {
                Some(original_name) if !original_name.is_empty() => {
                    log::info!("## GOT a file: {} ({} bytes)", original_name, content.len());
                    let content_type = detect_mime(declared.as_deref(), &content, &original_name);
                    form.upload = Some(Upload {
                        original_name,
                        content_type,
                        content,
                    });
                }
                _ => {}
            }
        } else if FIELD_SUBJECT.contains(&name.as_str()) {
            form.draft.subject = Some(text(content)?);
        } else if FIELD_DESCRIPTION.contains(&name.as_str()) {
            form.draft.description = Some(text(content)?);
        } else if FIELD_GRADE.contains(&name.as_str()) {
            form.draft.grade = Some(GradeInput::Text(text(content)?));
        } else if FIELD_DUE_DATE.contains(&name.as_str()) {
            form.draft.due_date = Some(text(content)?);
        } else if FIELD_REMOVE_ATTACHMENT.contains(&name.as_str()) {
            form.remove_attachment = truthy(&text(content)?);
        } else {
            log::debug!("## Ignoring form field {:?}", name);
        }
    }

    Ok(form)
}
