use infer::Infer;

use crate::constants::{MESSAGE_ATIVIDADE_NOT_FOUND, MESSAGE_FILE_NOT_FOUND, MIME_OCTET_STREAM};
use crate::error::{AppError, Result};
use crate::model::AtividadeId;

/// Path ids that are not integers can never name a record.
pub fn parse_atividade_id(raw: &str) -> Result<AtividadeId> {
    raw.trim()
        .parse::<AtividadeId>()
        .map_err(|_| AppError::not_found(MESSAGE_ATIVIDADE_NOT_FOUND))
}

/// Blob ids are UUIDs; anything else is reported as a missing file.
pub fn parse_blob_id(raw: &str) -> Result<String> {
    uuid::Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| AppError::not_found(MESSAGE_FILE_NOT_FOUND))
}

/// Declared type if it says anything useful, then magic bytes, then extension.
pub fn detect_mime(declared: Option<&str>, content: &[u8], filename: &str) -> String {
    if let Some(declared) = declared {
        if !declared.is_empty() && declared != MIME_OCTET_STREAM {
            return declared.to_string();
        }
    }

    if let Some(kind) = Infer::new().get(content) {
        log::debug!("## Mime (sniffed): {}", kind);
        return kind.mime_type().to_string();
    }

    let guessed = mime_guess::from_path(filename).first_or_octet_stream();
    log::debug!("## Mime (extension): {}", guessed);
    guessed.essence_str().to_string()
}

/// Keeps `[A-Za-z0-9._-]`, everything else becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "arquivo".to_string()
    } else {
        cleaned
    }
}

pub fn stored_filename(original_name: &str) -> String {
    format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_filename(original_name)
    )
}
