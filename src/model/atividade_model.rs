use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DATE_FORMAT, MESSAGE_INVALID_DUE_DATE, MESSAGE_INVALID_GRADE, MESSAGE_REQUIRED_FIELDS};
use crate::error::{AppError, Result};

pub type AtividadeId = i64;

/// A school assignment as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Atividade {
    pub id: AtividadeId,
    pub subject: String,
    pub description: String,
    pub grade: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub blob_id: String,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
}

/// What an update does with the current attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentChange {
    Keep,
    Replace(Attachment),
    Remove,
}

/// Grades arrive as numbers from JSON clients and as text from forms.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GradeInput {
    Number(f64),
    Text(String),
}

/// Unvalidated client input, shared by the form and JSON routes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtividadeDraft {
    #[serde(default, alias = "materia")]
    pub subject: Option<String>,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "nota")]
    pub grade: Option<GradeInput>,
    #[serde(default, alias = "dataEntrega")]
    pub due_date: Option<String>,
}

/// Validated record fields. Only obtainable through [`AtividadeDraft::validate`],
/// so stores never see an empty subject or description.
#[derive(Debug, Clone, PartialEq)]
pub struct AtividadeFields {
    subject: String,
    description: String,
    grade: Option<f64>,
    due_date: Option<NaiveDate>,
}

impl AtividadeDraft {
    pub fn validate(self) -> Result<AtividadeFields> {
        let subject = required(self.subject);
        let description = required(self.description);
        let (subject, description) = match (subject, description) {
            (Some(s), Some(d)) => (s, d),
            _ => return Err(AppError::validation(MESSAGE_REQUIRED_FIELDS)),
        };

        Ok(AtividadeFields {
            subject,
            description,
            grade: parse_grade(self.grade)?,
            due_date: parse_due_date(self.due_date.as_deref())?,
        })
    }
}

impl AtividadeFields {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn grade(&self) -> Option<f64> {
        self.grade
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn into_atividade(self, id: AtividadeId, attachment: Option<Attachment>) -> Atividade {
        Atividade {
            id,
            subject: self.subject,
            description: self.description,
            grade: self.grade,
            due_date: self.due_date,
            attachment,
        }
    }

    /// Full replace of the scalar fields; the attachment follows `change`.
    /// Returns the attachment that is no longer referenced, if any.
    pub fn apply_to(self, atividade: &mut Atividade, change: AttachmentChange) -> Option<Attachment> {
        atividade.subject = self.subject;
        atividade.description = self.description;
        atividade.grade = self.grade;
        atividade.due_date = self.due_date;
        match change {
            AttachmentChange::Keep => None,
            AttachmentChange::Replace(new) => atividade.attachment.replace(new),
            AttachmentChange::Remove => atividade.attachment.take(),
        }
    }
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_grade(input: Option<GradeInput>) -> Result<Option<f64>> {
    let grade = match input {
        None => return Ok(None),
        Some(GradeInput::Number(n)) => n,
        Some(GradeInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map_err(|_| AppError::validation(MESSAGE_INVALID_GRADE))?
        }
    };
    if !grade.is_finite() {
        return Err(AppError::validation(MESSAGE_INVALID_GRADE));
    }
    Ok(Some(grade))
}

fn parse_due_date(input: Option<&str>) -> Result<Option<NaiveDate>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| AppError::validation(MESSAGE_INVALID_DUE_DATE)),
    }
}
