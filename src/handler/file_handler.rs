// src/handler/file_handler.rs

use actix_files::NamedFile;
use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{mime, web, HttpRequest, HttpResponse};

use crate::error::{AppError, PageError};
use crate::model::BlobBody;
use crate::service::AtividadeService;

pub struct FileHandler;

/// `filename` for every client, plus `filename*` when the name is not ASCII.
fn attachment_disposition(filename: &str) -> ContentDisposition {
    let mut parameters = vec![DispositionParam::Filename(filename.to_string())];
    if !filename.is_ascii() {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: filename.as_bytes().to_vec(),
        }));
    }
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters,
    }
}

impl FileHandler {
    /// Streams an attachment with `Content-Disposition: attachment`.
    pub async fn download(
        service: web::Data<AtividadeService>,
        file_id: web::Path<String>,
        req: HttpRequest,
    ) -> Result<HttpResponse, PageError> {
        let blob = service.download(&file_id).await?;
        log::info!("## Sending file {} ({} bytes)", blob.id, blob.size);

        let disposition = attachment_disposition(&blob.filename);
        let content_type = blob
            .content_type
            .parse::<mime::Mime>()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);

        match blob.body {
            BlobBody::File(path) => {
                let named_file = NamedFile::open_async(&path)
                    .await
                    .map_err(AppError::from)?;
                Ok(named_file
                    .set_content_type(content_type)
                    .set_content_disposition(disposition)
                    .into_response(&req))
            }
            BlobBody::Bytes(content) => Ok(HttpResponse::Ok()
                .content_type(content_type)
                .insert_header(disposition)
                .body(content)),
        }
    }
}
