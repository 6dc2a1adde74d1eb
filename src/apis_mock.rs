//! Fixtures shared by the HTTP scenario tests.

use std::path::Path;
use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App};
use bytes::Bytes;

use crate::constants::SESSION_COOKIE_NAME;
use crate::db::memory_pool;
use crate::gate::AdminGate;
use crate::handler::{self, form::UploadLimits};
use crate::repo::{DiskBlobRepo, MemoryBlobRepo, MemoryRecordRepo, SqliteRecordRepo};
use crate::service::AtividadeService;
use crate::views::Views;

pub const ADMIN_PASSWORD: &str = "12345";
pub const BOUNDARY: &str = "----atividades-test-boundary";

/// Shared app data; cloned into every app built from it.
#[derive(Clone)]
pub struct TestState {
    pub service: web::Data<AtividadeService>,
    pub gate: web::Data<AdminGate>,
    pub views: web::Data<Views>,
    pub limits: web::Data<UploadLimits>,
}

impl TestState {
    fn with_service(service: AtividadeService) -> Self {
        Self {
            service: web::Data::new(service),
            gate: web::Data::new(AdminGate::new(ADMIN_PASSWORD)),
            views: web::Data::new(Views::new().unwrap()),
            limits: web::Data::new(UploadLimits { max_bytes: 64 * 1024 }),
        }
    }

    pub fn memory() -> Self {
        Self::with_service(AtividadeService::new(
            Arc::new(MemoryRecordRepo::new()),
            Arc::new(MemoryBlobRepo::new()),
        ))
    }

    pub async fn sqlite(blob_dir: &Path) -> Self {
        let pool = memory_pool().await.unwrap();
        let blobs = DiskBlobRepo::new(pool.clone(), blob_dir).await.unwrap();
        Self::with_service(AtividadeService::new(
            Arc::new(SqliteRecordRepo::new(pool)),
            Arc::new(blobs),
        ))
    }
}

pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_string())
        .cookie_secure(false)
        .build()
}

pub fn test_app(
    state: &TestState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state.service.clone())
        .app_data(state.gate.clone())
        .app_data(state.views.clone())
        .app_data(state.limits.clone())
        .wrap(test_session_middleware())
        .configure(handler::configure)
}

pub fn login_request(password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/admin")
        .set_form([("senha", password)])
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE_NAME)
        .map(|c| c.into_owned())
}

/// multipart/form-data body with text fields and an optional
/// `(field, filename, content type, content)` file part.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> (String, Bytes) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, content_type, content)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        Bytes::from(body),
    )
}

pub fn multipart_request(
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> test::TestRequest {
    let (content_type, body) = multipart_body(fields, file);
    test::TestRequest::post()
        .uri(uri)
        .insert_header(("content-type", content_type))
        .set_payload(body)
}
