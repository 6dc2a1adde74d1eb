// src/handler/api_handler.rs

use actix_web::{web, HttpResponse};

use crate::error::{AppError, Result};
use crate::gate::AdminSession;
use crate::model::AtividadeDraft;
use crate::service::AtividadeService;
use crate::utils::parse_atividade_id;

/// JSON routes. Errors render as `{"error": "..."}`.
pub struct ApiHandler;

impl ApiHandler {
    pub async fn list(service: web::Data<AtividadeService>) -> Result<HttpResponse> {
        Ok(HttpResponse::Ok().json(service.list().await?))
    }

    pub async fn get(
        service: web::Data<AtividadeService>,
        id: web::Path<String>,
    ) -> Result<HttpResponse> {
        let id = parse_atividade_id(&id)?;
        Ok(HttpResponse::Ok().json(service.get(id).await?))
    }

    /// The body is parsed only after the gate, so anonymous callers always
    /// get 403 whatever they send.
    pub async fn create(
        service: web::Data<AtividadeService>,
        admin: AdminSession,
        body: web::Bytes,
    ) -> Result<HttpResponse> {
        admin.require_admin()?;
        let draft: AtividadeDraft =
            serde_json::from_slice(&body).map_err(|e| AppError::validation(e.to_string()))?;
        let atividade = service.create(draft, None).await?;
        Ok(HttpResponse::Created().json(atividade))
    }

    /// Public, as listed in the route table. Attachments are left untouched.
    pub async fn update(
        service: web::Data<AtividadeService>,
        id: web::Path<String>,
        draft: web::Json<AtividadeDraft>,
    ) -> Result<HttpResponse> {
        let id = parse_atividade_id(&id)?;
        let atividade = service.update(id, draft.into_inner(), None, false).await?;
        Ok(HttpResponse::Ok().json(atividade))
    }

    /// Gated like its HTML counterpart.
    pub async fn delete(
        service: web::Data<AtividadeService>,
        admin: AdminSession,
        id: web::Path<String>,
    ) -> Result<HttpResponse> {
        admin.require_admin()?;
        let id = parse_atividade_id(&id)?;
        service.delete(id).await?;
        Ok(HttpResponse::NoContent().finish())
    }
}
