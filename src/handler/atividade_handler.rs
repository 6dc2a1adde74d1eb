// src/handler/atividade_handler.rs

use actix_multipart::Multipart;
use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpResponse};

use crate::constants::{ROUTE_ADMIN, ROUTE_HOME};
use crate::error::PageError;
use crate::gate::AdminSession;
use crate::model::AtividadeId;
use crate::handler::form::{read_atividade_form, AtividadeForm, UploadLimits, UrlencodedAtividadeForm};
use crate::service::AtividadeService;
use crate::utils::parse_atividade_id;
use crate::views::Views;

type PageResult = Result<HttpResponse, PageError>;

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().insert_header(ContentType::html()).body(body)
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Server-rendered pages and form posts.
pub struct AtividadeHandler;

impl AtividadeHandler {
    pub async fn index(
        service: web::Data<AtividadeService>,
        views: web::Data<Views>,
        admin: AdminSession,
    ) -> PageResult {
        let atividades = service.list().await?;
        Ok(html(views.index(&atividades, admin.is_admin()?)?))
    }

    pub async fn new_form(views: web::Data<Views>, admin: AdminSession) -> PageResult {
        admin.require_admin()?;
        Ok(html(views.new_form()?))
    }

    pub async fn create(
        service: web::Data<AtividadeService>,
        limits: web::Data<UploadLimits>,
        admin: AdminSession,
        payload: Multipart,
    ) -> PageResult {
        admin.require_admin()?;
        let form = read_atividade_form(payload, **limits).await?;
        Self::create_from(&service, form).await
    }

    pub async fn create_urlencoded(
        service: web::Data<AtividadeService>,
        admin: AdminSession,
        form: web::Form<UrlencodedAtividadeForm>,
    ) -> PageResult {
        admin.require_admin()?;
        Self::create_from(&service, form.into_inner().into()).await
    }

    async fn create_from(service: &AtividadeService, form: AtividadeForm) -> PageResult {
        let atividade = service.create(form.draft, form.upload).await?;
        log::info!("## Atividade {} created from form", atividade.id);
        Ok(redirect(ROUTE_HOME))
    }

    pub async fn edit_form(
        service: web::Data<AtividadeService>,
        views: web::Data<Views>,
        admin: AdminSession,
        id: web::Path<String>,
    ) -> PageResult {
        // navigation route: anonymous visitors are sent to the login form
        if !admin.is_admin()? {
            return Ok(redirect(ROUTE_ADMIN));
        }
        let id = parse_atividade_id(&id)?;
        let atividade = service.get(id).await?;
        Ok(html(views.edit_form(&atividade)?))
    }

    pub async fn update(
        service: web::Data<AtividadeService>,
        limits: web::Data<UploadLimits>,
        admin: AdminSession,
        id: web::Path<String>,
        payload: Multipart,
    ) -> PageResult {
        admin.require_admin()?;
        let id = parse_atividade_id(&id)?;
        let form = read_atividade_form(payload, **limits).await?;
        Self::update_from(&service, id, form).await
    }

    pub async fn update_urlencoded(
        service: web::Data<AtividadeService>,
        admin: AdminSession,
        id: web::Path<String>,
        form: web::Form<UrlencodedAtividadeForm>,
    ) -> PageResult {
        admin.require_admin()?;
        let id = parse_atividade_id(&id)?;
        Self::update_from(&service, id, form.into_inner().into()).await
    }

    async fn update_from(service: &AtividadeService, id: AtividadeId, form: AtividadeForm) -> PageResult {
        service
            .update(id, form.draft, form.upload, form.remove_attachment)
            .await?;
        Ok(redirect(ROUTE_HOME))
    }

    pub async fn delete(
        service: web::Data<AtividadeService>,
        admin: AdminSession,
        id: web::Path<String>,
    ) -> PageResult {
        admin.require_admin()?;
        let id = parse_atividade_id(&id)?;
        service.delete(id).await?;
        Ok(redirect(ROUTE_HOME))
    }

    pub async fn detalhes(
        service: web::Data<AtividadeService>,
        views: web::Data<Views>,
        admin: AdminSession,
        id: web::Path<String>,
    ) -> PageResult {
        let id = parse_atividade_id(&id)?;
        let atividade = service.get(id).await?;
        Ok(html(views.detalhes(&atividade, admin.is_admin()?)?))
    }
}
