// src/handler/admin_handler.rs

use actix_web::{web, HttpResponse};

use crate::constants::{MESSAGE_WRONG_PASSWORD, ROUTE_HOME};
use crate::error::PageError;
use crate::gate::AdminSession;
use crate::handler::atividade_handler::{html, redirect};
use crate::handler::form::LoginForm;
use crate::views::Views;

pub struct AdminHandler;

impl AdminHandler {
    pub async fn login_form(views: web::Data<Views>) -> Result<HttpResponse, PageError> {
        Ok(html(views.admin(None)?))
    }

    pub async fn login(
        views: web::Data<Views>,
        admin: AdminSession,
        form: web::Form<LoginForm>,
    ) -> Result<HttpResponse, PageError> {
        if admin.login(&form.senha)? {
            log::info!("## Admin logged in");
            return Ok(redirect(ROUTE_HOME));
        }
        Ok(html(views.admin(Some(MESSAGE_WRONG_PASSWORD))?))
    }

    pub async fn logout(admin: AdminSession) -> Result<HttpResponse, PageError> {
        admin.logout()?;
        Ok(redirect(ROUTE_HOME))
    }
}
