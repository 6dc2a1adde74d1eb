pub mod admin_handler;
pub mod api_handler;
pub mod atividade_handler;
pub mod file_handler;
pub mod form;

use actix_web::http::header;
use actix_web::{guard, web};

pub use admin_handler::AdminHandler;
pub use api_handler::ApiHandler;
pub use atividade_handler::AtividadeHandler;
pub use file_handler::FileHandler;

use crate::constants::MESSAGE_BAD_FORM;
use crate::error::{AppError, PageError};

fn content_type_is(ctx: &guard::GuardContext<'_>, essence: &str) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with(essence))
        .unwrap_or(false)
}

fn is_json(ctx: &guard::GuardContext<'_>) -> bool {
    content_type_is(ctx, "application/json")
}

fn is_urlencoded(ctx: &guard::GuardContext<'_>) -> bool {
    content_type_is(ctx, "application/x-www-form-urlencoded")
}

/// Full route table; shared by `main` and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::validation(err.to_string()).into()
    }))
    .app_data(web::FormConfig::default().error_handler(|err, _req| {
        log::warn!("## Form error: {}", err);
        PageError::from(AppError::validation(MESSAGE_BAD_FORM)).into()
    }))
    .route("/", web::get().to(AtividadeHandler::index))
    .service(
        web::resource("/admin")
            .route(web::get().to(AdminHandler::login_form))
            .route(web::post().to(AdminHandler::login)),
    )
    .route("/logout", web::post().to(AdminHandler::logout))
    .route("/new", web::get().to(AtividadeHandler::new_form))
    .service(
        web::resource("/atividades")
            .route(web::get().to(ApiHandler::list))
            .route(web::post().guard(guard::fn_guard(is_json)).to(ApiHandler::create))
            .route(
                web::post()
                    .guard(guard::fn_guard(is_urlencoded))
                    .to(AtividadeHandler::create_urlencoded),
            )
            .route(web::post().to(AtividadeHandler::create)),
    )
    .service(
        web::resource("/atividades/{id}")
            .route(web::get().to(AtividadeHandler::detalhes))
            .route(web::put().to(ApiHandler::update))
            .route(web::delete().to(ApiHandler::delete)),
    )
    .service(
        web::resource("/edit/{id}")
            .route(web::get().to(AtividadeHandler::edit_form))
            .route(
                web::post()
                    .guard(guard::fn_guard(is_urlencoded))
                    .to(AtividadeHandler::update_urlencoded),
            )
            .route(web::post().to(AtividadeHandler::update)),
    )
    .route("/delete/{id}", web::post().to(AtividadeHandler::delete))
    .route("/download/{file_id}", web::get().to(FileHandler::download))
    .route("/api/atividades/{id}", web::get().to(ApiHandler::get));
}
