mod config;
mod constants;
mod db;
mod error;
mod gate;
mod handler;
mod model;
mod repo;
mod service;
mod utils;
mod views;

#[cfg(test)]
mod apis_mock;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_cors::Cors;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use env_logger::Env;

use config::{Config, StorageBackend};
use constants::SESSION_COOKIE_NAME;
use gate::AdminGate;
use handler::form::UploadLimits;
use repo::{BlobStore, DiskBlobRepo, MemoryBlobRepo, MemoryRecordRepo, RecordStore, SqliteRecordRepo};
use service::AtividadeService;
use views::Views;

async fn build_service(config: &Config) -> anyhow::Result<AtividadeService> {
    let (records, blobs): (Arc<dyn RecordStore>, Arc<dyn BlobStore>) = match config.storage {
        StorageBackend::Memory => (
            Arc::new(MemoryRecordRepo::new()),
            Arc::new(MemoryBlobRepo::new()),
        ),
        StorageBackend::Sqlite => {
            let pool = db::connect(&config.database_url)
                .await
                .with_context(|| format!("unable to open database {}", config.database_url))?;
            let blobs = DiskBlobRepo::new(pool.clone(), &config.blob_dir)
                .await
                .with_context(|| format!("unable to prepare blob dir {}", config.blob_dir.display()))?;
            (Arc::new(SqliteRecordRepo::new(pool)), Arc::new(blobs))
        }
    };
    Ok(AtividadeService::new(records, blobs))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env()?;
    let service = web::Data::new(build_service(&config).await?);
    let gate = web::Data::new(AdminGate::new(config.admin_password.clone()));
    let views = web::Data::new(Views::new().context("unable to compile templates")?);
    let limits = web::Data::new(UploadLimits {
        max_bytes: config.max_upload_bytes,
    });

    let session_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;
    let (host, port) = config.bind_addr();
    log::info!("Server running on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(gate.clone())
            .app_data(views.clone())
            .app_data(limits.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_name(SESSION_COOKIE_NAME.to_string())
                    .cookie_secure(cookie_secure)
                    .cookie_http_only(true)
                    .build(),
            )
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials()
                    .max_age(3600),
            )
            .wrap(actix_web::middleware::Logger::default())
            .configure(handler::configure)
    })
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}
