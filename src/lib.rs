pub mod config;
pub mod db;
pub mod dto;
pub mod handlers;
pub mod models;
pub mod utils;
pub mod views;

#[cfg(test)]
mod tests;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::config::BrowserSession;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{web, App};
use sqlx::SqlitePool;

use crate::config::EnvConfig;

/// Builds the application with its session stack, static files and routes.
pub fn create_app(
    pool: SqlitePool,
    config: EnvConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // The session cookie dies with the browser; "remember me" is handled by utils::auth.
    let sessions = SessionMiddleware::builder(CookieSessionStore::default(), config.secret_key.clone())
        .cookie_secure(config.cookie_secure)
        .session_lifecycle(BrowserSession::default())
        .build();
    let static_dir = config.static_dir.clone();

    App::new()
        .wrap(IdentityMiddleware::default())
        .wrap(sessions)
        .wrap(Logger::default())
        .app_data(web::Data::new(pool))
        .app_data(web::Data::new(config))
        .configure(handlers::page_handler::init_routes)
        .configure(handlers::user_handler::init_routes)
        .configure(handlers::todo_list_handler::init_routes)
        .service(Files::new("/static", static_dir))
}
