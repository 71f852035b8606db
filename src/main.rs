use actix_web::HttpServer;
use std::io;

use todoapp::config::EnvConfig;
use todoapp::{create_app, db};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = EnvConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    std::fs::create_dir_all(config.profile_pics_dir())?;

    let pool = db::connect(&config.database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    log::info!("Using database {}", config.database_url);

    let addr = config.bind_address();
    log::info!("Starting server on {}", addr);

    HttpServer::new(move || create_app(pool.clone(), config.clone()))
        .bind(addr)?
        .run()
        .await
}
