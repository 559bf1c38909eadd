use actix_web::{middleware::Logger, web, App, HttpServer};
use people_portal::config::{EnvConfig, CONFIG};
use people_portal::db::database_service::DatabaseService;
use people_portal::routes::configure_routes;
use people_portal::utils::mail::{Mailer, ResendMailer};
use people_portal::utils::templates::Templates;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let config = CONFIG.get_or_init(EnvConfig::from_env);
    let addr = format!("0.0.0.0:{}", config.port);

    let database_service = Arc::new(
        DatabaseService::new(&config.db_url)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("database init failed: {e}")))?,
    );
    let templates = web::Data::new(
        Templates::new().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?,
    );
    let mailer: Arc<dyn Mailer> = Arc::new(
        ResendMailer::new(&config.mail).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );
    let mailer = web::Data::from(mailer);

    log::info!("Starting server on {}", addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(Arc::clone(&database_service)))
            .app_data(templates.clone())
            .app_data(mailer.clone())
            .configure(configure_routes)
    })
    .bind(addr)?
    .run()
    .await
}
