use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use study_buddy_server::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let state = match AppState::new(config.clone()) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let bind_addr = (config.web_server_host.clone(), config.web_server_port);
    log::info!("Starting HTTP server on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config.cors_allowed_origin)
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::HeaderName::from_static(
                study_buddy_server::middleware::REQUEST_ID_HEADER,
            )])
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PayloadConfig::new(config.max_document_bytes))
            .app_data(web::JsonConfig::default().limit(64 * 1024))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
