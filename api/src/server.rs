use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http, web, web::Data, App, HttpResponse, HttpServer};
use log::Level::Info;
use logging::jlog;
use serde_json::json;

use crate::config::Config;
use crate::db::Database;
use crate::routing;
use crate::utils::ServiceLocator;

// Must be valid JSON so the log pipeline can ingest request lines unchanged
const LOGGER_FORMAT: &str = r#"{"level": "INFO", "target": "gatelist::request", "remote_ip": "%a", "user_agent": "%{User-Agent}i", "request": "%r", "status_code": %s, "response_time": %D}"#;

pub struct AppState {
    pub config: Config,
    pub database: Database,
    pub service_locator: ServiceLocator,
}

impl AppState {
    pub fn new(config: Config, database: Database) -> AppState {
        AppState {
            service_locator: ServiceLocator::new(&config),
            config,
            database,
        }
    }
}

pub struct Server {
    pub config: Config,
}

impl Server {
    pub async fn start(config: Config) -> std::io::Result<()> {
        let bind_addr = format!("{}:{}", config.api_host, config.api_port);
        let database = Database::from_config(&config);

        jlog!(Info, "gatelist_api::server", "Listening", {"addr": &bind_addr});

        let conf = config.clone();
        HttpServer::new(move || {
            let cors = match conf.allowed_origins.as_str() {
                "*" => Cors::default().allow_any_origin().send_wildcard(),
                origin => Cors::default().allowed_origin(origin),
            }
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

            App::new()
                .app_data(Data::new(AppState::new(conf.clone(), database.clone())))
                .wrap(cors)
                .wrap(Logger::new(LOGGER_FORMAT))
                .configure(routing::routes)
                .default_service(
                    web::route().to(|| async { HttpResponse::NotFound().json(json!({"error": "Not found"})) }),
                )
        })
        .bind(&bind_addr)
        .unwrap_or_else(|_| panic!("Can not bind to {}", bind_addr))
        .run()
        .await
    }
}
