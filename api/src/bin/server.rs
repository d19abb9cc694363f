use std::env;

use dotenv::dotenv;
use log::info;
use log::Level::Info;
use logging::jlog;

use gatelist_api::config::{Config, Environment};
use gatelist_api::server::Server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    logging::setup_logger();
    info!("Loading environment");
    dotenv().ok();

    let environment = match env::var("ENVIRONMENT")
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
        .as_str()
    {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    };
    let config = Config::new(environment);
    jlog!(Info, "gatelist_api::bin::server", "Starting server", {"app_name": &config.app_name});
    Server::start(config).await
}
