use std::env;

use dotenv::dotenv;
use moolre::MoolreClient;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Clone)]
pub struct Config {
    pub allowed_origins: String,
    pub app_name: String,
    pub api_host: String,
    pub api_port: String,
    pub block_external_comms: bool,
    pub database_pool_size: u32,
    pub database_url: String,
    pub environment: Environment,
    pub moolre_api_user: String,
    pub moolre_api_key: String,
    pub moolre_api_pubkey: String,
    pub moolre_vas_key: Option<String>,
    pub moolre_base_url: String,
    pub moolre_webhook_token: Option<String>,
    pub primary_currency: String,
    pub sms_sender_id: String,
}

const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
const APP_NAME: &str = "APP_NAME";
const API_HOST: &str = "API_HOST";
const API_PORT: &str = "API_PORT";
// Blocks all external communications from occurring
const BLOCK_EXTERNAL_COMMS: &str = "BLOCK_EXTERNAL_COMMS";
const DATABASE_POOL_SIZE: &str = "DATABASE_POOL_SIZE";
const DATABASE_URL: &str = "DATABASE_URL";
const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";
const PRIMARY_CURRENCY: &str = "PRIMARY_CURRENCY";

// Moolre settings
const MOOLRE_API_USER: &str = "MOOLRE_API_USER";
const MOOLRE_API_KEY: &str = "MOOLRE_API_KEY";
const MOOLRE_API_PUBKEY: &str = "MOOLRE_API_PUBKEY";
const MOOLRE_VAS_KEY: &str = "MOOLRE_VAS_KEY";
const MOOLRE_BASE_URL: &str = "MOOLRE_BASE_URL";
const MOOLRE_WEBHOOK_TOKEN: &str = "MOOLRE_WEBHOOK_TOKEN";

const SMS_SENDER_ID: &str = "SMS_SENDER_ID";

impl Config {
    pub fn new(environment: Environment) -> Self {
        dotenv().ok();

        let app_name = env::var(APP_NAME).unwrap_or_else(|_| "Gatelist".to_string());

        let database_url = match environment {
            Environment::Test => {
                env::var(TEST_DATABASE_URL).unwrap_or_else(|_| panic!("{} must be defined.", TEST_DATABASE_URL))
            }
            _ => env::var(DATABASE_URL).unwrap_or_else(|_| panic!("{} must be defined.", DATABASE_URL)),
        };
        let database_pool_size = env::var(DATABASE_POOL_SIZE)
            .map(|s| s.parse().expect("Not a valid integer for database pool size"))
            .unwrap_or(20);

        let allowed_origins = env::var(ALLOWED_ORIGINS).unwrap_or_else(|_| "*".to_string());
        let api_host = env::var(API_HOST).unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = env::var(API_PORT).unwrap_or_else(|_| "8088".to_string());

        let primary_currency = env::var(PRIMARY_CURRENCY).unwrap_or_else(|_| "GHS".to_string());

        let moolre_api_user = required_in_production(MOOLRE_API_USER, environment);
        let moolre_api_key = required_in_production(MOOLRE_API_KEY, environment);
        let moolre_api_pubkey = required_in_production(MOOLRE_API_PUBKEY, environment);
        let moolre_vas_key = env::var(MOOLRE_VAS_KEY).ok();
        let moolre_base_url = env::var(MOOLRE_BASE_URL).unwrap_or_else(|_| "https://api.moolre.com".to_string());
        let moolre_webhook_token = env::var(MOOLRE_WEBHOOK_TOKEN).ok();

        let sms_sender_id = env::var(SMS_SENDER_ID).unwrap_or_else(|_| app_name.clone());

        let block_external_comms =
            !matches!(env::var(BLOCK_EXTERNAL_COMMS).unwrap_or_else(|_| "0".to_string()).as_str(), "0");

        Config {
            allowed_origins,
            app_name,
            api_host,
            api_port,
            block_external_comms,
            database_pool_size,
            database_url,
            environment,
            moolre_api_user,
            moolre_api_key,
            moolre_api_pubkey,
            moolre_vas_key,
            moolre_base_url,
            moolre_webhook_token,
            primary_currency,
            sms_sender_id,
        }
    }

    pub fn moolre_client(&self) -> MoolreClient {
        MoolreClient::new(
            self.moolre_api_user.clone(),
            self.moolre_api_key.clone(),
            self.moolre_api_pubkey.clone(),
            self.moolre_vas_key.clone(),
            self.moolre_base_url.clone(),
        )
    }
}

fn required_in_production(var: &str, environment: Environment) -> String {
    match env::var(var) {
        Ok(value) => value,
        Err(_) => {
            if environment == Environment::Production {
                panic!("{} must be defined.", var);
            }
            format!("<{} not set>", var)
        }
    }
}
