use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::PgConnection;

use crate::config::Config;
use crate::errors::ApiError;

pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct Database {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl Database {
    pub fn from_config(config: &Config) -> Database {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url.clone());
        let pool = Pool::builder()
            .max_size(config.database_pool_size)
            .build(manager)
            .expect("Failed to create database connection pool");
        Database { pool }
    }

    pub fn get_connection(&self) -> Result<DbConnection, ApiError> {
        Ok(self.pool.get()?)
    }
}
