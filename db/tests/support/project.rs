use std::env;

use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use dotenv::dotenv;

use crate::support::builders::*;
use gatelist_db::models::{Event, TicketType};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// These tests need a live Postgres pointed at by `TEST_DATABASE_URL`; each
/// test returns early when it is not configured so the suite stays runnable
/// on machines without one.
pub fn test_database_configured() -> bool {
    dotenv().ok();
    env::var("TEST_DATABASE_URL").is_ok()
}

pub struct TestProject {
    pub connection: PgConnection,
}

#[allow(dead_code)]
impl TestProject {
    /// Everything inside a test transaction, rolled back on drop.
    pub fn new() -> TestProject {
        let mut connection = TestProject::connect();
        connection
            .begin_test_transaction()
            .expect("Could not start testing transaction");
        TestProject { connection }
    }

    /// Committed writes, for tests that exercise concurrency across multiple
    /// connections. Callers clean up after themselves.
    pub fn new_without_rollback() -> TestProject {
        TestProject {
            connection: TestProject::connect(),
        }
    }

    pub fn connect() -> PgConnection {
        dotenv().ok();
        let conn_str = env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be defined.");
        let mut connection =
            PgConnection::establish(&conn_str).expect("Could not get access to test database");
        connection
            .run_pending_migrations(MIGRATIONS)
            .expect("Could not migrate test database");
        connection
    }

    pub fn get_connection(&mut self) -> &mut PgConnection {
        &mut self.connection
    }

    pub fn create_event(&mut self) -> EventBuilder {
        EventBuilder::new(&mut self.connection)
    }

    pub fn create_ticket_type<'a>(&'a mut self, event: &'a Event) -> TicketTypeBuilder<'a> {
        TicketTypeBuilder::new(event, &mut self.connection)
    }

    pub fn create_registration<'a>(
        &'a mut self,
        event: &'a Event,
        ticket_type: &'a TicketType,
    ) -> RegistrationBuilder<'a> {
        RegistrationBuilder::new(event, ticket_type, &mut self.connection)
    }
}
