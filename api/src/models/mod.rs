use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct PathParameters {
    pub id: Uuid,
}

#[derive(Deserialize)]
pub struct TicketCodePathParameters {
    pub ticket_code: String,
}
