use diesel::PgConnection;

use gatelist_db::models::{
    AttendeeDetails, Event, Registration, RegistrationCreateResult, TicketType,
};

pub struct RegistrationBuilder<'a> {
    event: &'a Event,
    ticket_type: &'a TicketType,
    name: String,
    email: String,
    phone: Option<String>,
    connection: &'a mut PgConnection,
}

#[allow(dead_code)]
impl<'a> RegistrationBuilder<'a> {
    pub fn new(
        event: &'a Event,
        ticket_type: &'a TicketType,
        connection: &'a mut PgConnection,
    ) -> RegistrationBuilder<'a> {
        RegistrationBuilder {
            event,
            ticket_type,
            name: "Ama Mensah".to_string(),
            email: "ama.mensah@example.com".to_string(),
            phone: Some("0241234567".to_string()),
            connection,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn without_phone(mut self) -> Self {
        self.phone = None;
        self
    }

    pub fn finish(self) -> Registration {
        match Registration::create_for_ticket(
            self.event,
            self.ticket_type,
            AttendeeDetails {
                name: self.name,
                email: self.email,
                phone: self.phone,
            },
            None,
            self.connection,
        )
        .unwrap()
        {
            RegistrationCreateResult::Created(registration) => registration,
            RegistrationCreateResult::SoldOut => panic!("Ticket type sold out while building test registration"),
        }
    }
}
