pub use self::event_builder::EventBuilder;
pub use self::registration_builder::RegistrationBuilder;
pub use self::ticket_type_builder::TicketTypeBuilder;

mod event_builder;
mod registration_builder;
