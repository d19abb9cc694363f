mod events;
mod registrations;
mod ticket_types;
