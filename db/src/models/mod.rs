pub use self::enums::*;
pub use self::events::*;
pub use self::registration_state::*;
pub use self::registrations::*;
pub use self::ticket_types::*;

pub mod enums;
mod events;
mod registration_state;
mod registrations;
mod ticket_types;
