use std::fmt;

use crate::utils::errors::EnumParseError;

macro_rules! string_enum {
    ($name:ident [$($variant:ident => $repr:literal),+ $(,)?]) => {
        #[derive(serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
        pub enum $name {
            $(
                #[serde(rename = $repr)]
                $variant,
            )*
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
                let s = match self {
                    $(
                        $name::$variant => $repr,
                    )*
                };
                write!(f, "{}", s)
            }
        }

        impl $name {
            pub fn parse(s: &str) -> Result<$name, EnumParseError> {
                match s {
                    $(
                        $repr => Ok($name::$variant),
                    )*
                    _ => Err(EnumParseError {
                        message: "Could not parse value".to_string(),
                        enum_type: stringify!($name).to_string(),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum! { RegistrationStatus [Confirmed => "confirmed", Pending => "pending", Cancelled => "cancelled", CheckedIn => "checked-in"] }
string_enum! { PaymentStatus [Paid => "paid", Pending => "pending", Free => "free", Refunded => "refunded", Failed => "failed"] }
string_enum! { EventStatus [Upcoming => "upcoming", Ongoing => "ongoing", Past => "past", SoldOut => "sold-out"] }
