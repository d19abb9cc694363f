pub use crate::models::*;
pub use crate::utils::errors::*;
pub use crate::utils::phone::normalize_ghana_phone;
