pub mod builders;
pub mod project;
