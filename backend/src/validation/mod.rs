//! Input validation for admin payloads and query strings.

pub mod rules;

pub use validator::Validate;
