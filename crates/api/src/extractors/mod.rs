//! Custom Axum extractors.

pub mod current_user;
pub mod payload;

pub use payload::{JsonBody, QueryParams};
