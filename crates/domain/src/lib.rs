//! Domain layer for the StaffHub backend.
//!
//! This crate contains:
//! - Domain models and request/response DTOs
//! - Status rules and pure calculations (day counts, salary totals, codes)
//! - The best-effort notifier seam used by the leave workflow

pub mod models;
pub mod services;
