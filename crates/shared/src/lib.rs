//! Shared utilities for the StaffHub backend.
//!
//! - Password hashing with Argon2id and one-time password generation
//! - HS256 bearer tokens
//! - Offset pagination envelopes
//! - Date/time display formats
//! - Common field validators

pub mod crypto;
pub mod datetime;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
