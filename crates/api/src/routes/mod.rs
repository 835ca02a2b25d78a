//! HTTP route handlers.

pub mod admin_dashboard;
pub mod auth;
pub mod employee_dashboard;
pub mod employees;
pub mod health;
pub mod leave_requests;
pub mod notifications;
pub mod profile;
pub mod salaries;
pub mod schedules;
