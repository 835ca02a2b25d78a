//! Application services sitting between the handlers and the repositories.

pub mod admin_bootstrap;
pub mod auth;
pub mod email;
pub mod leave_workflow;

pub use admin_bootstrap::{bootstrap_admin, BootstrapOutcome};
pub use auth::AuthService;
pub use email::EmailService;
pub use leave_workflow::LeaveWorkflow;
