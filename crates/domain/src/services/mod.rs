//! Domain services for StaffHub.

pub mod leave_messages;
pub mod notifier;
#[cfg(any(test, feature = "test-util"))]
pub mod recording;

pub use notifier::{LeaveMailData, MailTemplate, Notifier, NotifyOutcome, Recipient};
#[cfg(any(test, feature = "test-util"))]
pub use recording::{RecordedMessage, RecordingNotifier};
