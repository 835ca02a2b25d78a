//! Best-effort outbound notifications for the leave workflow.
//!
//! The workflow hands a batch of recipients, a template and its data to a
//! [`Notifier`] and moves on. Implementations report what happened through
//! [`NotifyOutcome`] but never return an error: a failed delivery is logged
//! by the implementation and must not affect the request that caused it.

use chrono::NaiveDate;

use crate::models::leave_request::LeaveStatus;

/// An addressee of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

/// Message kinds the workflow sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTemplate {
    /// To every admin when an employee submits a request.
    NewLeaveRequest,
    /// To the employee when an admin decides on their request.
    LeaveStatusUpdated,
}

impl MailTemplate {
    pub fn subject(&self) -> &'static str {
        match self {
            MailTemplate::NewLeaveRequest => "New leave request awaiting approval",
            MailTemplate::LeaveStatusUpdated => "Leave request updated",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MailTemplate::NewLeaveRequest => "new_request_admin",
            MailTemplate::LeaveStatusUpdated => "status_update",
        }
    }
}

/// Values interpolated into either template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveMailData {
    pub leave_request_id: i64,
    pub employee_name: String,
    pub leave_type: String,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub status: LeaveStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    /// Nothing to send: no recipients or delivery disabled.
    Skipped,
    /// Delivery failed; already logged by the notifier.
    Failed(String),
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipients: &[Recipient],
        template: MailTemplate,
        data: &LeaveMailData,
    ) -> NotifyOutcome;
}
