//! In-memory [`Notifier`] used by tests. Built with the `test-util` feature.

use std::sync::Mutex;

use super::notifier::{LeaveMailData, MailTemplate, Notifier, NotifyOutcome, Recipient};

/// A message captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMessage {
    pub recipients: Vec<Recipient>,
    pub template: MailTemplate,
    pub data: LeaveMailData,
}

/// Records every call and can be told to report failures.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub simulate_failure: bool,
    sent: Mutex<Vec<RecordedMessage>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything recorded so far, including failed attempts.
    pub fn messages(&self) -> Vec<RecordedMessage> {
        match self.sent.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        recipients: &[Recipient],
        template: MailTemplate,
        data: &LeaveMailData,
    ) -> NotifyOutcome {
        if recipients.is_empty() {
            return NotifyOutcome::Skipped;
        }

        let message = RecordedMessage {
            recipients: recipients.to_vec(),
            template,
            data: data.clone(),
        };
        match self.sent.lock() {
            Ok(mut guard) => guard.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }

        if self.simulate_failure {
            tracing::warn!(template = template.as_str(), "Simulated notification failure");
            NotifyOutcome::Failed("simulated failure".to_string())
        } else {
            NotifyOutcome::Sent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::leave_request::LeaveStatus;
    use chrono::NaiveDate;

    fn data() -> LeaveMailData {
        LeaveMailData {
            leave_request_id: 9,
            employee_name: "Jane Doe".into(),
            leave_type: "annual".into(),
            reason: "Holiday".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
            days: 5,
            status: LeaveStatus::Pending,
        }
    }

    fn admin() -> Recipient {
        Recipient {
            email: "admin@example.com".into(),
            name: "Admin".into(),
        }
    }

    #[tokio::test]
    async fn test_recording_notifier_records() {
        let notifier = RecordingNotifier::new();
        let outcome = notifier
            .notify(&[admin()], MailTemplate::NewLeaveRequest, &data())
            .await;

        assert_eq!(outcome, NotifyOutcome::Sent);
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].template, MailTemplate::NewLeaveRequest);
        assert_eq!(messages[0].recipients, vec![admin()]);
    }

    #[tokio::test]
    async fn test_failure_is_reported_not_raised() {
        let notifier = RecordingNotifier::failing();
        let outcome = notifier
            .notify(&[admin()], MailTemplate::LeaveStatusUpdated, &data())
            .await;
        assert!(matches!(outcome, NotifyOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_no_recipients_skips() {
        let notifier = RecordingNotifier::new();
        let outcome = notifier
            .notify(&[], MailTemplate::NewLeaveRequest, &data())
            .await;
        assert_eq!(outcome, NotifyOutcome::Skipped);
        assert!(notifier.messages().is_empty());
    }
}
