//! Inbox notifications produced by the leave workflow.

use chrono::NaiveDate;

use crate::models::leave_request::LeaveStatus;
use crate::models::notification::NotificationDraft;
use shared::datetime::format_date;

pub const NEW_REQUEST_TITLE: &str = "New leave request";
pub const STATUS_UPDATED_TITLE: &str = "Leave request updated";

/// One notification per admin for a freshly submitted request.
pub fn new_request_notifications(
    admin_user_ids: &[i64],
    employee_name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<NotificationDraft> {
    let content = format!(
        "{} submitted a leave request from {} to {}",
        employee_name,
        format_date(start_date),
        format_date(end_date)
    );

    admin_user_ids
        .iter()
        .map(|user_id| NotificationDraft {
            user_id: *user_id,
            title: NEW_REQUEST_TITLE.to_string(),
            content: content.clone(),
        })
        .collect()
}

/// Notification to the owner after an admin decision.
pub fn status_update_notification(
    user_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: LeaveStatus,
) -> NotificationDraft {
    NotificationDraft {
        user_id,
        title: STATUS_UPDATED_TITLE.to_string(),
        content: format!(
            "Your leave request from {} to {} has been {}",
            format_date(start_date),
            format_date(end_date),
            status
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, day).unwrap()
    }

    #[test]
    fn test_one_notification_per_admin() {
        let drafts = new_request_notifications(&[1, 2, 3], "Jane Doe", d(5), d(9));
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[1].user_id, 2);
        assert_eq!(drafts[0].title, NEW_REQUEST_TITLE);
        assert_eq!(
            drafts[0].content,
            "Jane Doe submitted a leave request from 05/08/2024 to 09/08/2024"
        );
    }

    #[test]
    fn test_no_admins_no_notifications() {
        assert!(new_request_notifications(&[], "Jane", d(1), d(1)).is_empty());
    }

    #[test]
    fn test_status_update_content() {
        let draft = status_update_notification(7, d(5), d(6), LeaveStatus::Rejected);
        assert_eq!(draft.user_id, 7);
        assert_eq!(
            draft.content,
            "Your leave request from 05/08/2024 to 06/08/2024 has been rejected"
        );
    }
}
