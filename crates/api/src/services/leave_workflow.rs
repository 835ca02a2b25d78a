//! Leave request submission and approval.
//!
//! Inbox notifications are written in the same transaction as the request
//! change. Email goes out after commit through the best-effort [`Notifier`]
//! and its outcome never changes the response.

use domain::models::leave_request::{
    LeaveRequestResponse, LeaveStatus, SubmitLeaveRequest, UpdateLeaveStatusRequest,
};
use domain::models::CurrentUser;
use domain::services::leave_messages::{new_request_notifications, status_update_notification};
use domain::services::{LeaveMailData, MailTemplate, Notifier, Recipient};
use persistence::entities::LeaveRequestWithEmployeeEntity;
use persistence::repositories::{LeaveRequestRepository, NewLeaveRequest, UserRepository};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::metrics::{record_leave_decision, record_leave_submitted};

pub struct LeaveWorkflow {
    leaves: LeaveRequestRepository,
    users: UserRepository,
    notifier: Arc<dyn Notifier>,
}

impl LeaveWorkflow {
    pub fn new(pool: PgPool, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            leaves: LeaveRequestRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            notifier,
        }
    }

    /// Files a pending request for the caller's own employee profile and
    /// notifies every admin.
    pub async fn submit(
        &self,
        user: &CurrentUser,
        request: SubmitLeaveRequest,
    ) -> Result<LeaveRequestResponse, ApiError> {
        let employee_id = user
            .employee_id
            .ok_or_else(ApiError::employee_profile_missing)?;
        request.validate_all()?;

        let admins = self.users.list_admin_contacts().await?;
        let admin_ids: Vec<i64> = admins.iter().map(|a| a.id).collect();
        let drafts = new_request_notifications(
            &admin_ids,
            &user.name,
            request.start_date,
            request.end_date,
        );

        let new = NewLeaveRequest {
            employee_id,
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason.trim().to_string(),
            leave_type: request.leave_type.trim().to_string(),
        };
        let created = self.leaves.create_with_notifications(&new, &drafts).await?;
        record_leave_submitted();

        let stored = self
            .leaves
            .find_with_employee(created.id)
            .await?
            .ok_or_else(|| ApiError::Internal("Created leave request vanished".into()))?;

        tracing::info!(
            leave_request_id = stored.id,
            employee_id,
            admins = admins.len(),
            "Leave request submitted"
        );

        let recipients: Vec<Recipient> = admins.into_iter().map(Recipient::from).collect();
        self.notifier
            .notify(&recipients, MailTemplate::NewLeaveRequest, &mail_data(&stored))
            .await;

        Ok(stored.into())
    }

    /// Applies an admin decision to a pending request.
    pub async fn update_status(
        &self,
        id: i64,
        request: UpdateLeaveStatusRequest,
    ) -> Result<LeaveRequestResponse, ApiError> {
        request.validate()?;
        let decision = request
            .decision()
            .ok_or_else(|| ApiError::field("status", "The selected status is invalid."))?;

        let existing = self
            .leaves
            .find_with_employee(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Leave request not found".into()))?;

        let current = LeaveStatus::from(existing.status);
        if !current.can_transition_to(decision) {
            return Err(already_decided(current));
        }

        let draft = status_update_notification(
            existing.user_id,
            existing.start_date,
            existing.end_date,
            decision,
        );

        // A concurrent decision may have landed since the read above.
        let Some(decided) = self.leaves.decide(id, decision.into(), Some(&draft)).await? else {
            let latest = self.leaves.find_with_employee(id).await?;
            return Err(match latest {
                Some(row) => already_decided(row.status.into()),
                None => ApiError::NotFound("Leave request not found".into()),
            });
        };

        record_leave_decision(decision.as_str());
        tracing::info!(leave_request_id = id, status = %decision, "Leave request decided");

        let owner = Recipient {
            email: decided.user_email.clone(),
            name: decided.employee_name.clone(),
        };
        self.notifier
            .notify(
                std::slice::from_ref(&owner),
                MailTemplate::LeaveStatusUpdated,
                &mail_data(&decided),
            )
            .await;

        Ok(decided.into())
    }
}

fn already_decided(status: LeaveStatus) -> ApiError {
    ApiError::Conflict(format!("This leave request has already been {}.", status))
}

fn mail_data(row: &LeaveRequestWithEmployeeEntity) -> LeaveMailData {
    LeaveMailData {
        leave_request_id: row.id,
        employee_name: row.employee_name.clone(),
        leave_type: row.leave_type.clone(),
        reason: row.reason.clone(),
        start_date: row.start_date,
        end_date: row.end_date,
        days: row.days(),
        status: row.status.into(),
    }
}
