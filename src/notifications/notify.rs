//! Notification senders for domain events. Delivery is best effort: a
//! failed insert is logged and swallowed so it never fails the request
//! that triggered it.

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::applications::services::ApplicationStatus;
use crate::auth::repo_types::User;
use crate::companies::repo_types::Company;
use crate::notifications::repo_types::Notification;

async fn send(db: &PgPool, user_id: Uuid, title: &str, message: &str, kind: &str) {
    if let Err(e) = Notification::insert(db, user_id, title, message, kind).await {
        warn!(error = %e, user_id = %user_id, kind, "failed to send notification");
    }
}

pub async fn company_approved(db: &PgPool, user_id: Uuid, company_name: &str) {
    let message = format!(
        "Your company \"{}\" has been approved! You can now start posting jobs.",
        company_name
    );
    send(db, user_id, "Company Approved", &message, "approval").await;
}

pub async fn company_rejected(db: &PgPool, user_id: Uuid, company_name: &str, reason: &str) {
    let mut message = format!(
        "Your company \"{}\" registration has been rejected.",
        company_name
    );
    if !reason.trim().is_empty() {
        message.push_str(&format!(" Reason: {}", reason.trim()));
    }
    send(db, user_id, "Company Registration Rejected", &message, "rejection").await;
}

/// Tell the employer about a fresh application. Recipient and applicant
/// name are resolved here; a missing row just drops the notification.
pub async fn new_application(db: &PgPool, company_id: Uuid, applicant_id: Uuid, job_title: &str) {
    let recipient = match Company::find_by_id(db, company_id).await {
        Ok(Some(company)) => company.user_id,
        Ok(None) => {
            warn!(company_id = %company_id, "notification dropped, company missing");
            return;
        }
        Err(e) => {
            warn!(error = %e, company_id = %company_id, "failed to resolve notification recipient");
            return;
        }
    };
    let applicant = match User::find_by_id(db, applicant_id).await {
        Ok(Some(user)) => user.username,
        Ok(None) => applicant_id.to_string(),
        Err(e) => {
            warn!(error = %e, user_id = %applicant_id, "failed to resolve applicant name");
            return;
        }
    };

    let message = format!(
        "New application received for {} from {}",
        job_title, applicant
    );
    send(db, recipient, "New Job Application", &message, "application").await;
}

pub async fn application_status_change(
    db: &PgPool,
    user_id: Uuid,
    job_title: &str,
    status: ApplicationStatus,
) {
    let title = format!("Application Status Updated - {}", job_title);
    send(db, user_id, &title, &status_message(status), "status_change").await;
}

pub async fn job_posted(db: &PgPool, user_id: Uuid, job_title: &str) {
    let message = format!(
        "Your job posting \"{}\" is now live and visible to job seekers.",
        job_title
    );
    send(db, user_id, "Job Posted Successfully", &message, "job_posted").await;
}

fn status_message(status: ApplicationStatus) -> String {
    match status {
        ApplicationStatus::UnderReview => "Your application is now under review".to_string(),
        ApplicationStatus::Shortlisted => {
            "Congratulations! You have been shortlisted".to_string()
        }
        ApplicationStatus::InterviewScheduled => {
            "An interview has been scheduled for your application".to_string()
        }
        ApplicationStatus::Accepted => {
            "Congratulations! Your application has been accepted".to_string()
        }
        ApplicationStatus::Rejected => {
            "Unfortunately, your application was not successful this time".to_string()
        }
        ApplicationStatus::Applied => {
            format!("Your application status has been updated to {}", status)
        }
    }
}

#[cfg(test)]
mod notify_tests {
    use super::*;

    #[test]
    fn test_status_messages_are_specific() {
        assert_eq!(
            status_message(ApplicationStatus::UnderReview),
            "Your application is now under review"
        );
        assert_eq!(
            status_message(ApplicationStatus::Accepted),
            "Congratulations! Your application has been accepted"
        );
        assert_eq!(
            status_message(ApplicationStatus::Rejected),
            "Unfortunately, your application was not successful this time"
        );
    }

    #[test]
    fn test_reset_to_applied_uses_generic_message() {
        assert_eq!(
            status_message(ApplicationStatus::Applied),
            "Your application status has been updated to applied"
        );
    }
}
