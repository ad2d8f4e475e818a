use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Application as stored. One row per (job, seeker) pair.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub resume_key: String,            // object key of the resume snapshot for this application
    pub cover_letter: String,
    pub status: String,                // applied, under_review, shortlisted, interview_scheduled, accepted, rejected
    pub notes: String,                 // employer-only notes, never shown to the seeker
    pub applied_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Row in the employer's application listings and dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompanyApplicationRow {
    pub id: Uuid,
    pub status: String,
    pub applied_at: OffsetDateTime,
    pub job_id: Uuid,
    pub job_title: String,
    pub applicant_id: Uuid,
    pub applicant_username: String,
    pub applicant_email: String,
}

/// Row in the seeker's own application list.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MyApplicationRow {
    pub id: Uuid,
    pub status: String,
    pub applied_at: OffsetDateTime,
    pub job_id: Uuid,
    pub job_title: String,
    pub job_city: String,
    pub employment_type: String,
    pub job_is_active: bool,
    pub company_name: String,
}

/// Full employer view of one application, with the applicant's profile
/// joined in. Profile columns are null when the seeker never filled one in.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationDetailRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub status: String,
    pub notes: String,
    pub cover_letter: String,
    pub resume_key: String,
    pub applied_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub seeker_city: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
}
