use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::applications::repo_types::{Application, ApplicationDetailRow};

#[derive(Debug, Serialize)]
pub struct ApplicationSubmittedResponse {
    pub message: String,
    pub application: Application,
}

/// Query filters for the employer's application list.
#[derive(Debug, Deserialize)]
pub struct CompanyApplicationsFilter {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub job: Option<Uuid>,
}

/// Query filter for the seeker's own application list.
#[derive(Debug, Deserialize)]
pub struct MyApplicationsFilter {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationStatusRequest {
    pub status: String,
    /// Replaces the stored notes when present; absent leaves them untouched.
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateApplicationStatusResponse {
    pub message: String,
    pub application: Application,
}

/// Employer view of one application, resume link included.
#[derive(Debug, Serialize)]
pub struct ApplicationDetailResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub applicant_id: Uuid,
    pub applicant_username: String,
    pub applicant_email: String,
    pub status: String,
    pub notes: String,
    pub cover_letter: String,
    pub applied_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub full_name: String,
    pub phone: String,
    pub city: String,
    pub skills: String,
    pub education: String,
    pub experience: String,
    pub resume_url: String,
}

impl ApplicationDetailResponse {
    pub fn from_row(row: ApplicationDetailRow, resume_url: String) -> Self {
        Self {
            id: row.id,
            job_id: row.job_id,
            job_title: row.job_title,
            applicant_id: row.user_id,
            applicant_username: row.username,
            applicant_email: row.email,
            status: row.status,
            notes: row.notes,
            cover_letter: row.cover_letter,
            applied_at: row.applied_at,
            updated_at: row.updated_at,
            full_name: row.full_name.unwrap_or_default(),
            phone: row.phone.unwrap_or_default(),
            city: row.seeker_city.unwrap_or_default(),
            skills: row.skills.unwrap_or_default(),
            education: row.education.unwrap_or_default(),
            experience: row.experience.unwrap_or_default(),
            resume_url,
        }
    }
}
