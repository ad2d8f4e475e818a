use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Job posting as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub location: String,
    pub city: String,
    pub employment_type: String,       // full-time, part-time, contract, internship
    pub category: String,
    pub experience_required: String,   // 0-1, 1-3, 3-5, 5+
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub vacancies: i32,
    pub is_published: bool,            // owner-controlled draft flag
    pub is_active: bool,               // owner or admin can pause a posting
    pub application_deadline: Option<Date>,
    pub views_count: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Job row for the owning company's listing, with the applicant tally.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompanyJobRow {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub employment_type: String,
    pub city: String,
    pub is_published: bool,
    pub is_active: bool,
    pub application_deadline: Option<Date>,
    pub views_count: i32,
    pub application_count: i64,
    pub created_at: OffsetDateTime,
}

/// Card shown in public browse results.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PublicJobRow {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub city: String,
    pub employment_type: String,
    pub category: String,
    pub experience_required: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub vacancies: i32,
    pub application_deadline: Option<Date>,
    pub views_count: i32,
    pub created_at: OffsetDateTime,
    pub company_id: Uuid,
    pub company_name: String,
}

/// Full job joined with its company, before the visibility check.
#[derive(Debug, Clone, FromRow)]
pub struct JobDetailRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub location: String,
    pub city: String,
    pub employment_type: String,
    pub category: String,
    pub experience_required: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub vacancies: i32,
    pub is_published: bool,
    pub is_active: bool,
    pub application_deadline: Option<Date>,
    pub views_count: i32,
    pub created_at: OffsetDateTime,
    pub company_name: String,
    pub company_city: String,
    pub company_website: String,
    pub company_about: String,
    pub company_logo_key: Option<String>,
    pub company_status: String,
}

/// Saved-jobs listing entry: the bookmark plus current job data.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedJobRow {
    pub id: Uuid,
    pub saved_at: OffsetDateTime,
    pub job_id: Uuid,
    pub title: String,
    pub location: String,
    pub city: String,
    pub employment_type: String,
    pub category: String,
    pub is_active: bool,
    pub application_deadline: Option<Date>,
    pub company_name: String,
}

/// Job row for admin moderation listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminJobRow {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub employment_type: String,
    pub city: String,
    pub is_published: bool,
    pub is_active: bool,
    pub application_deadline: Option<Date>,
    pub views_count: i32,
    pub application_count: i64,
    pub created_at: OffsetDateTime,
    pub company_name: String,
    pub company_status: String,
}
