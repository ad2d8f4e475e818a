use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::jobs::repo_types::PublicJobRow;

/// Create/update payload for a job posting.
#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub city: String,
    pub employment_type: String,
    pub category: String,
    pub experience_required: String,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default = "default_vacancies")]
    pub vacancies: i32,
    #[serde(default)]
    pub application_deadline: Option<Date>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_vacancies() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

/// Browse filters. Everything is optional; unknown sort keys fall back to
/// newest first.
#[derive(Debug, Deserialize)]
pub struct JobFilter {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<PublicJobRow>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct JobCompanyInfo {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub website: String,
    pub about: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub id: Uuid,
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
    pub application_deadline: Option<Date>,
    pub views_count: i32,
    pub created_at: OffsetDateTime,
    pub company: JobCompanyInfo,
    pub deadline_passed: bool,
    /// Only meaningful for an authenticated job seeker; false otherwise.
    pub has_applied: bool,
    pub is_saved: bool,
    pub similar_jobs: Vec<PublicJobRow>,
}

#[derive(Debug, Serialize)]
pub struct SaveJobResponse {
    pub created: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UnsaveJobResponse {
    pub removed: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteJobResponse {
    pub message: String,
}
