use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::applications::repo_types::CompanyApplicationRow;
use crate::auth::repo_types::User;
use crate::companies::repo_types::{AdminCompanyRow, Company};
use crate::jobs::repo_types::{AdminJobRow, CompanyJobRow, Job};

/// Platform-wide headline numbers plus the latest arrivals.
#[derive(Debug, Serialize)]
pub struct AdminDashboardResponse {
    pub total_jobseekers: i64,
    pub total_companies: i64,
    pub pending_companies: i64,
    pub approved_companies: i64,
    pub rejected_companies: i64,
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub inactive_jobs: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub recent_companies: Vec<AdminCompanyRow>,
    pub recent_jobs: Vec<AdminJobRow>,
    pub recent_applications: Vec<CompanyApplicationRow>,
}

#[derive(Debug, Deserialize)]
pub struct CompanyListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub company: Option<Uuid>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct RejectCompanyRequest {
    #[serde(default)]
    pub reason: String,
}

/// Outcome of an approve/reject call. `warning` is set instead of
/// `message` when the company was already in the requested state.
#[derive(Debug, Serialize)]
pub struct VettingActionResponse {
    pub message: Option<String>,
    pub warning: Option<String>,
    pub company: Company,
}

#[derive(Debug, Serialize)]
pub struct AdminDeleteResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DailyCount {
    pub day: Date,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct TopCompany {
    pub name: String,
    pub applications: i64,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub applications_by_day: Vec<DailyCount>,
    pub jobs_by_category: Vec<CategoryCount>,
    pub top_companies: Vec<TopCompany>,
}

/// Company record with its posting and application footprint.
#[derive(Debug, Serialize)]
pub struct AdminCompanyDetailResponse {
    pub company: Company,
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub total_applications: i64,
    pub recent_jobs: Vec<CompanyJobRow>,
}

/// Job record with everyone who applied to it.
#[derive(Debug, Serialize)]
pub struct AdminJobDetailResponse {
    pub job: Job,
    pub applications: Vec<CompanyApplicationRow>,
    pub total_applications: i64,
}

/// Wrapper so list endpoints can echo paging back.
#[derive(Debug, Serialize)]
pub struct AdminCompanyListResponse {
    pub companies: Vec<AdminCompanyRow>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminJobListResponse {
    pub jobs: Vec<AdminJobRow>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminUserListResponse {
    pub users: Vec<User>,
    pub limit: i64,
    pub offset: i64,
}
