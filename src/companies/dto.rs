use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::applications::repo_types::CompanyApplicationRow;
use crate::companies::repo_types::Company;
use crate::jobs::repo_types::CompanyJobRow;

/// Request body for updating the company profile. Registration number and
/// review state are not editable here.
#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct CompanyProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub about: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub status: String,
    pub is_verified: bool,
    pub rejection_reason: String,
    pub logo_url: Option<String>,
    pub submitted_at: OffsetDateTime,
    pub approved_at: Option<OffsetDateTime>,
}

impl CompanyProfileResponse {
    pub fn from_company(company: &Company, logo_url: Option<String>) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            registration_number: company.registration_number.clone(),
            email: company.email.clone(),
            phone: company.phone.clone(),
            website: company.website.clone(),
            about: company.about.clone(),
            address: company.address.clone(),
            city: company.city.clone(),
            state: company.state.clone(),
            status: company.status.clone(),
            is_verified: company.vetting_status().is_verified(),
            rejection_reason: company.rejection_reason.clone(),
            logo_url,
            submitted_at: company.submitted_at,
            approved_at: company.approved_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogoUploadResponse {
    pub logo_url: String,
}

/// Employer landing data: profile, job and application counters, and the
/// latest activity.
#[derive(Debug, Serialize)]
pub struct CompanyDashboardResponse {
    pub company: CompanyProfileResponse,
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub total_applications: i64,
    pub new_applications: i64,
    pub recent_jobs: Vec<CompanyJobRow>,
    pub recent_applications: Vec<CompanyApplicationRow>,
}
