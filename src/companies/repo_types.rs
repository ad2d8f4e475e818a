use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::companies::vetting::CompanyStatus;

/// Company record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,                    // owning account
    pub admin_id: Option<Uuid>,           // reviewer who made the last decision
    pub name: String,
    pub registration_number: String,      // unique business registration
    pub email: String,
    pub phone: String,
    pub website: String,
    pub about: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub logo_key: Option<String>,         // storage key, presigned on read
    pub status: String,                   // pending, approved or rejected
    pub is_verified: bool,                // true exactly while approved
    pub rejection_reason: String,
    pub submitted_at: OffsetDateTime,
    pub approved_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Company {
    /// Review state parsed from the stored text. Unknown values read as
    /// pending, which keeps every employer gate closed.
    pub fn vetting_status(&self) -> CompanyStatus {
        CompanyStatus::parse(&self.status).unwrap_or(CompanyStatus::Pending)
    }
}

/// Company row joined with its account, for admin listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminCompanyRow {
    pub id: Uuid,
    pub name: String,
    pub registration_number: String,
    pub email: String,
    pub city: String,
    pub state: String,
    pub status: String,
    pub is_verified: bool,
    pub rejection_reason: String,
    pub submitted_at: OffsetDateTime,
    pub approved_at: Option<OffsetDateTime>,
    pub username: String,
}
