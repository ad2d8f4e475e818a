use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Job-seeker profile. Created alongside the account at registration;
/// first profile access backfills a row for accounts that missed it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobSeekerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub skills: String,
    pub education: String,
    pub experience: String,
    pub date_of_birth: Option<Date>,
    pub resume_key: Option<String>, // storage key, presigned on read
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl JobSeekerProfile {
    /// Applying requires a resume on file.
    pub fn has_resume(&self) -> bool {
        self.resume_key.is_some()
    }
}
