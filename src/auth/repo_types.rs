use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::roles::Role;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // unique user ID
    pub username: String,           // unique login name
    pub email: String,              // unique email
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    pub role: String,               // admin, company or jobseeker
    pub phone: String,              // optional contact number, may be empty
    pub is_active: bool,            // disabled accounts cannot log in
    pub created_at: OffsetDateTime, // creation timestamp
    pub updated_at: OffsetDateTime, // last modification timestamp
}

impl User {
    /// Parsed role. `None` only if the row predates the role check
    /// constraint.
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}
