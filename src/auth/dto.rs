use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Request body for job-seeker registration. Registration also creates
/// the seeker profile, seeded from `full_name` and `phone`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
}

/// Request body for company registration. Creates the login account and
/// the company record in one step; the company starts out pending review.
#[derive(Debug, Deserialize)]
pub struct CompanyRegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub registration_number: String,
    pub company_email: String,
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub about: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

/// Request body for login. `identity` accepts a username or an email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identity: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after login, register or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub phone: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            phone: user.phone.clone(),
        }
    }
}
