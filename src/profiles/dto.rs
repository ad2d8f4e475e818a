use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::profiles::repo_types::JobSeekerProfile;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub date_of_birth: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub skills: String,
    pub education: String,
    pub experience: String,
    pub date_of_birth: Option<Date>,
    pub has_resume: bool,
    pub resume_url: Option<String>,
    /// True when this request created the profile.
    pub created: bool,
}

impl ProfileResponse {
    pub fn from_profile(
        profile: &JobSeekerProfile,
        resume_url: Option<String>,
        created: bool,
    ) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            city: profile.city.clone(),
            skills: profile.skills.clone(),
            education: profile.education.clone(),
            experience: profile.experience.clone(),
            date_of_birth: profile.date_of_birth,
            has_resume: profile.has_resume(),
            resume_url,
            created,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub resume_url: String,
}
