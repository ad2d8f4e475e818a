use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::profiles::dto::UpdateProfileRequest;
use crate::profiles::repo_types::JobSeekerProfile;

impl JobSeekerProfile {
    /// Insert the profile row during job-seeker registration, inside the
    /// same transaction that creates the account.
    pub async fn create_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        full_name: &str,
        email: &str,
        phone: &str,
    ) -> sqlx::Result<JobSeekerProfile> {
        sqlx::query_as::<_, JobSeekerProfile>(
            r#"
            INSERT INTO jobseeker_profiles (user_id, full_name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, full_name, email, phone, address, city, skills,
                      education, experience, date_of_birth, resume_key, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Option<JobSeekerProfile>> {
        sqlx::query_as::<_, JobSeekerProfile>(
            r#"
            SELECT id, user_id, full_name, email, phone, address, city, skills,
                   education, experience, date_of_birth, resume_key, created_at, updated_at
            FROM jobseeker_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Fetch the profile, creating one on first access for accounts that
    /// predate profile-at-registration. The fallback row is seeded from
    /// the account's username and email. The bool reports whether this
    /// call created it. Concurrent first accesses race on the unique
    /// user_id index; the loser re-reads.
    pub async fn get_or_create(
        db: &PgPool,
        user_id: Uuid,
    ) -> sqlx::Result<(JobSeekerProfile, bool)> {
        if let Some(profile) = Self::find_by_user(db, user_id).await? {
            return Ok((profile, false));
        }

        let (username, email) = sqlx::query_as::<_, (String, String)>(
            "SELECT username, email FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;

        let inserted = sqlx::query_as::<_, JobSeekerProfile>(
            r#"
            INSERT INTO jobseeker_profiles (user_id, full_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING id, user_id, full_name, email, phone, address, city, skills,
                      education, experience, date_of_birth, resume_key, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(email)
        .fetch_optional(db)
        .await?;

        match inserted {
            Some(profile) => Ok((profile, true)),
            None => {
                let profile = Self::find_by_user(db, user_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok((profile, false))
            }
        }
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        payload: &UpdateProfileRequest,
    ) -> sqlx::Result<Option<JobSeekerProfile>> {
        sqlx::query_as::<_, JobSeekerProfile>(
            r#"
            UPDATE jobseeker_profiles
            SET full_name = $2, email = $3, phone = $4, address = $5, city = $6,
                skills = $7, education = $8, experience = $9, date_of_birth = $10,
                updated_at = now()
            WHERE user_id = $1
            RETURNING id, user_id, full_name, email, phone, address, city, skills,
                      education, experience, date_of_birth, resume_key, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(payload.full_name.trim())
        .bind(payload.email.trim())
        .bind(payload.phone.trim())
        .bind(payload.address.trim())
        .bind(payload.city.trim())
        .bind(payload.skills.trim())
        .bind(payload.education.trim())
        .bind(payload.experience.trim())
        .bind(payload.date_of_birth)
        .fetch_optional(db)
        .await
    }

    pub async fn set_resume(
        db: &PgPool,
        user_id: Uuid,
        resume_key: &str,
    ) -> sqlx::Result<Option<JobSeekerProfile>> {
        sqlx::query_as::<_, JobSeekerProfile>(
            r#"
            UPDATE jobseeker_profiles
            SET resume_key = $2, updated_at = now()
            WHERE user_id = $1
            RETURNING id, user_id, full_name, email, phone, address, city, skills,
                      education, experience, date_of_birth, resume_key, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(resume_key)
        .fetch_optional(db)
        .await
    }
}
