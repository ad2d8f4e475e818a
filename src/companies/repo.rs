use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::auth::dto::CompanyRegisterRequest;
use crate::companies::dto::UpdateCompanyRequest;
use crate::companies::repo_types::{AdminCompanyRow, Company};
use crate::companies::vetting::CompanyStatus;

impl Company {
    /// Insert the company half of a company registration.
    pub async fn create_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        payload: &CompanyRegisterRequest,
    ) -> sqlx::Result<Company> {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies
                (user_id, name, registration_number, email, phone, website, about,
                 address, city, state)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, admin_id, name, registration_number, email, phone,
                      website, about, address, city, state, logo_key, status, is_verified,
                      rejection_reason, submitted_at, approved_at, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(payload.name.trim())
        .bind(payload.registration_number.trim())
        .bind(&payload.company_email)
        .bind(payload.phone.trim())
        .bind(payload.website.trim())
        .bind(payload.about.trim())
        .bind(payload.address.trim())
        .bind(payload.city.trim())
        .bind(payload.state.trim())
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Company>> {
        sqlx::query_as::<_, Company>(
            r#"
            SELECT id, user_id, admin_id, name, registration_number, email, phone,
                   website, about, address, city, state, logo_key, status, is_verified,
                   rejection_reason, submitted_at, approved_at, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Option<Company>> {
        sqlx::query_as::<_, Company>(
            r#"
            SELECT id, user_id, admin_id, name, registration_number, email, phone,
                   website, about, address, city, state, logo_key, status, is_verified,
                   rejection_reason, submitted_at, approved_at, created_at, updated_at
            FROM companies
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn registration_number_exists(db: &PgPool, number: &str) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM companies WHERE registration_number = $1)",
        )
        .bind(number.trim())
        .fetch_one(db)
        .await
    }

    pub async fn email_exists(db: &PgPool, email: &str) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM companies WHERE email = $1)")
            .bind(email)
            .fetch_one(db)
            .await
    }

    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        payload: &UpdateCompanyRequest,
    ) -> sqlx::Result<Option<Company>> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2, email = $3, phone = $4, website = $5, about = $6,
                address = $7, city = $8, state = $9, updated_at = now()
            WHERE user_id = $1
            RETURNING id, user_id, admin_id, name, registration_number, email, phone,
                      website, about, address, city, state, logo_key, status, is_verified,
                      rejection_reason, submitted_at, approved_at, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(payload.name.trim())
        .bind(payload.email.trim())
        .bind(payload.phone.trim())
        .bind(payload.website.trim())
        .bind(payload.about.trim())
        .bind(payload.address.trim())
        .bind(payload.city.trim())
        .bind(payload.state.trim())
        .fetch_optional(db)
        .await
    }

    pub async fn set_logo(db: &PgPool, company_id: Uuid, logo_key: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE companies SET logo_key = $2, updated_at = now() WHERE id = $1")
            .bind(company_id)
            .bind(logo_key)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Approval writes the status and the verified flag together. The
    /// status guard rides in the UPDATE itself, so an already-approved
    /// row comes back as `None` and racing calls cannot both transition.
    pub async fn mark_approved(
        db: &PgPool,
        company_id: Uuid,
        admin_id: Uuid,
    ) -> sqlx::Result<Option<Company>> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET status = 'approved', is_verified = TRUE, approved_at = now(),
                rejection_reason = '', admin_id = $2, updated_at = now()
            WHERE id = $1 AND status <> 'approved'
            RETURNING id, user_id, admin_id, name, registration_number, email, phone,
                      website, about, address, city, state, logo_key, status, is_verified,
                      rejection_reason, submitted_at, approved_at, created_at, updated_at
            "#,
        )
        .bind(company_id)
        .bind(admin_id)
        .fetch_optional(db)
        .await
    }

    /// Rejection clears the verified flag and records the reason. `None`
    /// when the row is missing or already rejected; an earlier reason is
    /// never overwritten by a repeat call.
    pub async fn mark_rejected(
        db: &PgPool,
        company_id: Uuid,
        admin_id: Uuid,
        reason: &str,
    ) -> sqlx::Result<Option<Company>> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET status = 'rejected', is_verified = FALSE, rejection_reason = $3,
                admin_id = $2, updated_at = now()
            WHERE id = $1 AND status <> 'rejected'
            RETURNING id, user_id, admin_id, name, registration_number, email, phone,
                      website, about, address, city, state, logo_key, status, is_verified,
                      rejection_reason, submitted_at, approved_at, created_at, updated_at
            "#,
        )
        .bind(company_id)
        .bind(admin_id)
        .bind(reason)
        .fetch_optional(db)
        .await
    }

    /// Companies for the admin review queue, optionally filtered by status
    /// or a name/email/registration search.
    pub async fn list_admin(
        db: &PgPool,
        status: Option<CompanyStatus>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<AdminCompanyRow>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT c.id, c.name, c.registration_number, c.email, c.city, c.state,
                    c.status, c.is_verified, c.rejection_reason, c.submitted_at,
                    c.approved_at, u.username
             FROM companies c
             JOIN users u ON u.id = c.user_id
             WHERE TRUE",
        );
        if let Some(status) = status {
            qb.push(" AND c.status = ").push_bind(status.as_str());
        }
        if let Some(term) = search {
            let pattern = format!("%{}%", term);
            qb.push(" AND (c.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.registration_number ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY c.submitted_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        qb.build_query_as::<AdminCompanyRow>().fetch_all(db).await
    }

    pub async fn count_by_status(db: &PgPool, status: CompanyStatus) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(db)
            .await
    }

    pub async fn count_all(db: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies")
            .fetch_one(db)
            .await
    }

    /// Remove a company together with its login account. Jobs,
    /// applications and notifications go with it through the cascades.
    pub async fn delete_with_account(db: &PgPool, company_id: Uuid) -> sqlx::Result<bool> {
        let result =
            sqlx::query("DELETE FROM users WHERE id = (SELECT user_id FROM companies WHERE id = $1)")
                .bind(company_id)
                .execute(db)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
