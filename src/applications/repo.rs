use sqlx::{PgPool, Postgres, QueryBuilder};
use time::Date;
use uuid::Uuid;

use crate::applications::repo_types::{
    Application, ApplicationDetailRow, CompanyApplicationRow, MyApplicationRow,
};
use crate::applications::services::ApplicationStatus;

impl Application {
    /// Insert a new application. Status starts at 'applied'. The unique
    /// (job_id, user_id) index turns concurrent double-submits into a
    /// database error the caller maps to a conflict.
    pub async fn insert(
        db: &PgPool,
        job_id: Uuid,
        user_id: Uuid,
        company_id: Uuid,
        resume_key: &str,
        cover_letter: &str,
    ) -> sqlx::Result<Application> {
        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (job_id, user_id, company_id, resume_key, cover_letter)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, job_id, user_id, company_id, resume_key, cover_letter,
                      status, notes, applied_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(user_id)
        .bind(company_id)
        .bind(resume_key)
        .bind(cover_letter.trim())
        .fetch_one(db)
        .await
    }

    pub async fn exists_for(db: &PgPool, job_id: Uuid, user_id: Uuid) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM applications WHERE job_id = $1 AND user_id = $2)",
        )
        .bind(job_id)
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> sqlx::Result<Vec<MyApplicationRow>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT a.id, a.status, a.applied_at,
                    j.id AS job_id, j.title AS job_title, j.city AS job_city,
                    j.employment_type, j.is_active AS job_is_active,
                    c.name AS company_name
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             JOIN companies c ON c.id = a.company_id
             WHERE a.user_id = ",
        );
        qb.push_bind(user_id);
        if let Some(status) = status {
            qb.push(" AND a.status = ").push_bind(status.as_str());
        }
        qb.push(" ORDER BY a.applied_at DESC");
        qb.build_query_as::<MyApplicationRow>().fetch_all(db).await
    }

    /// Applications for one job with applicant context, for the admin job
    /// detail.
    pub async fn list_by_job(db: &PgPool, job_id: Uuid) -> sqlx::Result<Vec<CompanyApplicationRow>> {
        sqlx::query_as::<_, CompanyApplicationRow>(
            r#"
            SELECT a.id, a.status, a.applied_at,
                   j.id AS job_id, j.title AS job_title,
                   u.id AS applicant_id, u.username AS applicant_username,
                   u.email AS applicant_email
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN users u ON u.id = a.user_id
            WHERE a.job_id = $1
            ORDER BY a.applied_at DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(db)
        .await
    }

    pub async fn list_by_company(
        db: &PgPool,
        company_id: Uuid,
        status: Option<ApplicationStatus>,
        job_id: Option<Uuid>,
    ) -> sqlx::Result<Vec<CompanyApplicationRow>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT a.id, a.status, a.applied_at,
                    j.id AS job_id, j.title AS job_title,
                    u.id AS applicant_id, u.username AS applicant_username,
                    u.email AS applicant_email
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             JOIN users u ON u.id = a.user_id
             WHERE a.company_id = ",
        );
        qb.push_bind(company_id);
        if let Some(status) = status {
            qb.push(" AND a.status = ").push_bind(status.as_str());
        }
        if let Some(job_id) = job_id {
            qb.push(" AND a.job_id = ").push_bind(job_id);
        }
        qb.push(" ORDER BY a.applied_at DESC");
        qb.build_query_as::<CompanyApplicationRow>().fetch_all(db).await
    }

    pub async fn recent_by_company(
        db: &PgPool,
        company_id: Uuid,
        limit: i64,
    ) -> sqlx::Result<Vec<CompanyApplicationRow>> {
        sqlx::query_as::<_, CompanyApplicationRow>(
            r#"
            SELECT a.id, a.status, a.applied_at,
                   j.id AS job_id, j.title AS job_title,
                   u.id AS applicant_id, u.username AS applicant_username,
                   u.email AS applicant_email
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN users u ON u.id = a.user_id
            WHERE a.company_id = $1
            ORDER BY a.applied_at DESC
            LIMIT $2
            "#,
        )
        .bind(company_id)
        .bind(limit)
        .fetch_all(db)
        .await
    }

    /// One application with applicant context, scoped to the owning company.
    pub async fn find_for_company(
        db: &PgPool,
        id: Uuid,
        company_id: Uuid,
    ) -> sqlx::Result<Option<ApplicationDetailRow>> {
        sqlx::query_as::<_, ApplicationDetailRow>(
            r#"
            SELECT a.id, a.job_id, j.title AS job_title, a.user_id, u.username, u.email,
                   a.status, a.notes, a.cover_letter, a.resume_key, a.applied_at,
                   a.updated_at,
                   p.full_name, p.phone, p.city AS seeker_city, p.skills, p.education,
                   p.experience
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN users u ON u.id = a.user_id
            LEFT JOIN jobseeker_profiles p ON p.user_id = a.user_id
            WHERE a.id = $1 AND a.company_id = $2
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(db)
        .await
    }

    /// Move an application through the pipeline. Notes are replaced only
    /// when the caller supplies them.
    pub async fn update_status(
        db: &PgPool,
        id: Uuid,
        company_id: Uuid,
        status: ApplicationStatus,
        notes: Option<&str>,
    ) -> sqlx::Result<Option<Application>> {
        sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $3, notes = COALESCE($4, notes), updated_at = now()
            WHERE id = $1 AND company_id = $2
            RETURNING id, job_id, user_id, company_id, resume_key, cover_letter,
                      status, notes, applied_at, updated_at
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(status.as_str())
        .bind(notes)
        .fetch_optional(db)
        .await
    }

    pub async fn count_by_company(db: &PgPool, company_id: Uuid) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applications WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(db)
            .await
    }

    /// Applications still sitting in 'applied', i.e. not yet reviewed.
    pub async fn count_new_by_company(db: &PgPool, company_id: Uuid) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications WHERE company_id = $1 AND status = 'applied'",
        )
        .bind(company_id)
        .fetch_one(db)
        .await
    }

    pub async fn count_all(db: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applications")
            .fetch_one(db)
            .await
    }

    pub async fn count_pending_all(db: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applications WHERE status = 'applied'")
            .fetch_one(db)
            .await
    }

    /// Latest applications across all companies, for the admin dashboard.
    pub async fn recent_all(db: &PgPool, limit: i64) -> sqlx::Result<Vec<CompanyApplicationRow>> {
        sqlx::query_as::<_, CompanyApplicationRow>(
            r#"
            SELECT a.id, a.status, a.applied_at,
                   j.id AS job_id, j.title AS job_title,
                   u.id AS applicant_id, u.username AS applicant_username,
                   u.email AS applicant_email
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN users u ON u.id = a.user_id
            ORDER BY a.applied_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(db)
        .await
    }

    /// Daily application volume over the trailing window, UTC days.
    pub async fn count_by_day(db: &PgPool, days: i32) -> sqlx::Result<Vec<(Date, i64)>> {
        sqlx::query_as::<_, (Date, i64)>(
            r#"
            SELECT (applied_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS applications
            FROM applications
            WHERE applied_at >= now() - make_interval(days => $1)
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(days)
        .fetch_all(db)
        .await
    }

    /// Companies ranked by total applications received.
    pub async fn top_companies(db: &PgPool, limit: i64) -> sqlx::Result<Vec<(String, i64)>> {
        sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT c.name, COUNT(a.id) AS applications
            FROM companies c
            JOIN applications a ON a.company_id = c.id
            GROUP BY c.id, c.name
            ORDER BY COUNT(a.id) DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(db)
        .await
    }
}
