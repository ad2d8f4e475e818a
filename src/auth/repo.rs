use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::auth::roles::Role;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, phone, is_active, created_at, updated_at";

impl User {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// Look up a user by username or email, for login.
    pub async fn find_by_identity(db: &PgPool, identity: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $2"
        ))
        .bind(identity)
        .bind(identity.to_lowercase())
        .fetch_optional(db)
        .await
    }

    /// Insert a new user inside a caller-owned transaction. Both
    /// registration flows pair this with a second insert, so the account
    /// never lands without its profile or company record.
    pub async fn create_tx(
        tx: &mut Transaction<'_, Postgres>,
        username: &str,
        email: &str,
        password_hash: &str,
        phone: &str,
        role: Role,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash, phone, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .bind(role.as_str())
        .fetch_one(&mut **tx)
        .await
    }

    /// Job-seeker accounts for the admin user list, newest first. The
    /// search also matches the profile's full name when one exists.
    pub async fn list_jobseekers(
        db: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<User>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT u.id, u.username, u.email, u.password_hash, u.role, u.phone,
                    u.is_active, u.created_at, u.updated_at
             FROM users u
             LEFT JOIN jobseeker_profiles p ON p.user_id = u.id
             WHERE u.role = 'jobseeker'",
        );
        if let Some(term) = search {
            let pattern = format!("%{}%", term);
            qb.push(" AND (u.username ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.full_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY u.created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        qb.build_query_as::<User>().fetch_all(db).await
    }

    /// Flip a job seeker's active flag. Scoped to the jobseeker role so
    /// admin and company accounts cannot be disabled this way.
    pub async fn toggle_active_jobseeker(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET is_active = NOT is_active, updated_at = now()
             WHERE id = $1 AND role = 'jobseeker'
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn count_jobseekers(db: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = 'jobseeker'")
            .fetch_one(db)
            .await
    }
}
