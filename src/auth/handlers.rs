use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, CompanyRegisterRequest, LoginRequest, PublicUser, RefreshRequest,
            RegisterRequest,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo_types::User,
        roles::Role,
    },
    companies::repo_types::Company,
    error::{is_unique_violation, ApiError},
    profiles::repo_types::JobSeekerProfile,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/register/company", post(register_company))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    validate_credentials(&payload.username, &payload.email, &payload.password)?;
    if payload.full_name.trim().is_empty() {
        return Err(ApiError::validation("Full name is required."));
    }

    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::conflict("Username already taken."));
    }
    if User::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::conflict("Email already registered."));
    }

    let hash = hash_password(&payload.password)?;
    let phone = payload.phone.trim();

    // Account and profile land together or not at all.
    let mut tx = state.db.begin().await?;
    let user = match User::create_tx(
        &mut tx,
        &payload.username,
        &payload.email,
        &hash,
        phone,
        Role::Jobseeker,
    )
    .await
    {
        Ok(u) => u,
        // Registration races resolve at the unique indexes.
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Username or email already registered."))
        }
        Err(e) => return Err(e.into()),
    };
    JobSeekerProfile::create_tx(&mut tx, user.id, payload.full_name.trim(), &user.email, phone)
        .await?;
    tx.commit().await?;

    let response = issue_tokens(&state, &user)?;
    info!(user_id = %user.id, username = %user.username, "job seeker registered");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn register_company(
    State(state): State<AppState>,
    Json(mut payload): Json<CompanyRegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();
    payload.company_email = payload.company_email.trim().to_lowercase();

    validate_credentials(&payload.username, &payload.email, &payload.password)?;
    validate_company_fields(&payload)?;

    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::conflict("Username already taken."));
    }
    if User::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::conflict("Email already registered."));
    }
    if Company::registration_number_exists(&state.db, &payload.registration_number).await? {
        warn!("registration number already used");
        return Err(ApiError::conflict(
            "A company with this registration number already exists.",
        ));
    }
    if Company::email_exists(&state.db, &payload.company_email).await? {
        warn!("company email already used");
        return Err(ApiError::conflict(
            "A company with this email already exists.",
        ));
    }

    let hash = hash_password(&payload.password)?;

    // Account and company land together or not at all.
    let mut tx = state.db.begin().await?;
    let user = match User::create_tx(
        &mut tx,
        &payload.username,
        &payload.email,
        &hash,
        "",
        Role::Company,
    )
    .await
    {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Username or email already registered."))
        }
        Err(e) => return Err(e.into()),
    };
    let company = match Company::create_tx(&mut tx, user.id, &payload).await {
        Ok(c) => c,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict(
                "A company with this registration number or email already exists.",
            ))
        }
        Err(e) => return Err(e.into()),
    };
    tx.commit().await?;

    let response = issue_tokens(&state, &user)?;
    info!(
        user_id = %user.id,
        company_id = %company.id,
        company = %company.name,
        "company registered, pending review"
    );
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let identity = payload.identity.trim();

    let user = match User::find_by_identity(&state.db, identity).await? {
        Some(u) => u,
        None => {
            warn!(identity = %identity, "login unknown identity");
            return Err(ApiError::authentication("Invalid username or password."));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::authentication("Invalid username or password."));
    }

    // Disabled accounts get the same answer as bad credentials.
    if !user.is_active {
        warn!(user_id = %user.id, "login attempt for disabled account");
        return Err(ApiError::authentication("Invalid username or password."));
    }

    let response = issue_tokens(&state, &user)?;
    info!(user_id = %user.id, role = %user.role, "user logged in");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::authentication("Invalid or expired refresh token"))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::authentication("User not found"))?;
    if !user.is_active {
        warn!(user_id = %user.id, "refresh for disabled account");
        return Err(ApiError::authentication("Account disabled"));
    }

    // Tokens are re-signed from the stored role, so role changes take
    // effect at the next refresh.
    let response = issue_tokens(&state, &user)?;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::authentication("User not found"))?;
    Ok(Json(PublicUser::from(&user)))
}

fn issue_tokens(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    let role = user.role().ok_or_else(|| {
        ApiError::Internal(anyhow::anyhow!("user {} has an unknown role", user.id))
    })?;
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id, role)?;
    let refresh_token = keys.sign_refresh(user.id, role)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(user),
    })
}

fn validate_credentials(username: &str, email: &str, password: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::validation("Username is required."));
    }
    if !is_valid_email(email) {
        return Err(ApiError::validation("Invalid email"));
    }
    if password.len() < 8 {
        return Err(ApiError::validation("Password too short"));
    }
    Ok(())
}

fn validate_company_fields(payload: &CompanyRegisterRequest) -> Result<(), ApiError> {
    for (value, message) in [
        (&payload.name, "Company name is required."),
        (&payload.registration_number, "Registration number is required."),
        (&payload.phone, "Phone number is required."),
        (&payload.address, "Address is required."),
        (&payload.city, "City is required."),
        (&payload.state, "State is required."),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::validation(message));
        }
    }
    if !is_valid_email(&payload.company_email) {
        return Err(ApiError::validation("Invalid company email"));
    }
    Ok(())
}

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.io"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("user@nodot"));
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("alice", "alice@example.com", "longenough").is_ok());
        assert!(validate_credentials("", "alice@example.com", "longenough").is_err());
        assert!(validate_credentials("alice", "bad-email", "longenough").is_err());
        assert!(validate_credentials("alice", "alice@example.com", "short").is_err());
    }

    #[test]
    fn test_public_user_serialization_hides_nothing_extra() {
        let response = PublicUser {
            id: uuid::Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: "jobseeker".to_string(),
            phone: "".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(json.contains("jobseeker"));
        assert!(!json.contains("password"));
    }
}
