use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    notifications::{
        dto::{MarkReadResponse, NotificationsResponse},
        repo_types::Notification,
    },
    state::AppState,
};

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/:id/read", post(mark_read))
}

#[instrument(skip(state))]
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let notifications = Notification::list_by_user(&state.db, auth.user_id).await?;
    let unread_count = Notification::unread_count(&state.db, auth.user_id).await?;
    Ok(Json(NotificationsResponse {
        notifications,
        unread_count,
    }))
}

#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    // Scoped update, so another user's notification reads as missing.
    if !Notification::mark_read(&state.db, id, auth.user_id).await? {
        return Err(ApiError::not_found("Notification not found."));
    }
    Ok(Json(MarkReadResponse {
        message: "Notification marked as read.".to_string(),
    }))
}
