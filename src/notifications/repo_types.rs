use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// In-app notification. Written by domain events, read by its recipient.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String, // approval, rejection, application, status_change, job_posted, system
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}
