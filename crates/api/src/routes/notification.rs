use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use taskwise_db::models::Notification;

use super::parse_oid;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub task_id: String,
    pub project_id: String,
    pub is_read: bool,
    pub created_at: Option<String>,
}

fn to_response(notification: &Notification) -> NotificationResponse {
    NotificationResponse {
        id: notification.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_id: notification.user_id.to_hex(),
        message: notification.message.clone(),
        task_id: notification.task_id.to_hex(),
        project_id: notification.project_id.to_hex(),
        is_read: notification.is_read,
        created_at: notification.created_at.try_to_rfc3339_string().ok(),
    }
}

pub async fn unread(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let uid = parse_oid(&user_id, "user_id")?;
    let notifications = state.notifications.unread_for_user(uid).await?;
    Ok(Json(notifications.iter().map(to_response).collect()))
}

pub async fn mark_read(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let nid = parse_oid(&notification_id, "notification_id")?;
    state.notifications.mark_read(nid).await?;
    Ok(Json(
        serde_json::json!({ "message": "Notification marked as read" }),
    ))
}
