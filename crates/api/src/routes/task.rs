use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::DateTime;
use serde::{Deserialize, Serialize};
use taskwise_db::models::{Attachment, Comment, Priority, UserSnapshot};
use taskwise_services::dao::project::{NewTask, TaskPatch};

use super::parse_oid;
use super::project::{ProjectResponse, to_response};
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl UserPayload {
    fn into_snapshot(self, label: &str) -> Result<UserSnapshot, ApiError> {
        Ok(UserSnapshot {
            id: parse_oid(&self.id, label)?,
            username: self.username,
            email: self.email,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    pub user: UserPayload,
    pub text: String,
}

fn parse_comments(payloads: Vec<CommentPayload>) -> Result<Vec<Comment>, ApiError> {
    payloads
        .into_iter()
        .map(|c| {
            Ok(Comment {
                user: c.user.into_snapshot("comment user id")?,
                text: c.text,
            })
        })
        .collect()
}

fn parse_priority(value: Option<String>) -> Result<Option<Priority>, ApiError> {
    match value.as_deref() {
        None => Ok(None),
        Some("Low") => Ok(Some(Priority::Low)),
        Some("Medium") => Ok(Some(Priority::Medium)),
        Some("High") => Ok(Some(Priority::High)),
        Some(_) => Err(ApiError::BadRequest(
            "Invalid priority value. Allowed values are: Low, Medium, High".to_string(),
        )),
    }
}

fn parse_due_date(value: Option<String>) -> Result<Option<DateTime>, ApiError> {
    value
        .map(|v| {
            DateTime::parse_rfc3339_str(&v)
                .map_err(|_| ApiError::BadRequest("Invalid due_date".to_string()))
        })
        .transpose()
}

#[derive(Debug, Deserialize)]
pub struct AddTaskRequest {
    pub name: String,
    pub content: Option<String>,
    pub column_id: String,
    pub assignee: Option<UserPayload>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub comments: Vec<CommentPayload>,
}

#[derive(Debug, Serialize)]
pub struct TaskCreatedResponse {
    pub task_id: String,
    pub project: ProjectResponse,
}

pub async fn add_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<String>,
    Json(body): Json<AddTaskRequest>,
) -> Result<(StatusCode, Json<TaskCreatedResponse>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }
    let pid = parse_oid(&project_id, "project_id")?;
    let column_id = parse_oid(&body.column_id, "column_id")?;

    let input = NewTask {
        name: body.name,
        content: body.content,
        column_id,
        assignee: body
            .assignee
            .map(|a| a.into_snapshot("assignee id"))
            .transpose()?,
        due_date: parse_due_date(body.due_date)?,
        priority: parse_priority(body.priority)?,
        attachments: body.attachments,
        comments: parse_comments(body.comments)?,
        created_by: UserSnapshot {
            id: auth.user_id,
            username: auth.username.clone(),
            email: auth.email.clone(),
        },
    };

    let (task_id, project) = state.projects.add_task(pid, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(TaskCreatedResponse {
            task_id: task_id.to_hex(),
            project: to_response(&project),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub content: Option<String>,
    pub assignee: Option<UserPayload>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub attachments: Option<Vec<Attachment>>,
    pub comments: Option<Vec<CommentPayload>>,
}

pub async fn update_task(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((project_id, task_id)): Path<(String, String)>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let pid = parse_oid(&project_id, "project_id")?;
    let tid = parse_oid(&task_id, "task_id")?;

    let patch = TaskPatch {
        name: body.name,
        content: body.content,
        assignee: body
            .assignee
            .map(|a| a.into_snapshot("assignee id"))
            .transpose()?,
        due_date: parse_due_date(body.due_date)?,
        priority: parse_priority(body.priority)?,
        attachments: body.attachments,
        comments: body.comments.map(parse_comments).transpose()?,
    };

    let project = state.projects.update_task(pid, tid, patch).await?;
    Ok(Json(to_response(&project)))
}

pub async fn deactivate_task(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((project_id, task_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pid = parse_oid(&project_id, "project_id")?;
    let tid = parse_oid(&task_id, "task_id")?;
    state.projects.deactivate_task(pid, tid).await?;
    Ok(Json(
        serde_json::json!({ "message": "Task deactivated successfully" }),
    ))
}
