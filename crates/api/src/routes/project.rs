use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use taskwise_db::models::{Attachment, Column, Priority, Project, Task};
use taskwise_services::dao::workspace::{CommentView, UserRef};

use super::parse_oid;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct ColumnResponse {
    pub id: String,
    pub title: String,
    pub is_active: bool,
    pub task_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub name: String,
    pub content: Option<String>,
    pub is_active: bool,
    pub assignee: Option<UserRef>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<CommentView>,
    pub created_by: UserRef,
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub img_url: Option<String>,
    pub workspace_id: String,
    pub order: Vec<String>,
    pub columns: Vec<ColumnResponse>,
    pub tasks: Vec<TaskResponse>,
    pub is_active: bool,
    pub created_at: Option<String>,
}

fn column_response(column: &Column) -> ColumnResponse {
    ColumnResponse {
        id: column.id.to_hex(),
        title: column.title.clone(),
        is_active: column.is_active,
        task_ids: column.task_ids.iter().map(|id| id.to_hex()).collect(),
    }
}

fn task_response(task: &Task) -> TaskResponse {
    TaskResponse {
        id: task.id.to_hex(),
        name: task.name.clone(),
        content: task.content.clone(),
        is_active: task.is_active,
        assignee: task.assignee.as_ref().map(UserRef::from),
        due_date: task.due_date.and_then(|d| d.try_to_rfc3339_string().ok()),
        priority: task.priority,
        attachments: task.attachments.clone(),
        comments: task.comments.iter().map(CommentView::from).collect(),
        created_by: UserRef::from(&task.created_by),
        created_at: task.created_at.try_to_rfc3339_string().ok(),
    }
}

pub(crate) fn to_response(project: &Project) -> ProjectResponse {
    ProjectResponse {
        id: project.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: project.name.clone(),
        description: project.description.clone(),
        img_url: project.img_url.clone(),
        workspace_id: project.workspace_id.to_hex(),
        order: project.order.iter().map(|id| id.to_hex()).collect(),
        columns: project.columns.iter().map(column_response).collect(),
        tasks: project.tasks.iter().map(task_response).collect(),
        is_active: project.is_active,
        created_at: project.created_at.try_to_rfc3339_string().ok(),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub img_key: Option<String>,
    pub img_url: Option<String>,
    pub workspace_id: String,
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }
    let wid = parse_oid(&body.workspace_id, "workspace_id")?;

    let project = state
        .projects
        .create(
            body.name,
            body.description,
            body.img_key,
            body.img_url,
            wid,
            auth.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&project))))
}

pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let pid = parse_oid(&project_id, "project_id")?;
    let project = state.projects.base.find_by_id(pid).await?;
    Ok(Json(to_response(&project)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub img_key: Option<String>,
    pub img_url: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<String>,
    Json(body): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let pid = parse_oid(&project_id, "project_id")?;
    let project = state
        .projects
        .update(pid, body.name, body.description, body.img_key, body.img_url)
        .await?;
    Ok(Json(to_response(&project)))
}

pub async fn deactivate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pid = parse_oid(&project_id, "project_id")?;
    state.projects.deactivate(pid).await?;
    Ok(Json(
        serde_json::json!({ "message": "Project deactivated successfully" }),
    ))
}
