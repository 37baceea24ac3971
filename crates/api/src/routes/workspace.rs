use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use taskwise_db::models::{MemberRole, Workspace};
use taskwise_services::dao::workspace::{MediaDocs, MemberStatus};

use super::parse_oid;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub user_id: String,
    pub role: MemberRole,
    pub is_active: bool,
    pub joined_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub img_url: Option<String>,
    pub projects: Vec<String>,
    pub creator_user_id: String,
    pub is_active: bool,
    pub members: Vec<MemberResponse>,
    pub created_at: Option<String>,
}

pub(crate) fn to_response(workspace: &Workspace) -> WorkspaceResponse {
    WorkspaceResponse {
        id: workspace.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: workspace.name.clone(),
        description: workspace.description.clone(),
        img_url: workspace.img_url.clone(),
        projects: workspace.projects.iter().map(|p| p.to_hex()).collect(),
        creator_user_id: workspace.creator_user_id.to_hex(),
        is_active: workspace.is_active,
        members: workspace
            .members
            .iter()
            .map(|m| MemberResponse {
                user_id: m.user_id.to_hex(),
                role: m.role,
                is_active: m.is_active,
                joined_at: m.joined_at.try_to_rfc3339_string().ok(),
            })
            .collect(),
        created_at: workspace.created_at.try_to_rfc3339_string().ok(),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    pub description: Option<String>,
    pub img_key: Option<String>,
    pub img_url: Option<String>,
    #[serde(default)]
    pub member_emails: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceWithStatuses {
    pub workspace: WorkspaceResponse,
    pub member_statuses: Vec<MemberStatus>,
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateWorkspaceRequest>,
) -> Result<(StatusCode, Json<WorkspaceWithStatuses>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }

    let (workspace, statuses) = state
        .workspaces
        .create(
            body.name,
            body.description,
            body.img_key.unwrap_or_default(),
            body.img_url,
            auth.user_id,
            body.member_emails,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WorkspaceWithStatuses {
            workspace: to_response(&workspace),
            member_statuses: statuses,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub is_active: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<WorkspaceResponse>>, ApiError> {
    let workspaces = state.workspaces.list(query.is_active.unwrap_or(true)).await?;
    Ok(Json(workspaces.iter().map(to_response).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<WorkspaceResponse>, ApiError> {
    let wid = parse_oid(&workspace_id, "workspace_id")?;
    let workspace = state.workspaces.base.find_by_id(wid).await?;
    Ok(Json(to_response(&workspace)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkspaceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub img_key: Option<String>,
    pub img_url: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(workspace_id): Path<String>,
    Json(body): Json<UpdateWorkspaceRequest>,
) -> Result<Json<WorkspaceResponse>, ApiError> {
    let wid = parse_oid(&workspace_id, "workspace_id")?;
    let workspace = state
        .workspaces
        .update(wid, body.name, body.description, body.img_key, body.img_url)
        .await?;
    Ok(Json(to_response(&workspace)))
}

pub async fn deactivate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wid = parse_oid(&workspace_id, "workspace_id")?;
    state.workspaces.deactivate(wid, auth.user_id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Workspace deactivated successfully" }),
    ))
}

pub async fn media_docs(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<MediaDocs>, ApiError> {
    let wid = parse_oid(&workspace_id, "workspace_id")?;
    Ok(Json(state.workspaces.media_docs(wid).await?))
}
