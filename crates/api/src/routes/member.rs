use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use taskwise_db::models::MemberRole;
use taskwise_services::dao::workspace::{
    MemberStatus, MemberView, ProjectSummary, TaskView, WorkspaceSummary,
};

use super::parse_oid;
use super::workspace::{WorkspaceWithStatuses, to_response};
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

pub async fn members(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<Vec<MemberView>>, ApiError> {
    let wid = parse_oid(&workspace_id, "workspace_id")?;
    Ok(Json(state.workspaces.active_members(wid).await?))
}

#[derive(Debug, Deserialize)]
pub struct MemberEmailsRequest {
    pub emails: Vec<String>,
    pub role: Option<MemberRole>,
}

pub async fn add_members(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((workspace_id, admin_user_id)): Path<(String, String)>,
    Json(body): Json<MemberEmailsRequest>,
) -> Result<Json<WorkspaceWithStatuses>, ApiError> {
    let wid = parse_oid(&workspace_id, "workspace_id")?;
    let admin_id = parse_oid(&admin_user_id, "admin_user_id")?;

    let (workspace, statuses) = state
        .workspaces
        .add_members(wid, admin_id, body.emails, body.role)
        .await?;

    Ok(Json(WorkspaceWithStatuses {
        workspace: to_response(&workspace),
        member_statuses: statuses,
    }))
}

pub async fn remove_members(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((workspace_id, admin_user_id)): Path<(String, String)>,
    Json(body): Json<MemberEmailsRequest>,
) -> Result<Json<Vec<MemberStatus>>, ApiError> {
    let wid = parse_oid(&workspace_id, "workspace_id")?;
    let admin_id = parse_oid(&admin_user_id, "admin_user_id")?;

    let (_, statuses) = state
        .workspaces
        .remove_members(wid, admin_id, body.emails)
        .await?;
    Ok(Json(statuses))
}

/// Self-service exit. May deactivate the whole workspace when the last
/// active member leaves.
pub async fn exit(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((workspace_id, user_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wid = parse_oid(&workspace_id, "workspace_id")?;
    let uid = parse_oid(&user_id, "user_id")?;

    let exit = state.workspaces.exit_member(wid, uid).await?;
    let message = if exit.workspace_deactivated {
        "You have exited the workspace and it has been deactivated"
    } else {
        "You have exited the workspace"
    };
    Ok(Json(serde_json::json!({
        "message": message,
        "workspace_deactivated": exit.workspace_deactivated,
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub workspace_id: String,
    pub user_id: String,
    pub role: MemberRole,
}

pub async fn update_role(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(admin_user_id): Path<String>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let admin_id = parse_oid(&admin_user_id, "admin_user_id")?;
    let wid = parse_oid(&body.workspace_id, "workspace_id")?;
    let uid = parse_oid(&body.user_id, "user_id")?;

    state
        .workspaces
        .update_member_role(wid, admin_id, uid, body.role)
        .await?;
    Ok(Json(
        serde_json::json!({ "message": "Member role updated successfully" }),
    ))
}

pub async fn workspace_projects(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    let wid = parse_oid(&workspace_id, "workspace_id")?;
    Ok(Json(state.workspaces.workspace_projects(wid).await?))
}

pub async fn workspace_tasks(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<Vec<TaskView>>, ApiError> {
    let wid = parse_oid(&workspace_id, "workspace_id")?;
    Ok(Json(state.workspaces.workspace_tasks(wid).await?))
}

pub async fn user_workspaces(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<WorkspaceSummary>>, ApiError> {
    let uid = parse_oid(&user_id, "user_id")?;
    Ok(Json(state.workspaces.user_workspaces(uid).await?))
}

pub async fn user_projects(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    let uid = parse_oid(&user_id, "user_id")?;
    Ok(Json(state.workspaces.user_projects(uid).await?))
}

#[derive(Debug, Deserialize)]
pub struct UserTasksQuery {
    pub project_name: Option<String>,
}

pub async fn user_tasks(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<String>,
    Query(query): Query<UserTasksQuery>,
) -> Result<Json<Vec<TaskView>>, ApiError> {
    let uid = parse_oid(&user_id, "user_id")?;
    Ok(Json(
        state
            .workspaces
            .user_tasks(uid, query.project_name.as_deref())
            .await?,
    ))
}
