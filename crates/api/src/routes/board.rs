use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::Deserialize;

use super::parse_oid;
use super::project::{ProjectResponse, to_response};
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AddColumnRequest {
    pub title: String,
}

pub async fn add_column(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<String>,
    Json(body): Json<AddColumnRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let pid = parse_oid(&project_id, "project_id")?;
    let project = state.projects.add_column(pid, body.title).await?;
    Ok((StatusCode::CREATED, Json(to_response(&project))))
}

#[derive(Debug, Deserialize)]
pub struct UpdateColumnRequest {
    pub title: Option<String>,
    pub task_ids: Option<Vec<String>>,
}

pub async fn update_column(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((project_id, column_id)): Path<(String, String)>,
    Json(body): Json<UpdateColumnRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let pid = parse_oid(&project_id, "project_id")?;
    let cid = parse_oid(&column_id, "column_id")?;
    let task_ids = parse_oid_list(body.task_ids, "task_ids")?;

    let project = state
        .projects
        .update_column(pid, cid, body.title, task_ids)
        .await?;
    Ok(Json(to_response(&project)))
}

pub async fn deactivate_column(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((project_id, column_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pid = parse_oid(&project_id, "project_id")?;
    let cid = parse_oid(&column_id, "column_id")?;
    state.projects.deactivate_column(pid, cid).await?;
    Ok(Json(
        serde_json::json!({ "message": "Column deactivated successfully" }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub order: Vec<String>,
}

pub async fn update_order(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(project_id): Path<String>,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let pid = parse_oid(&project_id, "project_id")?;
    let order = body
        .order
        .iter()
        .map(|id| parse_oid(id, "order"))
        .collect::<Result<Vec<_>, _>>()?;

    let project = state.projects.reorder_columns(pid, order).await?;
    Ok(Json(to_response(&project)))
}

#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    pub source_column_id: String,
    pub destination_column_id: String,
}

pub async fn move_task(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((project_id, task_id)): Path<(String, String)>,
    Json(body): Json<MoveTaskRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let pid = parse_oid(&project_id, "project_id")?;
    let tid = parse_oid(&task_id, "task_id")?;
    let source = parse_oid(&body.source_column_id, "source_column_id")?;
    let dest = parse_oid(&body.destination_column_id, "destination_column_id")?;

    let project = state.projects.move_task(pid, tid, source, dest).await?;
    Ok(Json(to_response(&project)))
}

fn parse_oid_list(
    ids: Option<Vec<String>>,
    label: &str,
) -> Result<Option<Vec<ObjectId>>, ApiError> {
    ids.map(|ids| {
        ids.iter()
            .map(|id| parse_oid(id, label))
            .collect::<Result<Vec<_>, _>>()
    })
    .transpose()
}
