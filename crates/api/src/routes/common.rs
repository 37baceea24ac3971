use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ExistingDataQuery {
    pub collection: Option<String>,
    pub key: Option<String>,
}

/// Distinct values of a whitelisted field, for client-side availability
/// checks (usernames, workspace names, project names).
pub async fn get_existing_data(
    State(state): State<AppState>,
    Query(query): Query<ExistingDataQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let (Some(collection), Some(key)) = (query.collection, query.key) else {
        return Err(ApiError::BadRequest(
            "Collection name and key are required".to_string(),
        ));
    };

    Ok(Json(state.registry.existing_values(&collection, &key).await?))
}
