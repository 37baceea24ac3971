use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use chrono::Utc;
use serde::Deserialize;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

/// Accepts a single `file` multipart field, stores it under a
/// timestamp-prefixed key, and hands back a presigned GET URL.
pub async fn upload(
    State(state): State<AppState>,
    _auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut file_data: Option<(String, String, Vec<u8>)> = None; // (filename, content_type, bytes)

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name().unwrap_or("") != "file" {
            continue;
        }
        let filename = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?;
        file_data = Some((filename, content_type, bytes.to_vec()));
    }

    let Some((filename, content_type, bytes)) = file_data else {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    };

    let key = format!("{}-{}", Utc::now().timestamp_millis(), filename);
    state
        .storage
        .put_object(&key, &content_type, bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Error uploading file: {}", e)))?;

    let presigned_url = state.storage.presign_get(&key);
    Ok(Json(serde_json::json!({
        "message": "File uploaded successfully",
        "presigned_url": presigned_url,
        "img_key": key,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ImageUrlQuery {
    pub key: String,
}

/// Re-mints a presigned GET URL for an already stored object.
pub async fn get_image_url(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ImageUrlQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if query.key.is_empty() {
        return Err(ApiError::BadRequest("Key is required".to_string()));
    }
    Ok(Json(serde_json::json!({
        "presigned_url": state.storage.presign_get(&query.key),
    })))
}
