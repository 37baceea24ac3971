use bson::oid::ObjectId;

use crate::error::ApiError;

pub mod auth;
pub mod board;
pub mod common;
pub mod member;
pub mod notification;
pub mod project;
pub mod task;
pub mod upload;
pub mod workspace;

pub(crate) fn parse_oid(value: &str, label: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid {}", label)))
}
