use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub img_key: String,
    pub img_url: Option<String>,
    #[serde(default = "default_title")]
    pub title: String,
    pub reset_code: Option<String>,
    pub reset_code_expiry: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_title() -> String {
    "User".to_string()
}

impl User {
    pub const COLLECTION: &'static str = "users";
}
