use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub message: String,
    pub task_id: ObjectId,
    pub project_id: ObjectId,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime,
}

impl Notification {
    pub const COLLECTION: &'static str = "notifications";

    pub fn new(user_id: ObjectId, message: String, task_id: ObjectId, project_id: ObjectId) -> Self {
        Self {
            id: None,
            user_id,
            message,
            task_id,
            project_id,
            is_read: false,
            created_at: DateTime::now(),
        }
    }
}
