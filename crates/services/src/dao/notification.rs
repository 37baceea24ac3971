use bson::{doc, oid::ObjectId};
use mongodb::Database;
use taskwise_db::models::Notification;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct NotificationDao {
    pub base: BaseDao<Notification>,
}

impl NotificationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Notification::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: ObjectId,
        message: String,
        task_id: ObjectId,
        project_id: ObjectId,
    ) -> DaoResult<ObjectId> {
        let notification = Notification::new(user_id, message, task_id, project_id);
        self.base.insert_one(&notification).await
    }

    /// Unread notifications for a user, newest first.
    pub async fn unread_for_user(&self, user_id: ObjectId) -> DaoResult<Vec<Notification>> {
        self.base
            .find_many(
                doc! { "user_id": user_id, "is_read": false },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    pub async fn mark_read(&self, notification_id: ObjectId) -> DaoResult<()> {
        let updated = self
            .base
            .update_by_id(notification_id, doc! { "$set": { "is_read": true } })
            .await?;
        if !updated {
            return Err(DaoError::NotFoundMsg("Notification not found".to_string()));
        }
        Ok(())
    }
}
