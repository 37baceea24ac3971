use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use taskwise_db::models::User;

use super::base::{BaseDao, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
        img_key: String,
        img_url: Option<String>,
        title: Option<String>,
    ) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: None,
            username,
            email,
            password_hash: Some(password_hash),
            img_key,
            img_url,
            title: title.unwrap_or_else(|| "User".to_string()),
            reset_code: None,
            reset_code_expiry: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn try_find_by_email(&self, email: &str) -> DaoResult<Option<User>> {
        self.base.find_one(doc! { "email": email }).await
    }

    pub async fn set_reset_code(
        &self,
        user_id: ObjectId,
        code: &str,
        expiry: DateTime,
    ) -> DaoResult<bool> {
        self.base
            .update_by_id(
                user_id,
                doc! { "$set": { "reset_code": code, "reset_code_expiry": expiry } },
            )
            .await
    }

    /// Verifies the code and its expiry window without consuming it.
    pub fn reset_code_is_valid(user: &User, code: &str) -> bool {
        match (&user.reset_code, &user.reset_code_expiry) {
            (Some(stored), Some(expiry)) => {
                stored == code
                    && expiry.timestamp_millis() >= DateTime::now().timestamp_millis()
            }
            _ => false,
        }
    }

    pub async fn update_password(&self, user_id: ObjectId, password_hash: &str) -> DaoResult<bool> {
        self.base
            .update_by_id(
                user_id,
                doc! {
                    "$set": { "password_hash": password_hash },
                    "$unset": { "reset_code": "", "reset_code_expiry": "" },
                },
            )
            .await
    }

    pub async fn update_title(&self, user_id: ObjectId, title: &str) -> DaoResult<bool> {
        self.base
            .update_by_id(user_id, doc! { "$set": { "title": title } })
            .await
    }
}
