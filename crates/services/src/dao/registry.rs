use bson::doc;
use mongodb::Database;
use taskwise_db::models::{Project, User, Workspace};

use super::base::{DaoError, DaoResult};

/// Lookup of distinct field values per collection, used by clients for
/// availability checks before creating a record.
///
/// The reflective "any collection, any key" lookup this replaces is an
/// explicit allow list here: only the collections and fields named below
/// can be queried. Collections carrying an `is_active` flag only report
/// values from active documents.
pub struct ValueRegistry {
    db: Database,
}

const ALLOWED: &[(&str, &[&str], bool)] = &[
    (User::COLLECTION, &["username", "email"], false),
    (Workspace::COLLECTION, &["name"], true),
    (Project::COLLECTION, &["name"], true),
];

impl ValueRegistry {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    pub async fn existing_values(&self, collection: &str, key: &str) -> DaoResult<Vec<String>> {
        let (name, _, filter_active) = ALLOWED
            .iter()
            .find(|(name, keys, _)| *name == collection && keys.contains(&key))
            .ok_or_else(|| DaoError::NotFoundMsg("Collection not found".to_string()))?;

        let filter = if *filter_active {
            doc! { "is_active": true }
        } else {
            doc! {}
        };

        let values = self
            .db
            .collection::<bson::Document>(name)
            .distinct(key, filter)
            .await?;

        Ok(values
            .into_iter()
            .filter_map(|v| match v {
                bson::Bson::String(s) => Some(s),
                _ => None,
            })
            .collect())
    }
}
