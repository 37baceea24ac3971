use bson::{Document, doc, oid::ObjectId};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use taskwise_db::models::{BoardError, MembershipError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Entity not found")]
    NotFound,
    #[error("{0}")]
    NotFoundMsg(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Validation: {0}")]
    Validation(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

pub type DaoResult<T> = Result<T, DaoError>;

impl From<BoardError> for DaoError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::UnknownColumnInOrder => DaoError::Validation(err.to_string()),
            _ => DaoError::NotFoundMsg(err.to_string()),
        }
    }
}

impl From<MembershipError> for DaoError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::MemberNotFound => DaoError::NotFoundMsg(err.to_string()),
            MembershipError::LastAdmin => DaoError::InvalidState(err.to_string()),
        }
    }
}

pub struct BaseDao<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection_name),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<T> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_one(&self, filter: Document) -> DaoResult<Option<T>> {
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> DaoResult<Vec<T>> {
        let mut cursor = if let Some(sort) = sort {
            self.collection.find(filter).sort(sort).await?
        } else {
            self.collection.find(filter).await?
        };

        let mut results = Vec::new();
        use futures::TryStreamExt;
        while let Some(doc) = cursor.try_next().await? {
            results.push(doc);
        }
        Ok(results)
    }

    pub async fn insert_one(&self, doc: &T) -> DaoResult<ObjectId> {
        let result = self.collection.insert_one(doc).await.map_err(|e| {
            if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(
                ref write_error,
            )) = *e.kind
            {
                if write_error.code == 11000 {
                    return DaoError::DuplicateKey(write_error.message.clone());
                }
            }
            DaoError::Mongo(e)
        })?;

        let id = result
            .inserted_id
            .as_object_id()
            .expect("inserted_id should be ObjectId");
        debug!(?id, "Inserted document");
        Ok(id)
    }

    /// Persists a whole aggregate back after in-memory mutation. This is the
    /// single-writer-per-aggregate model: last write wins, no version check.
    pub async fn replace_by_id(&self, id: ObjectId, doc: &T) -> DaoResult<()> {
        let result = self.collection.replace_one(doc! { "_id": id }, doc).await?;
        if result.matched_count == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }

    pub async fn update_one(&self, filter: Document, update: Document) -> DaoResult<bool> {
        let mut update = update;
        match update.get_document_mut("$set") {
            Ok(set_doc) => {
                set_doc.insert("updated_at", bson::DateTime::now());
            }
            Err(_) => {
                update.insert("$set", doc! { "updated_at": bson::DateTime::now() });
            }
        }

        let result = self.collection.update_one(filter, update).await?;
        Ok(result.modified_count > 0)
    }

    pub async fn update_by_id(&self, id: ObjectId, update: Document) -> DaoResult<bool> {
        self.update_one(doc! { "_id": id }, update).await
    }

    pub async fn count(&self, filter: Document) -> DaoResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }

    pub async fn distinct(&self, key: &str, filter: Document) -> DaoResult<Vec<bson::Bson>> {
        Ok(self.collection.distinct(key, filter).await?)
    }
}
