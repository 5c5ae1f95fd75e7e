use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("Resource not found")]
    NotFound,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Validation: {0}")]
    Validation(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error(transparent)]
    BsonSer(#[from] bson::ser::Error),
    #[error(transparent)]
    BsonDe(#[from] bson::de::Error),
}

pub type DaoResult<T> = Result<T, DaoError>;

/// Typed access to one collection. Concrete DAOs compose one `BaseDao`
/// per collection they touch.
pub struct BaseDao<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(db: &Database, name: &str) -> Self {
        Self {
            collection: db.collection::<T>(name),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub async fn insert_one(&self, item: &T) -> DaoResult<ObjectId> {
        match self.collection.insert_one(item).await {
            Ok(result) => result
                .inserted_id
                .as_object_id()
                .ok_or_else(|| DaoError::Storage("Inserted id was not an ObjectId".to_string())),
            Err(e) => Err(classify_write_error(e)),
        }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<T> {
        self.find_one(doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_one(&self, filter: Document) -> DaoResult<Option<T>> {
        self.collection.find_one(filter).await.map_err(Into::into)
    }

    pub async fn find_many(&self, filter: Document, sort: Option<Document>) -> DaoResult<Vec<T>> {
        let mut find = self.collection.find(filter);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }
        let cursor = find.await?;
        cursor.try_collect().await.map_err(Into::into)
    }

    pub async fn update_one(&self, filter: Document, update: Document) -> DaoResult<bool> {
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }

    pub async fn update_many(&self, filter: Document, update: Document) -> DaoResult<u64> {
        let result = self.collection.update_many(filter, update).await?;
        Ok(result.modified_count)
    }

    pub async fn replace_one(&self, filter: Document, item: &T) -> DaoResult<bool> {
        let result = self.collection.replace_one(filter, item).await?;
        Ok(result.matched_count > 0)
    }
}

fn classify_write_error(e: mongodb::error::Error) -> DaoError {
    if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(ref we)) =
        *e.kind
    {
        // E11000: unique index violation
        if we.code == 11000 {
            return DaoError::DuplicateKey(we.message.clone());
        }
    }
    DaoError::Mongo(e)
}
