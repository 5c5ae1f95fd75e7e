use acciofocus_db::models::User;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use super::UserStore;
use crate::dao::base::{BaseDao, DaoError, DaoResult};

pub struct MongoUserStore {
    base: BaseDao<User>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_identity(&self, identity_id: &str) -> DaoResult<Option<User>> {
        self.base.find_one(doc! { "identity_id": identity_id }).await
    }

    async fn find_by_room(&self, room_id: &str) -> DaoResult<Vec<User>> {
        self.base
            .find_many(
                doc! { "study_rooms.id": room_id },
                Some(doc! { "created_at": 1 }),
            )
            .await
    }

    async fn pull_room(&self, room_id: &str) -> DaoResult<u64> {
        self.base
            .update_many(
                doc! { "study_rooms.id": room_id },
                doc! { "$pull": { "study_rooms": { "id": room_id } } },
            )
            .await
    }

    async fn save(&self, user: &User) -> DaoResult<()> {
        let id = user
            .id
            .ok_or_else(|| DaoError::Validation("Cannot save a user without an id".to_string()))?;
        let mut replacement = user.clone();
        replacement.updated_at = DateTime::now();
        // matched_count 0 means the document was deleted underneath us;
        // whole-document saves are last-write-wins, so that is a no-op.
        self.base.replace_one(doc! { "_id": id }, &replacement).await?;
        Ok(())
    }

    async fn insert(&self, user: &User) -> DaoResult<ObjectId> {
        self.base.insert_one(user).await
    }
}
