pub mod mongo;

use acciofocus_db::models::User;
use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::dao::base::DaoResult;

pub use mongo::MongoUserStore;

/// The persistence surface the room API stands on: the query shapes used
/// by the fan-out protocol, plus `insert` for first-login profile
/// creation. Everything above this trait is storage-agnostic, which is
/// what lets the sync logic run against an in-memory double in tests.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find one user document by external identity id.
    async fn find_by_identity(&self, identity_id: &str) -> DaoResult<Option<User>>;

    /// Find every user document holding a membership copy of the room.
    async fn find_by_room(&self, room_id: &str) -> DaoResult<Vec<User>>;

    /// Bulk-remove the membership copy from every holding document.
    /// Returns the number of documents modified.
    async fn pull_room(&self, room_id: &str) -> DaoResult<u64>;

    /// Whole-document save. Last write wins; saving a concurrently
    /// deleted document is a silent no-op.
    async fn save(&self, user: &User) -> DaoResult<()>;

    async fn insert(&self, user: &User) -> DaoResult<ObjectId>;
}
