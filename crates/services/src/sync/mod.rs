//! Room synchronization over duplicated membership copies.
//!
//! There is no canonical room record: every member's user document embeds
//! its own copy of the room, and a mutation to shared metadata is fanned
//! out to all other holders. The fan-out is not transactional — the
//! actor's save decides the outcome, peer saves are best-effort.

use std::sync::Arc;

use acciofocus_db::models::{StudyRoom, User};
use bson::DateTime;
use futures::future::join_all;
use nanoid::nanoid;
use thiserror::Error;
use tracing::{info, warn};

use crate::dao::base::DaoError;
use crate::store::UserStore;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("User not found")]
    UserNotFound,
    #[error("Room not found")]
    RoomNotFound,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] DaoError),
}

pub type SyncResult<T> = Result<T, SyncError>;

/// Field-level changes restricted to the shared-field allowlist. Anything
/// outside `{name, description, max_participants, category}` never reaches
/// this struct.
#[derive(Debug, Clone, Default)]
pub struct RoomChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub max_participants: Option<u32>,
    pub category: Option<String>,
}

impl RoomChanges {
    /// Applies the allowed fields and stamps `last_active`. The stamp is
    /// unconditional: an empty change set still refreshes activity.
    fn apply(&self, room: &mut StudyRoom, now: DateTime) {
        if let Some(name) = &self.name {
            room.name = name.clone();
        }
        if let Some(description) = &self.description {
            room.description = Some(description.clone());
        }
        if let Some(max_participants) = self.max_participants {
            room.max_participants = max_participants;
        }
        if let Some(category) = &self.category {
            room.category = Some(category.clone());
        }
        room.last_active = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub max_participants: u32,
    pub is_private: bool,
}

/// Aggregated view of a room: shared fields from one copy, roster built
/// from every holder. `room.favorite` is the caller's own flag, never a
/// flag borrowed from another member's copy.
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub room: StudyRoom,
    pub members: Vec<MemberInfo>,
}

#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub last_active: DateTime,
    pub streak: u32,
}

pub struct RoomSyncService {
    store: Arc<dyn UserStore>,
}

impl RoomSyncService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    async fn member_by_identity(&self, identity_id: &str) -> SyncResult<User> {
        self.store
            .find_by_identity(identity_id)
            .await?
            .ok_or(SyncError::UserNotFound)
    }

    pub async fn detail(&self, actor: &str, room_id: &str) -> SyncResult<RoomDetail> {
        let holders = self.store.find_by_room(room_id).await?;

        let mut room = holders
            .iter()
            .find_map(|u| u.room(room_id))
            .cloned()
            .ok_or(SyncError::RoomNotFound)?;

        // Shared fields come from whichever copy we saw first (they are
        // synced); the per-user flag must come from the caller's own copy.
        room.favorite = holders
            .iter()
            .find(|u| u.identity_id == actor)
            .and_then(|u| u.room(room_id))
            .map(|r| r.favorite)
            .unwrap_or(false);

        let members = holders
            .iter()
            .map(|u| MemberInfo {
                id: u.identity_id.clone(),
                name: u.profile.name.clone(),
                avatar: u.profile.avatar.clone(),
                last_active: u.profile.last_active,
                streak: u.profile.streak,
            })
            .collect();

        Ok(RoomDetail { room, members })
    }

    /// Creator-only update of shared fields, propagated to every copy.
    pub async fn update(
        &self,
        actor: &str,
        room_id: &str,
        changes: RoomChanges,
    ) -> SyncResult<StudyRoom> {
        let mut user = self.member_by_identity(actor).await?;
        let now = DateTime::now();

        let room = user.room_mut(room_id).ok_or(SyncError::RoomNotFound)?;
        if room.created_by != actor {
            return Err(SyncError::Forbidden(
                "Only room creator can edit room".to_string(),
            ));
        }

        changes.apply(room, now);
        let updated = room.clone();
        self.store.save(&user).await.map_err(SyncError::Store)?;

        self.fan_out(room_id, actor, |copy| changes.apply(copy, now))
            .await;

        Ok(updated)
    }

    /// Creator-only delete: remove the actor's copy, then bulk-pull the
    /// membership from every remaining holder (unconditional).
    pub async fn delete(&self, actor: &str, room_id: &str) -> SyncResult<()> {
        let mut user = self.member_by_identity(actor).await?;

        let room = user.room(room_id).ok_or(SyncError::RoomNotFound)?;
        if room.created_by != actor {
            return Err(SyncError::Forbidden(
                "Only room creator can delete room".to_string(),
            ));
        }

        user.remove_room(room_id);
        self.store.save(&user).await.map_err(SyncError::Store)?;

        let removed = self.store.pull_room(room_id).await?;
        info!(room_id, removed, "Room deleted");
        Ok(())
    }

    /// Flips the caller's own `favorite` flag. Never fanned out: the flag
    /// is per-member state on the caller's copy alone.
    pub async fn toggle_favorite(&self, actor: &str, room_id: &str) -> SyncResult<bool> {
        let mut user = self.member_by_identity(actor).await?;

        let room = user.room_mut(room_id).ok_or(SyncError::RoomNotFound)?;
        room.favorite = !room.favorite;
        let favorite = room.favorite;

        self.store.save(&user).await.map_err(SyncError::Store)?;
        Ok(favorite)
    }

    pub async fn create(&self, actor: &str, new: NewRoom) -> SyncResult<StudyRoom> {
        let mut user = self.member_by_identity(actor).await?;
        let now = DateTime::now();

        let room = StudyRoom {
            id: nanoid!(12),
            name: new.name,
            description: new.description,
            category: new.category,
            max_participants: new.max_participants,
            participants: 1,
            is_private: new.is_private,
            private_key: new.is_private.then(|| nanoid!(8)),
            created_by: actor.to_string(),
            created_at: now,
            last_active: now,
            total_sessions: 0,
            favorite: false,
        };

        user.study_rooms.push(room.clone());
        self.store.save(&user).await.map_err(SyncError::Store)?;
        info!(room_id = %room.id, creator = actor, "Room created");
        Ok(room)
    }

    /// Clones the shared fields from any existing copy into the joiner's
    /// document, then fans the new participant count out to every holder.
    pub async fn join(
        &self,
        actor: &str,
        room_id: &str,
        private_key: Option<&str>,
    ) -> SyncResult<StudyRoom> {
        let mut user = self.member_by_identity(actor).await?;
        if user.room(room_id).is_some() {
            return Err(SyncError::Conflict("Already a member".to_string()));
        }

        let holders = self.store.find_by_room(room_id).await?;
        let template = holders
            .iter()
            .find_map(|u| u.room(room_id))
            .ok_or(SyncError::RoomNotFound)?;

        if template.is_private && template.private_key.as_deref() != private_key {
            return Err(SyncError::Forbidden("Invalid room key".to_string()));
        }
        if template.participants >= template.max_participants {
            return Err(SyncError::Conflict("Room is full".to_string()));
        }

        let now = DateTime::now();
        let mut copy = template.clone();
        copy.participants += 1;
        copy.last_active = now;
        copy.favorite = false;

        let joined = copy.clone();
        user.study_rooms.push(copy);
        self.store.save(&user).await.map_err(SyncError::Store)?;

        let participants = joined.participants;
        self.fan_out(room_id, actor, move |peer| {
            peer.participants = participants;
            peer.last_active = now;
        })
        .await;

        Ok(joined)
    }

    /// Any member may leave, the creator included; the room survives as
    /// long as at least one copy remains.
    pub async fn leave(&self, actor: &str, room_id: &str) -> SyncResult<()> {
        let mut user = self.member_by_identity(actor).await?;

        let room = user.room(room_id).ok_or(SyncError::RoomNotFound)?;
        let participants = room.participants.saturating_sub(1);

        user.remove_room(room_id);
        self.store.save(&user).await.map_err(SyncError::Store)?;

        let now = DateTime::now();
        self.fan_out(room_id, actor, move |peer| {
            peer.participants = participants;
            peer.last_active = now;
        })
        .await;

        Ok(())
    }

    pub async fn list(&self, actor: &str) -> SyncResult<Vec<StudyRoom>> {
        Ok(self.member_by_identity(actor).await?.study_rooms)
    }

    /// Applies `mutate` to every other holder's copy and saves the
    /// documents concurrently. Peer failures are logged and swallowed:
    /// the actor's save has already decided the response, so a failed
    /// peer leaves that copy divergent until the next successful sync.
    async fn fan_out<F>(&self, room_id: &str, actor: &str, mutate: F)
    where
        F: Fn(&mut StudyRoom),
    {
        let holders = match self.store.find_by_room(room_id).await {
            Ok(holders) => holders,
            Err(e) => {
                warn!(room_id, error = %e, "Fan-out aborted: failed to load member documents");
                return;
            }
        };

        let mut staged = Vec::new();
        for mut peer in holders {
            if peer.identity_id == actor {
                continue;
            }
            if let Some(copy) = peer.room_mut(room_id) {
                mutate(copy);
                staged.push(peer);
            }
        }

        let results = join_all(staged.iter().map(|peer| self.store.save(peer))).await;
        for (peer, result) in staged.iter().zip(results) {
            if let Err(e) = result {
                warn!(
                    room_id,
                    peer = %peer.identity_id,
                    error = %e,
                    "Peer save failed during fan-out"
                );
            }
        }
    }
}
