use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A user document. Study-room metadata is embedded as one copy per
/// member; there is no canonical room collection — a room exists exactly
/// as long as at least one user document still holds a copy of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// External identity-provider id (`sub` claim), unique.
    pub identity_id: String,
    pub profile: Profile,
    #[serde(default)]
    pub study_rooms: Vec<StudyRoom>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    pub const COLLECTION: &'static str = "users";

    pub fn room(&self, room_id: &str) -> Option<&StudyRoom> {
        self.study_rooms.iter().find(|r| r.id == room_id)
    }

    pub fn room_mut(&mut self, room_id: &str) -> Option<&mut StudyRoom> {
        self.study_rooms.iter_mut().find(|r| r.id == room_id)
    }

    /// Removes the membership copy; returns false if none was held.
    pub fn remove_room(&mut self, room_id: &str) -> bool {
        let before = self.study_rooms.len();
        self.study_rooms.retain(|r| r.id != room_id);
        self.study_rooms.len() < before
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub streak: u32,
    pub last_active: DateTime,
}

/// Embedded study-room membership copy. Every field except `favorite` is
/// shared state that must stay identical across all members' copies;
/// `favorite` belongs to the holding user alone and is never synced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyRoom {
    /// Shared room id, identical across every member's copy.
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: u32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Identity id of the creator, the only member allowed to mutate or
    /// delete shared fields.
    pub created_by: String,
    pub created_at: DateTime,
    pub last_active: DateTime,
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub favorite: bool,
}
