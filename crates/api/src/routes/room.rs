use axum::{Json, extract::{Path, State}};
use serde::{Deserialize, Serialize};
use validator::Validate;

use acciofocus_db::models::StudyRoom;
use acciofocus_services::sync::{MemberInfo, NewRoom, RoomChanges};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub max_participants: u32,
    pub participants: u32,
    pub is_private: bool,
    pub created_by: String,
    pub created_at: String,
    pub last_active: String,
    pub total_sessions: u64,
    pub favorite: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub last_active: String,
    pub streak: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailResponse {
    pub room: RoomResponse,
    pub members: Vec<MemberResponse>,
    pub member_count: usize,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 40))]
    pub category: Option<String>,
    #[validate(range(min = 2, max = 50))]
    pub max_participants: u32,
    #[serde(default)]
    pub is_private: bool,
}

/// Only the shared-field allowlist is accepted; anything else in the body
/// is dropped by deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 40))]
    pub category: Option<String>,
    #[validate(range(min = 2, max = 50))]
    pub max_participants: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub private_key: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RoomResponse>>, ApiError> {
    let rooms = state.rooms.list(auth.id()).await?;
    Ok(Json(rooms.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateRoomRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let room = state
        .rooms
        .create(
            auth.id(),
            NewRoom {
                name: body.name,
                description: body.description,
                category: body.category,
                max_participants: body.max_participants,
                is_private: body.is_private,
            },
        )
        .await?;

    // The only response that carries the private key: the creator needs
    // it once, to share.
    let private_key = room.private_key.clone();
    Ok(Json(serde_json::json!({
        "room": to_response(room),
        "privateKey": private_key,
    })))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailResponse>, ApiError> {
    let detail = state.rooms.detail(auth.id(), &room_id).await?;

    let members: Vec<MemberResponse> = detail.members.into_iter().map(member_response).collect();
    let member_count = members.len();

    Ok(Json(RoomDetailResponse {
        room: to_response(detail.room),
        members,
        member_count,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_id): Path<String>,
    Json(body): Json<UpdateRoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let changes = RoomChanges {
        name: body.name,
        description: body.description,
        max_participants: body.max_participants,
        category: body.category,
    };

    let room = state.rooms.update(auth.id(), &room_id, changes).await?;
    Ok(Json(to_response(room)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.rooms.delete(auth.id(), &room_id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let favorite = state.rooms.toggle_favorite(auth.id(), &room_id).await?;
    Ok(Json(serde_json::json!({ "favorite": favorite })))
}

pub async fn join(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_id): Path<String>,
    body: Option<Json<JoinRoomRequest>>,
) -> Result<Json<RoomResponse>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let room = state
        .rooms
        .join(auth.id(), &room_id, body.private_key.as_deref())
        .await?;
    Ok(Json(to_response(room)))
}

pub async fn leave(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.rooms.leave(auth.id(), &room_id).await?;
    Ok(Json(serde_json::json!({ "left": true })))
}

pub(crate) fn to_response(r: StudyRoom) -> RoomResponse {
    RoomResponse {
        id: r.id,
        name: r.name,
        description: r.description,
        category: r.category,
        max_participants: r.max_participants,
        participants: r.participants,
        is_private: r.is_private,
        created_by: r.created_by,
        created_at: r.created_at.try_to_rfc3339_string().unwrap_or_default(),
        last_active: r.last_active.try_to_rfc3339_string().unwrap_or_default(),
        total_sessions: r.total_sessions,
        favorite: r.favorite,
    }
}

fn member_response(m: MemberInfo) -> MemberResponse {
    MemberResponse {
        id: m.id,
        name: m.name,
        avatar: m.avatar,
        last_active: m.last_active.try_to_rfc3339_string().unwrap_or_default(),
        streak: m.streak,
    }
}
