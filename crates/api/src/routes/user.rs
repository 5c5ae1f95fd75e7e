use axum::{Json, extract::State};
use bson::DateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use acciofocus_db::models::{Profile, User};
use acciofocus_services::dao::base::DaoError;
use acciofocus_services::identity::VerifiedIdentity;

use super::room::{to_response, RoomResponse};
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub streak: u32,
    pub last_active: String,
    pub study_rooms: Vec<RoomResponse>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub avatar: Option<String>,
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = find_or_create(&state, &auth.identity).await?;
    Ok(Json(me_response(user)))
}

pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<MeResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let mut user = find_or_create(&state, &auth.identity).await?;
    if let Some(name) = body.name {
        user.profile.name = name;
    }
    if let Some(avatar) = body.avatar {
        user.profile.avatar = Some(avatar);
    }
    user.profile.last_active = DateTime::now();

    state.users.save(&user).await?;
    Ok(Json(me_response(user)))
}

/// First authenticated request creates the document from token claims.
async fn find_or_create(
    state: &AppState,
    identity: &VerifiedIdentity,
) -> Result<User, ApiError> {
    if let Some(user) = state.users.find_by_identity(&identity.user_id).await? {
        return Ok(user);
    }

    let now = DateTime::now();
    let mut user = User {
        id: None,
        identity_id: identity.user_id.clone(),
        profile: Profile {
            name: identity
                .name
                .clone()
                .unwrap_or_else(|| "Student".to_string()),
            avatar: identity.avatar.clone(),
            streak: 0,
            last_active: now,
        },
        study_rooms: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    match state.users.insert(&user).await {
        Ok(id) => {
            user.id = Some(id);
            Ok(user)
        }
        // Lost a first-login race: another request created the document.
        Err(DaoError::DuplicateKey(_)) => state
            .users
            .find_by_identity(&identity.user_id)
            .await?
            .ok_or_else(|| {
                ApiError::Internal("User vanished after duplicate-key insert".to_string())
            }),
        Err(e) => Err(e.into()),
    }
}

fn me_response(user: User) -> MeResponse {
    MeResponse {
        id: user.identity_id,
        name: user.profile.name,
        avatar: user.profile.avatar,
        streak: user.profile.streak,
        last_active: user
            .profile
            .last_active
            .try_to_rfc3339_string()
            .unwrap_or_default(),
        study_rooms: user.study_rooms.into_iter().map(to_response).collect(),
    }
}
