use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use acciofocus_services::identity::VerifiedIdentity;

use crate::{error::ApiError, state::AppState};

/// Verified caller identity, extracted from the bearer token on every
/// authenticated route.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: VerifiedIdentity,
}

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.identity.user_id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match header {
            Some(h) if h.starts_with("Bearer ") => &h[7..],
            _ => return Err(ApiError::Unauthorized("Unauthorized".to_string())),
        };

        let identity = state.identity.verify(token)?;
        Ok(AuthUser { identity })
    }
}
