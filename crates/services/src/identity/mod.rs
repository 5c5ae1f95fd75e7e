//! Verification of identity-provider tokens.
//!
//! The application never issues credentials itself: callers present a JWT
//! minted by the external provider, and the `sub` claim becomes the user
//! identifier everywhere else in the system.

use acciofocus_config::IdentitySettings;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity provider misconfigured: {0}")]
    Misconfigured(String),
    #[error("Invalid identity token")]
    InvalidToken,
    #[error("Identity token expired")]
    Expired,
}

/// Caller identity established from a verified token.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

pub struct IdentityVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl IdentityVerifier {
    /// RS256 with the provider's PEM public key in production; HS256 with
    /// a shared secret for local development and the test harness.
    pub fn from_settings(settings: &IdentitySettings) -> Result<Self, IdentityError> {
        let algorithm = match settings.algorithm.to_uppercase().as_str() {
            "RS256" => Algorithm::RS256,
            "HS256" => Algorithm::HS256,
            other => {
                return Err(IdentityError::Misconfigured(format!(
                    "Unsupported algorithm: {other}"
                )));
            }
        };

        let decoding = match algorithm {
            Algorithm::RS256 => {
                let pem = settings.public_key_pem.as_ref().ok_or_else(|| {
                    IdentityError::Misconfigured(
                        "identity.public_key_pem is required for RS256".to_string(),
                    )
                })?;
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| IdentityError::Misconfigured(e.to_string()))?
            }
            _ => {
                let secret = settings.secret.as_ref().ok_or_else(|| {
                    IdentityError::Misconfigured(
                        "identity.secret is required for HS256".to_string(),
                    )
                })?;
                DecodingKey::from_secret(secret.as_bytes())
            }
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self { decoding, validation })
    }

    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => IdentityError::Expired,
                    _ => IdentityError::InvalidToken,
                }
            })?;

        Ok(VerifiedIdentity {
            user_id: data.claims.sub,
            name: data.claims.name,
            avatar: data.claims.picture,
        })
    }
}
