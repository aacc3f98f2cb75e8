use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use tickex_core::identity::Identity;

use crate::error::{AppError, AUTH_FAILED_MSG};

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub age: i32,
    pub exp: usize,
}

// ============================================================================
// Token Service
// ============================================================================

/// Issues and verifies the signed, expiring identity tokens accepted by
/// the auth gate. Secret and TTL come from configuration.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_seconds: u64,
    algorithm: Algorithm,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_seconds: u64, algorithm: Algorithm) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
            algorithm,
        }
    }

    /// Encode the caller's claims into a signed token expiring
    /// `ttl_seconds` from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, AppError> {
        let claims = Claims {
            sub: identity.id.to_string(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            phone: identity.phone.clone(),
            gender: identity.gender.clone(),
            age: identity.age,
            exp: (Utc::now() + Duration::seconds(self.ttl_seconds as i64)).timestamp() as usize,
        };

        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
    }

    /// Check signature and expiry and return the decoded identity. Every
    /// failure mode produces the same error; the cause is only logged.
    pub fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(self.algorithm),
        )
        .map_err(|e| {
            debug!("Token rejected: {}", e);
            AppError::AuthenticationError(AUTH_FAILED_MSG.to_string())
        })?;

        let claims = data.claims;
        let id = Uuid::parse_str(&claims.sub).map_err(|e| {
            debug!("Token subject is not a valid id: {}", e);
            AppError::AuthenticationError(AUTH_FAILED_MSG.to_string())
        })?;

        Ok(Identity {
            id,
            name: claims.name,
            email: claims.email,
            phone: claims.phone,
            gender: claims.gender,
            age: claims.age,
        })
    }
}
