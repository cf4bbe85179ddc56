use crate::error::{AppError, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Session issuance is owned by an external auth service; this module only
/// verifies the tokens it mints. `create_jwt` exists for tests and tooling.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: u64,
    pub exp: u64,
}

/// Creates a signed token for a user.
///
/// # Errors
/// Returns `AppError::Internal` if signing fails.
pub fn create_jwt(user_id: Uuid, secret: &str, ttl_secs: u64) -> Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).map_err(|_| AppError::Internal)?.as_secs();
    let claims = Claims { sub: user_id, iat: now, exp: now + ttl_secs };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| AppError::Internal)
}

/// Verifies a token's signature and expiry.
///
/// # Errors
/// Returns `AppError::AuthError` on any invalid or expired token.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map_err(|_| AppError::AuthError)?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_subject() {
        let user_id = Uuid::new_v4();
        let token = create_jwt(user_id, "test_secret", 60).expect("sign");
        let claims = verify_jwt(&token, "test_secret").expect("verify");
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_jwt(Uuid::new_v4(), "test_secret", 60).expect("sign");
        assert!(matches!(verify_jwt(&token, "other_secret"), Err(AppError::AuthError)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(verify_jwt("not.a.jwt", "test_secret"), Err(AppError::AuthError)));
    }
}
