use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

use super::{Claims, Role};
use crate::{db::entities::user, error::AppError};

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal(format!("Token encoding failed: {err}")))
}

/// Claims for a fresh access token. Every call embeds a new jti, so each
/// issued token binds to exactly one refresh-token ledger row.
pub fn make_access_claims(user: &user::Model, ttl_secs: usize) -> Claims {
    let iat = now_unix();
    let exp = iat + ttl_secs;
    Claims {
        sub: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: Role::try_from(user.role.as_str()).unwrap_or(Role::User),
        jti: Uuid::new_v4().to_string(),
        iat,
        exp,
    }
}

/// Validate signature and expiry. The ordinary request boundary.
pub fn decode_token(keys: &JwtKeys, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(token, &keys.dec, &validation)?;
    Ok(data.claims)
}

/// Validate signature only. Used by the refresh flow, where the access token
/// is expected to be past its expiry but must still be provably unforged so
/// its jti can be recovered.
pub fn decode_expired_token(keys: &JwtKeys, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    let data = decode::<Claims>(token, &keys.dec, &validation)?;
    Ok(data.claims)
}

/// Opaque refresh-token value: 32 random bytes, hex encoded. Carries no
/// claims; only the ledger can resolve it.
pub fn new_refresh_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::unauthorized(format!("Invalid or expired token: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use uuid::Uuid;

    use crate::auth::Role;
    use crate::db::entities::user;

    use super::{
        JwtKeys, decode_expired_token, decode_token, encode_token, make_access_claims,
        new_refresh_token,
    };

    fn user_model(role: &str) -> user::Model {
        let now = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid");
        user::Model {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: role.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    #[test]
    fn access_claims_embed_identity_and_fresh_jti() {
        let user = user_model("manager");
        let first = make_access_claims(&user, 60);
        let second = make_access_claims(&user, 60);

        assert_eq!(first.sub, user.id.to_string());
        assert_eq!(first.email, user.email);
        assert_eq!(first.role, Role::Manager);
        assert_eq!(first.exp.saturating_sub(first.iat), 60);
        assert!(Uuid::parse_str(&first.jti).is_ok());
        assert_ne!(first.jti, second.jti, "each token gets its own jti");
    }

    #[test]
    fn unknown_role_string_falls_back_to_user() {
        let claims = make_access_claims(&user_model("root"), 60);
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn encode_decode_roundtrip_with_same_secret() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = make_access_claims(&user_model("admin"), 600);
        let token = encode_token(&keys, &claims).expect("token should encode");

        let decoded = decode_token(&keys, &token).expect("token should decode");
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.role, Role::Admin);
        assert_eq!(decoded.jti, claims.jti);
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let claims = make_access_claims(&user_model("user"), 600);
        let token = encode_token(&JwtKeys::from_secret(b"secret-a"), &claims)
            .expect("token should encode");

        let err = decode_token(&JwtKeys::from_secret(b"secret-b"), &token)
            .expect_err("decode should fail");
        assert!(err.message().starts_with("Invalid or expired token:"));
    }

    #[test]
    fn expired_token_fails_ordinary_decode_but_passes_refresh_decode() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let mut claims = make_access_claims(&user_model("user"), 600);
        claims.iat = claims.iat.saturating_sub(7200);
        claims.exp = claims.iat + 60;
        let token = encode_token(&keys, &claims).expect("token should encode");

        decode_token(&keys, &token).expect_err("expired token should fail");

        let recovered =
            decode_expired_token(&keys, &token).expect("signature-only decode should pass");
        assert_eq!(recovered.jti, claims.jti);
    }

    #[test]
    fn refresh_decode_still_rejects_forged_tokens() {
        let claims = make_access_claims(&user_model("user"), 600);
        let token = encode_token(&JwtKeys::from_secret(b"secret-a"), &claims)
            .expect("token should encode");

        decode_expired_token(&JwtKeys::from_secret(b"secret-b"), &token)
            .expect_err("forged token should fail even without expiry check");
    }

    #[test]
    fn refresh_token_values_are_long_and_distinct() {
        let first = new_refresh_token();
        let second = new_refresh_token();

        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
