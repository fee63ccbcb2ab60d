use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) user_id: i64,
    pub(crate) username: String,
    pub(crate) exp: i64,
}

/// HS256 tokens. Keys are derived once from the secret.
pub(crate) struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl JwtService {
    const DEFAULT_TTL_SECONDS: i64 = 60 * 60;
    const LEEWAY_SECONDS: u64 = 10;

    pub(crate) fn new(secret: &str, ttl_seconds: i64) -> Self {
        let ttl_seconds = if ttl_seconds > 0 {
            ttl_seconds
        } else {
            Self::DEFAULT_TTL_SECONDS
        };

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    pub(crate) fn generate_token(&self, user_id: i64, username: &str) -> Result<String, JwtError> {
        self.sign(Claims {
            user_id,
            username: username.into(),
            exp: (Utc::now() + Duration::seconds(self.ttl_seconds)).timestamp(),
        })
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = Self::LEEWAY_SECONDS;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(JwtError::Decode)
    }

    fn sign(&self, claims: Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(JwtError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Claims, JwtService};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let jwt = JwtService::new(SECRET, 3600);
        let token = jwt.generate_token(7, "alice").expect("token must encode");

        let claims = jwt.verify_token(&token).expect("token must verify");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new(SECRET, 3600);
        let verifier = JwtService::new("another-secret-another-secret-00", 3600);
        let token = issuer.generate_token(7, "alice").expect("token must encode");

        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = JwtService::new(SECRET, 3600);
        let token = jwt
            .sign(Claims {
                user_id: 7,
                username: "alice".to_string(),
                exp: Utc::now().timestamp() - 120,
            })
            .expect("token must encode");

        assert!(jwt.verify_token(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let jwt = JwtService::new(SECRET, 3600);
        assert!(jwt.verify_token("not-a-token").is_err());
    }
}
