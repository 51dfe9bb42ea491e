/// Stateless access tokens: HS256 JWTs carrying issuer, subject, iat and exp
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Issuer tag stamped into every access token
pub const ACCESS_TOKEN_ISSUER: &str = "chirpy-access";

/// Lifetime of every access token, on login and on refresh alike
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    Invalid,

    #[error("Token has expired")]
    Expired,

    #[error("Token is malformed")]
    Malformed,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    sub: String,
    iat: i64,
    exp: i64,
}

/// Mints and verifies access tokens with a server-wide secret
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AccessTokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Mint a token for `user_id` valid for `ttl` from now
    pub fn mint(&self, user_id: Uuid, ttl: Duration) -> Result<String, TokenError> {
        self.mint_at(user_id, Utc::now().timestamp(), ttl)
    }

    /// Mint a token as if issued at `issued_at` (unix seconds)
    pub fn mint_at(&self, user_id: Uuid, issued_at: i64, ttl: Duration) -> Result<String, TokenError> {
        let ttl_secs = i64::try_from(ttl.as_secs()).map_err(|_| TokenError::Signing("TTL out of range".to_string()))?;

        let claims = Claims {
            iss: ACCESS_TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at + ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return its subject
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token against the clock reading `now` (unix seconds).
    ///
    /// The signature is checked before any claim is read. A token is expired
    /// from the instant `now` reaches `exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.set_issuer(&[ACCESS_TOKEN_ISSUER]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidIssuer | ErrorKind::InvalidAlgorithm => {
                TokenError::Invalid
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
            _ => TokenError::Invalid,
        })?;

        if now >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Malformed)
    }
}
