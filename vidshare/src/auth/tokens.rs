//! Signed, time-bound access and refresh tokens.
//!
//! Both token kinds are HS256 JWTs embedding `{userId, sessionId, ROLE}` with the
//! audience fixed to `"user"`. Access and refresh tokens are signed with separate
//! secrets so one can never be replayed as the other.

use super::{
    errors::{AuthError, AuthResult},
    models::{Role, SessionId, TokenPayload, UserId},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Audience claim carried by every token
pub const TOKEN_AUDIENCE: &str = "user";

/// Access token lifetime in minutes
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Refresh token lifetime in days
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// Selects the secret and lifetime used for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
    #[serde(rename = "ROLE")]
    pub role: Role,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<Claims> for TokenPayload {
    fn from(claims: Claims) -> Self {
        TokenPayload {
            user_id: claims.user_id,
            session_id: claims.session_id,
            role: claims.role,
        }
    }
}

#[derive(Clone)]
struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKey {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// Token service
#[derive(Clone)]
pub struct TokenService {
    access: SigningKey,
    refresh: SigningKey,
}

impl TokenService {
    /// Create a token service
    ///
    /// # Arguments
    ///
    /// * `access_secret` - Secret for 15-minute access tokens
    /// * `refresh_secret` - Secret for 30-day refresh tokens
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        Self {
            access: SigningKey::new(access_secret, Duration::minutes(ACCESS_TOKEN_TTL_MINUTES)),
            refresh: SigningKey::new(refresh_secret, Duration::days(REFRESH_TOKEN_TTL_DAYS)),
        }
    }

    fn key(&self, kind: TokenKind) -> &SigningKey {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Sign a token issued now
    pub fn sign(&self, payload: &TokenPayload, kind: TokenKind) -> AuthResult<String> {
        self.sign_at(payload, kind, Utc::now())
    }

    /// Sign a token with an explicit issue time
    pub fn sign_at(
        &self,
        payload: &TokenPayload,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let key = self.key(kind);
        let claims = Claims {
            user_id: payload.user_id,
            session_id: payload.session_id,
            role: payload.role,
            aud: TOKEN_AUDIENCE.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + key.ttl).timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &key.encoding,
        )?)
    }

    /// Verify a token against the secret of `kind`.
    ///
    /// Every failure cause (expired, bad signature, malformed, wrong audience)
    /// returns the same [`AuthError::InvalidToken`].
    pub fn verify(&self, token: &str, kind: TokenKind) -> AuthResult<TokenPayload> {
        self.decode_with(token, kind, true)
    }

    /// Decode an access token whose signature and audience are valid, ignoring expiry.
    ///
    /// Used by logout so a client holding a stale access token can still end its session.
    pub fn decode_ignoring_expiry(&self, token: &str) -> Option<TokenPayload> {
        self.decode_with(token, TokenKind::Access, false).ok()
    }

    fn decode_with(
        &self,
        token: &str,
        kind: TokenKind,
        validate_exp: bool,
    ) -> AuthResult<TokenPayload> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.leeway = 0;
        validation.validate_exp = validate_exp;

        match decode::<Claims>(token, &self.key(kind).decoding, &validation) {
            Ok(data) => Ok(data.claims.into()),
            Err(err) => {
                let reason = match err.kind() {
                    ErrorKind::ExpiredSignature => "expired",
                    ErrorKind::InvalidAudience => "wrong audience",
                    ErrorKind::InvalidSignature => "bad signature",
                    _ => "malformed",
                };
                log::debug!("Rejected {kind:?} token: {reason}");
                Err(AuthError::InvalidToken)
            }
        }
    }
}
