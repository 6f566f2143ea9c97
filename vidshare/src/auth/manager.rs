//! Authentication manager implementation.

use chrono::{Duration, Utc};
use std::sync::Arc;

use super::{
    errors::{AuthError, AuthResult},
    models::{
        AuthContext, AuthSession, CodeId, LoginRequest, PasswordResetConfirm,
        PasswordResetIssued, RegisterRequest, Role, Session, SessionId, SessionTokens,
        TokenPayload, User, UserId, VerificationCodeKind,
    },
    password::CredentialHasher,
    sessions::SessionManager,
    tokens::{TokenKind, TokenService},
};
use crate::db::{
    Store, UserRepository, VerificationCodeRepository,
    errors::constraints,
    repository::{CodeLookup, LimitedCode, NewUser, NewVerificationCode, PasswordUpdate},
};
use crate::mail::{Mailer, templates};

/// Email verification code lifetime in hours
pub const EMAIL_VERIFICATION_TTL_HOURS: i64 = 24;

/// Password reset code lifetime in minutes
pub const PASSWORD_RESET_TTL_MINUTES: i64 = 60;

/// Window for password reset rate limiting, in minutes
pub const PASSWORD_RESET_WINDOW_MINUTES: i64 = 5;

/// Password reset codes allowed per user inside the window
pub const PASSWORD_RESET_MAX_PER_WINDOW: i64 = 2;

const MAX_FIELD_LEN: usize = 255;

/// Secrets and origin the auth flows depend on
#[derive(Clone)]
pub struct AuthSettings {
    /// Secret for access tokens
    pub access_secret: String,
    /// Secret for refresh tokens
    pub refresh_secret: String,
    /// Server-side pepper appended to passwords before hashing
    pub pepper: String,
    /// Origin used to build verification and reset links
    pub app_origin: String,
}

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    sessions: SessionManager,
    tokens: TokenService,
    hasher: CredentialHasher,
    app_origin: String,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `store` - Persistence backend
    /// * `mailer` - Outbound mail for verification and reset links
    /// * `settings` - Token secrets, pepper and application origin
    pub fn new(
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        settings: AuthSettings,
    ) -> AuthResult<Self> {
        Ok(Self {
            sessions: SessionManager::new(store.clone()),
            tokens: TokenService::new(&settings.access_secret, &settings.refresh_secret),
            hasher: CredentialHasher::new(settings.pepper)?,
            app_origin: settings.app_origin.trim_end_matches('/').to_string(),
            store,
            mailer,
        })
    }

    /// Token service shared with this orchestrator
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new user
    ///
    /// Creates the account as a viewer, mails an email verification link and opens
    /// a first session. A failed verification mail is logged and does not abort
    /// registration.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidInput` - Email or password malformed
    /// * `AuthError::EmailTaken` - Email already registered
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<AuthSession> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        if self
            .store
            .find_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .store
            .create_user(&NewUser {
                email: request.email,
                password_hash,
                role: Role::Viewer,
            })
            .await
            .map_err(|err| {
                if err.is_conflict_on(constraints::USERS_EMAIL) {
                    AuthError::EmailTaken
                } else {
                    AuthError::Store(err)
                }
            })?;

        let code = self
            .store
            .create_code(&NewVerificationCode {
                user_id: user.id,
                kind: VerificationCodeKind::EmailVerification,
                expires_at: Utc::now() + Duration::hours(EMAIL_VERIFICATION_TTL_HOURS),
            })
            .await?;

        let url = format!("{}/email/verify/{}", self.app_origin, code.id);
        if let Err(err) = self
            .mailer
            .send(templates::verify_email(&user.email, &url))
            .await
        {
            log::warn!("Verification mail to user {} failed: {}", user.id, err);
        }

        let session = self
            .sessions
            .create_session(user.id, request.user_agent)
            .await?;
        let tokens = self.issue_tokens(&user, &session)?;

        log::info!("Registered user {}", user.id);
        Ok(AuthSession {
            user,
            session,
            tokens,
        })
    }

    /// Login a user
    ///
    /// Unknown emails and wrong passwords produce the same error, and both paths
    /// run one Argon2 verification.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Unknown email or wrong password
    pub async fn login(&self, request: LoginRequest) -> AuthResult<AuthSession> {
        let Some(credentials) = self.store.find_credentials(&request.email).await? else {
            self.hasher.verify_decoy(&request.password);
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(&request.password, &credentials.password_hash)
        {
            log::debug!("Failed login for user {}", credentials.user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let user = credentials.user;
        let session = self
            .sessions
            .create_session(user.id, request.user_agent)
            .await?;
        let tokens = self.issue_tokens(&user, &session)?;

        Ok(AuthSession {
            user,
            session,
            tokens,
        })
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The session named by the token is replaced and every other session of the
    /// user is revoked in the same step, so a replayed refresh token fails.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidToken` - Token invalid, user gone, or session no longer live
    pub async fn refresh(
        &self,
        refresh_token: &str,
        user_agent: Option<String>,
    ) -> AuthResult<AuthSession> {
        let payload = self.tokens.verify(refresh_token, TokenKind::Refresh)?;

        let user = self
            .store
            .find_user(payload.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let session = self
            .sessions
            .rotate(user.id, payload.session_id, user_agent)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        let tokens = self.issue_tokens(&user, &session)?;

        log::debug!("Rotated session for user {} to {}", user.id, session.id);
        Ok(AuthSession {
            user,
            session,
            tokens,
        })
    }

    /// End the session named by an access token.
    ///
    /// Expired tokens are accepted as long as their signature checks out. Missing
    /// or invalid tokens are ignored; logout always succeeds.
    pub async fn logout(&self, access_token: Option<&str>) -> AuthResult<()> {
        let Some(payload) = access_token.and_then(|t| self.tokens.decode_ignoring_expiry(t))
        else {
            return Ok(());
        };

        self.sessions.invalidate_session(payload.session_id).await
    }

    /// Resolve an access token to a live session
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidToken` - Token invalid or expired
    /// * `AuthError::SessionExpired` - Session revoked, expired, or owned by someone else
    pub async fn authenticate(&self, access_token: &str) -> AuthResult<AuthContext> {
        let payload = self.tokens.verify(access_token, TokenKind::Access)?;

        let session = self
            .sessions
            .get_session(payload.session_id)
            .await?
            .ok_or(AuthError::SessionExpired)?;

        if session.user_id != payload.user_id {
            log::warn!(
                "Session {} presented by token for user {}",
                session.id,
                payload.user_id
            );
            return Err(AuthError::SessionExpired);
        }

        Ok(AuthContext {
            user_id: payload.user_id,
            session_id: payload.session_id,
            role: payload.role,
        })
    }

    /// Consume an email verification code and mark its owner verified
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidOrExpiredCode` - Code unknown, expired, already used, or of another kind
    pub async fn verify_email(&self, code: CodeId) -> AuthResult<User> {
        let lookup = CodeLookup {
            id: code,
            kind: VerificationCodeKind::EmailVerification,
            now: Utc::now(),
        };

        let user = self
            .store
            .consume_email_verification(&lookup)
            .await?
            .ok_or(AuthError::InvalidOrExpiredCode)?;

        log::info!("Verified email for user {}", user.id);
        Ok(user)
    }

    /// Issue a password reset code and mail the reset link
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - No account for the email
    /// * `AuthError::TooManyRequests` - Two codes already issued in the last five minutes
    /// * `AuthError::MailDelivery` - Reset mail could not be sent
    pub async fn request_password_reset(&self, email: &str) -> AuthResult<PasswordResetIssued> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let now = Utc::now();
        let issued = self
            .store
            .create_limited_code(&LimitedCode {
                code: NewVerificationCode {
                    user_id: user.id,
                    kind: VerificationCodeKind::PasswordReset,
                    expires_at: now + Duration::minutes(PASSWORD_RESET_TTL_MINUTES),
                },
                since: now - Duration::minutes(PASSWORD_RESET_WINDOW_MINUTES),
                max_in_window: PASSWORD_RESET_MAX_PER_WINDOW,
            })
            .await?;
        let Some(code) = issued else {
            log::warn!("Password reset rate limit hit for user {}", user.id);
            return Err(AuthError::TooManyRequests);
        };

        let url = format!(
            "{}/password/reset?code={}&exp={}",
            self.app_origin,
            code.id,
            code.expires_at.timestamp_millis()
        );
        let receipt = self
            .mailer
            .send(templates::password_reset(&user.email, &url))
            .await?;

        Ok(PasswordResetIssued {
            url,
            email_id: receipt.id,
            expires_at: code.expires_at,
        })
    }

    /// Set a new password with a reset code. Every session of the user is revoked.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidInput` - Password malformed
    /// * `AuthError::InvalidOrExpiredCode` - Code unknown, expired, already used, or of another kind
    pub async fn reset_password(&self, request: PasswordResetConfirm) -> AuthResult<User> {
        validate_password(&request.password)?;
        let password_hash = self.hasher.hash(&request.password)?;

        let update = PasswordUpdate {
            code: CodeLookup {
                id: request.code,
                kind: VerificationCodeKind::PasswordReset,
                now: Utc::now(),
            },
            password_hash,
        };

        let user = self
            .store
            .consume_password_reset(&update)
            .await?
            .ok_or(AuthError::InvalidOrExpiredCode)?;

        log::info!("Password reset for user {}", user.id);
        Ok(user)
    }

    /// Current user, without password material
    pub async fn current_user(&self, user_id: UserId) -> AuthResult<User> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Whether a username is still free
    pub async fn username_available(&self, username: &str) -> AuthResult<bool> {
        let username = username.trim();
        if username.is_empty() || username.len() > MAX_FIELD_LEN {
            return Err(AuthError::InvalidInput(
                "Username must be 1-255 characters".to_string(),
            ));
        }

        Ok(self.store.find_user_by_username(username).await?.is_none())
    }

    /// Live sessions of a user, newest first
    pub async fn list_sessions(&self, user_id: UserId) -> AuthResult<Vec<Session>> {
        self.sessions.list_sessions(user_id).await
    }

    /// Revoke one of the user's own sessions
    pub async fn revoke_session(&self, user_id: UserId, session_id: SessionId) -> AuthResult<()> {
        self.sessions.revoke_session(user_id, session_id).await
    }

    fn issue_tokens(&self, user: &User, session: &Session) -> AuthResult<SessionTokens> {
        let payload = TokenPayload {
            user_id: user.id,
            session_id: session.id,
            role: user.role,
        };

        Ok(SessionTokens {
            access_token: self.tokens.sign(&payload, TokenKind::Access)?,
            refresh_token: self.tokens.sign(&payload, TokenKind::Refresh)?,
        })
    }
}

/// Validate email format
fn validate_email(email: &str) -> AuthResult<()> {
    if email.is_empty() || email.len() > MAX_FIELD_LEN {
        return Err(AuthError::InvalidInput(
            "Email must be 1-255 characters".to_string(),
        ));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(AuthError::InvalidInput("Invalid email address".to_string()));
    }
    Ok(())
}

/// Validate password length
fn validate_password(password: &str) -> AuthResult<()> {
    if password.is_empty() || password.len() > MAX_FIELD_LEN {
        return Err(AuthError::InvalidInput(
            "Password must be 1-255 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());

        for bad in ["", "plain", "@b.com", "a@b", "a@.com", "a@b.com.", "a b@c.com", "a@b@c.com"] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
        assert!(validate_email(&format!("{}@b.com", "a".repeat(255))).is_err());
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("x").is_ok());
        assert!(validate_password(&"x".repeat(255)).is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(256)).is_err());
    }
}
