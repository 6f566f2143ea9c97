//! PostgreSQL implementation of the repository traits.
//!
//! Multi-step operations run in one transaction. Toggles lock the target row with
//! `SELECT ... FOR UPDATE` before reading the current membership, so concurrent
//! toggles on the same target serialize and counters never drift.
//!
//! Transactions that touch more than one row of a user's session set, or that
//! issue rate-limited codes, lock the user row first. Lock order is always
//! user row, then sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction, postgres::PgRow};

use super::errors::{StoreError, StoreResult};
use super::repository::{
    CodeLookup, ContentRepository, EngagementRepository, LimitedCode, NewSession, NewUser,
    NewVerificationCode, PasswordUpdate, SessionRepository, SessionRotation, Store,
    UserRepository, VerificationCodeRepository,
};
use crate::auth::models::{
    Credentials, Role, Session, SessionId, User, UserId, VerificationCode,
};
use crate::channels::models::{
    Channel, ChannelId, Comment, CommentId, NewChannel, NewComment, NewVideo, Video, VideoId,
};
use crate::engagement::models::{
    BookmarkToggle, EngagementKey, ReactionKind, ReactionOutcome, SubscriptionKey,
    SubscriptionToggled, Transition,
};

const USER_COLUMNS: &str =
    "id, email, username, verified, role, bio, avatar, created_at, updated_at";
const SESSION_COLUMNS: &str = "id, user_id, user_agent, created_at, expires_at";
const CHANNEL_COLUMNS: &str =
    "id, owner_id, name, slug, description, channel_profile_image, banner_image, created_at";
const VIDEO_COLUMNS: &str = "id, channel_id, title, likes, dislikes, created_at";
const COMMENT_COLUMNS: &str = "id, video_id, user_id, content, likes, dislikes, created_at";

fn user_from_row(row: &PgRow) -> StoreResult<User> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        verified: row.try_get("verified")?,
        role: Role::parse(&role).ok_or_else(|| StoreError::InvalidData(format!("role={role}")))?,
        bio: row.try_get("bio")?,
        avatar: row.try_get("avatar")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn session_from_row(row: &PgRow) -> StoreResult<Session> {
    Ok(Session {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        user_agent: row.try_get("user_agent")?,
        created_at: row.try_get("created_at")?,
        expires_at: row.try_get("expires_at")?,
    })
}

fn channel_from_row(row: &PgRow) -> StoreResult<Channel> {
    Ok(Channel {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        channel_profile_image: row.try_get("channel_profile_image")?,
        banner_image: row.try_get("banner_image")?,
        created_at: row.try_get("created_at")?,
    })
}

fn video_from_row(row: &PgRow) -> StoreResult<Video> {
    Ok(Video {
        id: row.try_get("id")?,
        channel_id: row.try_get("channel_id")?,
        title: row.try_get("title")?,
        likes: row.try_get("likes")?,
        dislikes: row.try_get("dislikes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn comment_from_row(row: &PgRow) -> StoreResult<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        video_id: row.try_get("video_id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        likes: row.try_get("likes")?,
        dislikes: row.try_get("dislikes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn video_reaction_table(kind: ReactionKind) -> &'static str {
    match kind {
        ReactionKind::Like => "video_likes",
        ReactionKind::Dislike => "video_dislikes",
    }
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_video_reaction(
        tx: &mut Transaction<'_, Postgres>,
        key: &EngagementKey,
    ) -> StoreResult<Option<ReactionKind>> {
        for kind in [ReactionKind::Like, ReactionKind::Dislike] {
            let exists: bool = sqlx::query_scalar(&format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = $1 AND video_id = $2)",
                video_reaction_table(kind)
            ))
            .bind(key.user_id)
            .bind(key.target_id)
            .fetch_one(&mut **tx)
            .await?;

            if exists {
                return Ok(Some(kind));
            }
        }
        Ok(None)
    }

    async fn current_comment_reaction(
        tx: &mut Transaction<'_, Postgres>,
        key: &EngagementKey,
    ) -> StoreResult<Option<ReactionKind>> {
        let kind: Option<String> = sqlx::query_scalar(
            "SELECT kind FROM comment_reactions WHERE user_id = $1 AND comment_id = $2",
        )
        .bind(key.user_id)
        .bind(key.target_id)
        .fetch_optional(&mut **tx)
        .await?;

        kind.map(|kind| {
            ReactionKind::parse(&kind)
                .ok_or_else(|| StoreError::InvalidData(format!("reaction kind={kind}")))
        })
        .transpose()
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: &NewUser) -> StoreResult<User> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        user_from_row(&row)
    }

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_credentials(&self, email: &str) -> StoreResult<Option<Credentials>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Credentials {
            user: user_from_row(&row)?,
            password_hash: row.try_get("password_hash")?,
        }))
    }
}

#[async_trait]
impl SessionRepository for PgStore {
    async fn create_session(&self, session: &NewSession) -> StoreResult<Session> {
        let row = sqlx::query(&format!(
            "INSERT INTO sessions (user_id, user_agent, expires_at) VALUES ($1, $2, $3)
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(session.user_id)
        .bind(&session.user_agent)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await?;

        session_from_row(&row)
    }

    async fn find_session(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Session>> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1 AND expires_at > $2"
        ))
        .bind(session_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(session_from_row).transpose()
    }

    async fn list_sessions(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Session>> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions
             WHERE user_id = $1 AND expires_at > $2
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(session_from_row).collect()
    }

    async fn delete_session(&self, session_id: SessionId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user_session(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user_sessions(&self, user_id: UserId) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        lock_user(&mut tx, user_id).await?;

        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn rotate_sessions(&self, rotation: &SessionRotation) -> StoreResult<Option<Session>> {
        let mut tx = self.pool.begin().await?;

        // Rotations of one user serialize on the user row; the loser then finds
        // its stale session already deleted.
        if !lock_user(&mut tx, rotation.user_id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let stale = sqlx::query(
            "DELETE FROM sessions WHERE id = $1 AND user_id = $2 AND expires_at > $3",
        )
        .bind(rotation.stale_session_id)
        .bind(rotation.user_id)
        .bind(rotation.now)
        .execute(&mut *tx)
        .await?;

        if stale.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(rotation.user_id)
            .execute(&mut *tx)
            .await?;

        let replacement = &rotation.replacement;
        let row = sqlx::query(&format!(
            "INSERT INTO sessions (user_id, user_agent, expires_at) VALUES ($1, $2, $3)
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(replacement.user_id)
        .bind(&replacement.user_agent)
        .bind(replacement.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        let session = session_from_row(&row)?;
        tx.commit().await?;
        Ok(Some(session))
    }
}

#[async_trait]
impl VerificationCodeRepository for PgStore {
    async fn create_code(&self, code: &NewVerificationCode) -> StoreResult<VerificationCode> {
        let mut conn = self.pool.acquire().await?;
        insert_code(&mut conn, code).await
    }

    async fn create_limited_code(
        &self,
        request: &LimitedCode,
    ) -> StoreResult<Option<VerificationCode>> {
        let code = &request.code;
        let mut tx = self.pool.begin().await?;

        if !lock_user(&mut tx, code.user_id).await? {
            tx.rollback().await?;
            return Err(StoreError::InvalidData(format!(
                "dangling user id {}",
                code.user_id
            )));
        }

        let recent: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM verification_codes
             WHERE user_id = $1 AND kind = $2 AND created_at > $3",
        )
        .bind(code.user_id)
        .bind(code.kind.as_str())
        .bind(request.since)
        .fetch_one(&mut *tx)
        .await?;

        if recent >= request.max_in_window {
            tx.rollback().await?;
            return Ok(None);
        }

        let created = insert_code(&mut tx, code).await?;
        tx.commit().await?;
        Ok(Some(created))
    }

    async fn consume_email_verification(&self, lookup: &CodeLookup) -> StoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let Some(user_id) = consume_code(&mut tx, lookup).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        let row = sqlx::query(&format!(
            "UPDATE users SET verified = TRUE, updated_at = NOW() WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let user = user_from_row(&row)?;
        tx.commit().await?;
        Ok(Some(user))
    }

    async fn consume_password_reset(&self, update: &PasswordUpdate) -> StoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let Some(user_id) = consume_code(&mut tx, &update.code).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        lock_user(&mut tx, user_id).await?;

        let row = sqlx::query(&format!(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&update.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let user = user_from_row(&row)?;
        tx.commit().await?;
        Ok(Some(user))
    }
}

/// Lock a user row for the rest of the transaction; `false` when the user is missing
async fn lock_user(tx: &mut Transaction<'_, Postgres>, user_id: UserId) -> StoreResult<bool> {
    let locked: Option<UserId> =
        sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?;

    Ok(locked.is_some())
}

async fn insert_code(
    conn: &mut PgConnection,
    code: &NewVerificationCode,
) -> StoreResult<VerificationCode> {
    let row = sqlx::query(
        "INSERT INTO verification_codes (user_id, kind, expires_at) VALUES ($1, $2, $3)
         RETURNING id, user_id, created_at, expires_at",
    )
    .bind(code.user_id)
    .bind(code.kind.as_str())
    .bind(code.expires_at)
    .fetch_one(conn)
    .await?;

    Ok(VerificationCode {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: code.kind,
        created_at: row.try_get("created_at")?,
        expires_at: row.try_get("expires_at")?,
    })
}

/// Delete a live code of the requested kind, returning its owner
async fn consume_code(
    tx: &mut Transaction<'_, Postgres>,
    lookup: &CodeLookup,
) -> StoreResult<Option<UserId>> {
    let user_id: Option<UserId> = sqlx::query_scalar(
        "DELETE FROM verification_codes WHERE id = $1 AND kind = $2 AND expires_at > $3
         RETURNING user_id",
    )
    .bind(lookup.id)
    .bind(lookup.kind.as_str())
    .bind(lookup.now)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(user_id)
}

#[async_trait]
impl EngagementRepository for PgStore {
    async fn toggle_video_reaction(
        &self,
        key: &EngagementKey,
        requested: ReactionKind,
    ) -> StoreResult<Option<ReactionOutcome>> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query("SELECT id FROM videos WHERE id = $1 FOR UPDATE")
            .bind(key.target_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let current = Self::current_video_reaction(&mut tx, key).await?;
        let transition = Transition::resolve(current, requested);

        if let Some(kind) = current {
            sqlx::query(&format!(
                "DELETE FROM {} WHERE user_id = $1 AND video_id = $2",
                video_reaction_table(kind)
            ))
            .bind(key.user_id)
            .bind(key.target_id)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(kind) = transition.next {
            sqlx::query(&format!(
                "INSERT INTO {} (user_id, video_id) VALUES ($1, $2)",
                video_reaction_table(kind)
            ))
            .bind(key.user_id)
            .bind(key.target_id)
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query(
            "UPDATE videos SET likes = likes + $2, dislikes = dislikes + $3 WHERE id = $1
             RETURNING likes, dislikes",
        )
        .bind(key.target_id)
        .bind(transition.delta.likes)
        .bind(transition.delta.dislikes)
        .fetch_one(&mut *tx)
        .await?;

        let outcome = ReactionOutcome {
            is_active: transition.is_active(),
            likes: row.try_get("likes")?,
            dislikes: row.try_get("dislikes")?,
        };
        tx.commit().await?;
        Ok(Some(outcome))
    }

    async fn toggle_comment_reaction(
        &self,
        key: &EngagementKey,
        requested: ReactionKind,
    ) -> StoreResult<Option<ReactionOutcome>> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query("SELECT id FROM comments WHERE id = $1 FOR UPDATE")
            .bind(key.target_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let current = Self::current_comment_reaction(&mut tx, key).await?;
        let transition = Transition::resolve(current, requested);

        match transition.next {
            Some(kind) => {
                sqlx::query(
                    "INSERT INTO comment_reactions (user_id, comment_id, kind) VALUES ($1, $2, $3)
                     ON CONFLICT (user_id, comment_id) DO UPDATE SET kind = EXCLUDED.kind",
                )
                .bind(key.user_id)
                .bind(key.target_id)
                .bind(kind.as_str())
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query("DELETE FROM comment_reactions WHERE user_id = $1 AND comment_id = $2")
                    .bind(key.user_id)
                    .bind(key.target_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let row = sqlx::query(
            "UPDATE comments SET likes = likes + $2, dislikes = dislikes + $3 WHERE id = $1
             RETURNING likes, dislikes",
        )
        .bind(key.target_id)
        .bind(transition.delta.likes)
        .bind(transition.delta.dislikes)
        .fetch_one(&mut *tx)
        .await?;

        let outcome = ReactionOutcome {
            is_active: transition.is_active(),
            likes: row.try_get("likes")?,
            dislikes: row.try_get("dislikes")?,
        };
        tx.commit().await?;
        Ok(Some(outcome))
    }

    async fn video_reaction(&self, key: &EngagementKey) -> StoreResult<Option<ReactionKind>> {
        let mut tx = self.pool.begin().await?;
        let current = Self::current_video_reaction(&mut tx, key).await?;
        tx.commit().await?;
        Ok(current)
    }

    async fn comment_reaction(&self, key: &EngagementKey) -> StoreResult<Option<ReactionKind>> {
        let mut tx = self.pool.begin().await?;
        let current = Self::current_comment_reaction(&mut tx, key).await?;
        tx.commit().await?;
        Ok(current)
    }

    async fn toggle_bookmark(&self, toggle: &BookmarkToggle) -> StoreResult<Option<bool>> {
        let key = &toggle.key;
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query("SELECT id FROM videos WHERE id = $1 FOR UPDATE")
            .bind(key.target_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND video_id = $2")
            .bind(key.user_id)
            .bind(key.target_id)
            .execute(&mut *tx)
            .await?;

        if removed.rows_affected() == 0 {
            sqlx::query("INSERT INTO bookmarks (user_id, video_id, time) VALUES ($1, $2, $3)")
                .bind(key.user_id)
                .bind(key.target_id)
                .bind(toggle.time)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(removed.rows_affected() == 0))
    }

    async fn toggle_subscription(
        &self,
        key: &SubscriptionKey,
    ) -> StoreResult<Option<SubscriptionToggled>> {
        let mut tx = self.pool.begin().await?;

        let channel = sqlx::query(
            "SELECT id, name, channel_profile_image FROM channels WHERE id = $1 FOR UPDATE",
        )
        .bind(key.channel_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(channel) = channel else {
            tx.rollback().await?;
            return Ok(None);
        };

        let removed =
            sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2")
                .bind(key.subscriber_id)
                .bind(key.channel_id)
                .execute(&mut *tx)
                .await?;

        let subscription_id = if removed.rows_affected() == 0 {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO subscriptions (subscriber_id, channel_id, status)
                 VALUES ($1, $2, 'ACTIVE') RETURNING id",
            )
            .bind(key.subscriber_id)
            .bind(key.channel_id)
            .fetch_one(&mut *tx)
            .await?;
            Some(id)
        } else {
            None
        };

        let subscriber_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1")
                .bind(key.channel_id)
                .fetch_one(&mut *tx)
                .await?;

        let toggled = SubscriptionToggled {
            subscription_id,
            channel_id: channel.try_get("id")?,
            channel_name: channel.try_get("name")?,
            channel_profile_image: channel.try_get("channel_profile_image")?,
            subscriber_count,
        };
        tx.commit().await?;
        Ok(Some(toggled))
    }

    async fn is_subscribed(&self, key: &SubscriptionKey) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2)",
        )
        .bind(key.subscriber_id)
        .bind(key.channel_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl ContentRepository for PgStore {
    async fn create_channel(&self, channel: &NewChannel) -> StoreResult<Option<Channel>> {
        let mut tx = self.pool.begin().await?;

        let promoted = sqlx::query(
            "UPDATE users
             SET role = CASE WHEN role = 'ADMIN' THEN role ELSE 'CREATOR' END, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(channel.owner_id)
        .execute(&mut *tx)
        .await?;

        if promoted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query(&format!(
            "INSERT INTO channels
                 (owner_id, name, slug, description, channel_profile_image, banner_image)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CHANNEL_COLUMNS}"
        ))
        .bind(channel.owner_id)
        .bind(&channel.name)
        .bind(&channel.slug)
        .bind(&channel.description)
        .bind(&channel.channel_profile_image)
        .bind(&channel.banner_image)
        .fetch_one(&mut *tx)
        .await?;

        let created = channel_from_row(&row)?;
        tx.commit().await?;
        Ok(Some(created))
    }

    async fn find_channel(&self, channel_id: ChannelId) -> StoreResult<Option<Channel>> {
        let row = sqlx::query(&format!("SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = $1"))
            .bind(channel_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(channel_from_row).transpose()
    }

    async fn create_video(&self, video: &NewVideo) -> StoreResult<Video> {
        let row = sqlx::query(&format!(
            "INSERT INTO videos (channel_id, title) VALUES ($1, $2) RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(video.channel_id)
        .bind(&video.title)
        .fetch_one(&self.pool)
        .await?;

        video_from_row(&row)
    }

    async fn find_video(&self, video_id: VideoId) -> StoreResult<Option<Video>> {
        let row = sqlx::query(&format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"))
            .bind(video_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(video_from_row).transpose()
    }

    async fn create_comment(&self, comment: &NewComment) -> StoreResult<Comment> {
        let row = sqlx::query(&format!(
            "INSERT INTO comments (video_id, user_id, content) VALUES ($1, $2, $3)
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(comment.video_id)
        .bind(comment.user_id)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await?;

        comment_from_row(&row)
    }

    async fn find_comment(&self, comment_id: CommentId) -> StoreResult<Option<Comment>> {
        let row = sqlx::query(&format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"))
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(comment_from_row).transpose()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
