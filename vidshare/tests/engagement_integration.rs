//! Integration tests for engagement toggles and channel creation.

use std::sync::Arc;
use vidshare::auth::{Role, UserId};
use vidshare::channels::{ChannelManager, CreateChannelRequest};
use vidshare::channels::models::{NewComment, NewVideo};
use vidshare::db::{ContentRepository, MemoryStore, UserRepository, repository::NewUser};
use vidshare::engagement::{
    EngagementError, EngagementManager, ReactionKind, SubscriptionStatus,
};

struct Fixture {
    store: Arc<MemoryStore>,
    engagement: EngagementManager,
    owner: UserId,
    viewer: UserId,
    channel_id: i64,
    video_id: i64,
    comment_id: i64,
}

async fn create_user(store: &MemoryStore, email: &str) -> UserId {
    store
        .create_user(&NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Viewer,
        })
        .await
        .unwrap()
        .id
}

async fn setup() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let owner = create_user(&store, "owner@example.com").await;
    let viewer = create_user(&store, "viewer@example.com").await;

    let channel = ChannelManager::new(store.clone())
        .create_channel(
            owner,
            CreateChannelRequest {
                name: "Owner's Kitchen".to_string(),
                slug: "owners-kitchen".to_string(),
                channel_profile_image: Some("https://img.example.com/p.png".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let video = store
        .create_video(&NewVideo {
            channel_id: channel.id,
            title: "Bread".to_string(),
        })
        .await
        .unwrap();

    let comment = store
        .create_comment(&NewComment {
            video_id: video.id,
            user_id: owner,
            content: "First".to_string(),
        })
        .await
        .unwrap();

    Fixture {
        engagement: EngagementManager::new(store.clone()),
        store,
        owner,
        viewer,
        channel_id: channel.id,
        video_id: video.id,
        comment_id: comment.id,
    }
}

#[tokio::test]
async fn test_like_dislike_scenario() {
    let f = setup().await;
    let e = &f.engagement;

    let liked = e
        .toggle_video_reaction(f.viewer, f.video_id, ReactionKind::Like)
        .await
        .unwrap();
    assert!(liked.is_active);
    assert_eq!((liked.likes, liked.dislikes), (1, 0));

    let disliked = e
        .toggle_video_reaction(f.viewer, f.video_id, ReactionKind::Dislike)
        .await
        .unwrap();
    assert!(disliked.is_active);
    assert_eq!((disliked.likes, disliked.dislikes), (0, 1));
    assert_eq!(
        e.video_reaction(f.viewer, f.video_id).await.unwrap(),
        Some(ReactionKind::Dislike)
    );

    let cleared = e
        .toggle_video_reaction(f.viewer, f.video_id, ReactionKind::Dislike)
        .await
        .unwrap();
    assert!(!cleared.is_active);
    assert_eq!((cleared.likes, cleared.dislikes), (0, 0));
    assert_eq!(e.video_reaction(f.viewer, f.video_id).await.unwrap(), None);
}

#[tokio::test]
async fn test_like_twice_restores_counter() {
    let f = setup().await;
    let e = &f.engagement;

    e.toggle_video_reaction(f.owner, f.video_id, ReactionKind::Like)
        .await
        .unwrap();
    let before = f.store.find_video(f.video_id).await.unwrap().unwrap().likes;

    e.toggle_video_reaction(f.viewer, f.video_id, ReactionKind::Like)
        .await
        .unwrap();
    let second = e
        .toggle_video_reaction(f.viewer, f.video_id, ReactionKind::Like)
        .await
        .unwrap();

    assert!(!second.is_active);
    assert_eq!(second.likes, before);
}

#[tokio::test]
async fn test_reactions_are_per_user() {
    let f = setup().await;
    let e = &f.engagement;

    e.toggle_video_reaction(f.owner, f.video_id, ReactionKind::Like)
        .await
        .unwrap();
    let outcome = e
        .toggle_video_reaction(f.viewer, f.video_id, ReactionKind::Dislike)
        .await
        .unwrap();

    assert_eq!((outcome.likes, outcome.dislikes), (1, 1));
}

#[tokio::test]
async fn test_missing_targets() {
    let f = setup().await;
    let e = &f.engagement;

    assert!(matches!(
        e.toggle_video_reaction(f.viewer, 9999, ReactionKind::Like).await,
        Err(EngagementError::VideoNotFound)
    ));
    assert!(matches!(
        e.toggle_comment_reaction(f.viewer, 9999, ReactionKind::Like).await,
        Err(EngagementError::CommentNotFound)
    ));
    assert!(matches!(
        e.toggle_bookmark(f.viewer, 9999, 0).await,
        Err(EngagementError::VideoNotFound)
    ));
    assert!(matches!(
        e.toggle_subscription(f.viewer, 9999).await,
        Err(EngagementError::ChannelNotFound)
    ));
}

#[tokio::test]
async fn test_comment_reactions_follow_decision_table() {
    let f = setup().await;
    let e = &f.engagement;

    let liked = e
        .toggle_comment_reaction(f.viewer, f.comment_id, ReactionKind::Like)
        .await
        .unwrap();
    assert!(liked.is_active);
    assert_eq!((liked.likes, liked.dislikes), (1, 0));

    let swapped = e
        .toggle_comment_reaction(f.viewer, f.comment_id, ReactionKind::Dislike)
        .await
        .unwrap();
    assert_eq!((swapped.likes, swapped.dislikes), (0, 1));
    assert_eq!(
        e.comment_reaction(f.viewer, f.comment_id).await.unwrap(),
        Some(ReactionKind::Dislike)
    );

    let comment = f.store.find_comment(f.comment_id).await.unwrap().unwrap();
    assert_eq!((comment.likes, comment.dislikes), (0, 1));
}

#[tokio::test]
async fn test_bookmark_toggle() {
    let f = setup().await;
    let e = &f.engagement;

    assert!(e.toggle_bookmark(f.viewer, f.video_id, 42).await.unwrap());
    assert!(!e.toggle_bookmark(f.viewer, f.video_id, 42).await.unwrap());
    assert!(e.toggle_bookmark(f.viewer, f.video_id, 0).await.unwrap());

    assert!(matches!(
        e.toggle_bookmark(f.viewer, f.video_id, -1).await,
        Err(EngagementError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_subscription_toggle() {
    let f = setup().await;
    let e = &f.engagement;

    let subscribed = e.toggle_subscription(f.viewer, f.channel_id).await.unwrap();
    assert!(subscribed.subscribed);
    assert!(subscribed.subscription_id.is_some());
    assert_eq!(subscribed.status, SubscriptionStatus::Active);
    assert_eq!(subscribed.subscriber_count, 1);
    assert_eq!(subscribed.channel_name, "Owner's Kitchen");
    assert_eq!(
        subscribed.channel_profile_image.as_deref(),
        Some("https://img.example.com/p.png")
    );
    assert_eq!(subscribed.message, "Subscribed successfully");
    assert!(e.subscription_status(f.viewer, f.channel_id).await.unwrap());

    // Owners may subscribe to their own channel
    let own = e.toggle_subscription(f.owner, f.channel_id).await.unwrap();
    assert_eq!(own.subscriber_count, 2);

    let unsubscribed = e.toggle_subscription(f.viewer, f.channel_id).await.unwrap();
    assert!(!unsubscribed.subscribed);
    assert_eq!(unsubscribed.subscription_id, None);
    assert_eq!(unsubscribed.status, SubscriptionStatus::Inactive);
    assert_eq!(unsubscribed.subscriber_count, 1);
    assert!(!e.subscription_status(f.viewer, f.channel_id).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_toggles_keep_counters_consistent() {
    let f = setup().await;
    let mut users = Vec::new();
    for i in 0..16 {
        users.push(create_user(&f.store, &format!("fan{i}@example.com")).await);
    }

    let mut handles = Vec::new();
    for (i, user) in users.iter().copied().enumerate() {
        let engagement = f.engagement.clone();
        let video_id = f.video_id;
        handles.push(tokio::spawn(async move {
            let kind = if i % 2 == 0 {
                ReactionKind::Like
            } else {
                ReactionKind::Dislike
            };
            for _ in 0..3 {
                engagement
                    .toggle_video_reaction(user, video_id, kind)
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // Three toggles of the same kind leave each reaction set
    let video = f.store.find_video(f.video_id).await.unwrap().unwrap();
    assert_eq!((video.likes, video.dislikes), (8, 8));
}

#[tokio::test]
async fn test_channel_creation_promotes_owner() {
    let f = setup().await;
    let owner = f.store.find_user(f.owner).await.unwrap().unwrap();
    assert_eq!(owner.role, Role::Creator);

    let viewer = f.store.find_user(f.viewer).await.unwrap().unwrap();
    assert_eq!(viewer.role, Role::Viewer);
}
