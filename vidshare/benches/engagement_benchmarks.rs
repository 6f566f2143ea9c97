use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::sync::Arc;
use vidshare::auth::{CredentialHasher, Role, TokenKind, TokenPayload, TokenService};
use vidshare::channels::{ChannelManager, CreateChannelRequest};
use vidshare::channels::models::NewVideo;
use vidshare::db::{ContentRepository, MemoryStore, UserRepository, repository::NewUser};
use vidshare::engagement::{ReactionKind, Transition};
use vidshare::EngagementManager;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Benchmark the pure reaction decision table
fn bench_transition_resolve(c: &mut Criterion) {
    let cases = [
        (None, ReactionKind::Like),
        (Some(ReactionKind::Like), ReactionKind::Like),
        (Some(ReactionKind::Like), ReactionKind::Dislike),
    ];

    c.bench_function("transition_resolve", |b| {
        b.iter(|| {
            for (current, requested) in cases {
                std::hint::black_box(Transition::resolve(
                    std::hint::black_box(current),
                    requested,
                ));
            }
        });
    });
}

/// Benchmark video reaction toggles against the in-process store
fn bench_video_toggle(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("video_toggle");

    for users in [1usize, 16, 256] {
        let (engagement, user_ids, video_id) = rt.block_on(async {
            let store = Arc::new(MemoryStore::new());
            let mut user_ids = Vec::with_capacity(users);
            for i in 0..users {
                let user = store
                    .create_user(&NewUser {
                        email: format!("bench{i}@example.com"),
                        password_hash: "hash".to_string(),
                        role: Role::Viewer,
                    })
                    .await
                    .unwrap();
                user_ids.push(user.id);
            }
            let channel = ChannelManager::new(store.clone())
                .create_channel(
                    user_ids[0],
                    CreateChannelRequest {
                        name: "Bench".to_string(),
                        slug: "bench".to_string(),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            let video = store
                .create_video(&NewVideo {
                    channel_id: channel.id,
                    title: "Bench".to_string(),
                })
                .await
                .unwrap();
            (EngagementManager::new(store), user_ids, video.id)
        });

        group.bench_with_input(BenchmarkId::from_parameter(users), &users, |b, _| {
            let mut next = 0;
            b.iter(|| {
                let user = user_ids[next % user_ids.len()];
                next += 1;
                rt.block_on(engagement.toggle_video_reaction(user, video_id, ReactionKind::Like))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark access token signing and verification
fn bench_tokens(c: &mut Criterion) {
    let tokens = TokenService::new(
        "bench-access-secret-at-least-32-bytes!!",
        "bench-refresh-secret-at-least-32-bytes!",
    );
    let payload = TokenPayload {
        user_id: 1,
        session_id: uuid::Uuid::new_v4(),
        role: Role::Viewer,
    };
    let token = tokens.sign(&payload, TokenKind::Access).unwrap();

    c.bench_function("token_sign", |b| {
        b.iter(|| tokens.sign(std::hint::black_box(&payload), TokenKind::Access).unwrap());
    });
    c.bench_function("token_verify", |b| {
        b.iter(|| tokens.verify(std::hint::black_box(&token), TokenKind::Access).unwrap());
    });
}

/// Benchmark password hashing (Argon2id is intentionally slow)
fn bench_password_hash(c: &mut Criterion) {
    let hasher = CredentialHasher::new("bench-pepper-value".to_string()).unwrap();
    let hash = hasher.hash("correct horse battery staple").unwrap();

    let mut group = c.benchmark_group("password");
    group.sample_size(10);
    group.bench_function("hash", |b| {
        b.iter(|| hasher.hash("correct horse battery staple").unwrap());
    });
    group.bench_function("verify", |b| {
        b.iter(|| hasher.verify("correct horse battery staple", &hash));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_transition_resolve,
    bench_video_toggle,
    bench_tokens,
    bench_password_hash
);
criterion_main!(benches);
