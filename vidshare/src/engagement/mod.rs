//! Engagement toggles: reactions, bookmarks and subscriptions.
//!
//! Every toggle is a single store operation. The reaction decision table lives in
//! [`Transition::resolve`] and is shared by all store implementations, so the
//! membership sets and the `likes`/`dislikes` counters move together.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{EngagementError, EngagementResult};
pub use manager::EngagementManager;
pub use models::{
    CounterDelta, ReactionKind, ReactionOutcome, SubscriptionOutcome, SubscriptionStatus,
    Transition,
};
