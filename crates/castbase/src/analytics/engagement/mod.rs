//! Interaction intake and recipient ranking exposed to the HTTP layer.

pub mod feed;
pub mod router;
pub mod service;

pub use feed::{FeedError, InteractionFeed};
pub use router::engagement_router;
pub use service::{EngagementService, EngagementServiceError, RecipientSnapshot};
