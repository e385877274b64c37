use super::super::interactions::InteractionEvent;

/// Storage abstraction for raw interaction events so the service can be
/// exercised without a live social-graph source.
pub trait InteractionFeed: Send + Sync {
    /// Append events, returning the number of events now held.
    fn append(&self, events: Vec<InteractionEvent>) -> Result<usize, FeedError>;
    fn events(&self) -> Result<Vec<InteractionEvent>, FeedError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("interaction feed unavailable: {0}")]
    Unavailable(String),
}
