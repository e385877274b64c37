pub mod eligibility;
pub mod engagement;
pub mod interactions;
pub mod profiles;
pub mod quality;
pub mod ranking;

pub use eligibility::{estimate, EligibilityResult, Seed};
pub use interactions::{aggregate, ActorAggregate, InteractionEvent, InteractionKind};
pub use ranking::{score, select, select_with_weights, ScoreWeights, ScoredAggregate, SelectionMode};

/// Caller contract violations raised by the scoring operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ScoringError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
