mod scorer;

pub use scorer::{
    raw_score, recency_factor, score, ScoreWeights, DEFAULT_HALF_LIFE_DAYS, DEFAULT_POSTS_WEIGHT,
    DEFAULT_TOTAL_WEIGHT,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interactions::ActorAggregate;
use super::ScoringError;

/// Aggregate paired with the score it earned in a single ranking pass.
///
/// Scores depend on the evaluation time, so these are rebuilt on every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAggregate {
    #[serde(flatten)]
    pub aggregate: ActorAggregate,
    pub score: f64,
}

/// How many ranked aggregates a selection keeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionMode {
    TopN { n: usize },
    Threshold { min_score: f64 },
}

impl SelectionMode {
    pub fn validate(&self) -> Result<(), ScoringError> {
        match *self {
            SelectionMode::TopN { n: 0 } => Err(ScoringError::invalid("top_n requires n >= 1")),
            SelectionMode::Threshold { min_score } if min_score.is_nan() => {
                Err(ScoringError::invalid("threshold min_score must be a number"))
            }
            _ => Ok(()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SelectionMode::TopN { n } => format!("top {n}"),
            SelectionMode::Threshold { min_score } => format!("score >= {min_score:.2}"),
        }
    }
}

/// Rank aggregates with the default weights and keep the entries `mode` selects.
pub fn select(
    aggregates: &[ActorAggregate],
    now: DateTime<Utc>,
    mode: SelectionMode,
) -> Result<Vec<ScoredAggregate>, ScoringError> {
    select_with_weights(aggregates, now, mode, &ScoreWeights::default())
}

/// Rank aggregates descending by score; equal scores keep their input order.
///
/// Empty input selects nothing under any mode. Otherwise the mode and weights are
/// validated before scoring.
pub fn select_with_weights(
    aggregates: &[ActorAggregate],
    now: DateTime<Utc>,
    mode: SelectionMode,
    weights: &ScoreWeights,
) -> Result<Vec<ScoredAggregate>, ScoringError> {
    if aggregates.is_empty() {
        return Ok(Vec::new());
    }

    mode.validate()?;
    weights.validate()?;

    let mut ranked: Vec<ScoredAggregate> = aggregates
        .iter()
        .map(|aggregate| ScoredAggregate {
            score: score(aggregate, now, weights),
            aggregate: aggregate.clone(),
        })
        .collect();

    // Stable sort: ties keep input order.
    ranked.sort_by(|left, right| right.score.total_cmp(&left.score));

    match mode {
        SelectionMode::TopN { n } => ranked.truncate(n),
        SelectionMode::Threshold { min_score } => ranked.retain(|entry| entry.score >= min_score),
    }

    debug!(
        candidates = aggregates.len(),
        selected = ranked.len(),
        mode = %mode.describe(),
        "selected recipients"
    );

    Ok(ranked)
}
