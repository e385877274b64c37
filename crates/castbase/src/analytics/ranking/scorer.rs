use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::interactions::ActorAggregate;
use super::super::ScoringError;

pub const DEFAULT_POSTS_WEIGHT: f64 = 0.6;
pub const DEFAULT_TOTAL_WEIGHT: f64 = 0.3;
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 14.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Weights blending breadth (distinct targets) and volume (total interactions),
/// plus the half-life of the recency decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub posts_weight: f64,
    pub total_weight: f64,
    pub half_life_days: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            posts_weight: DEFAULT_POSTS_WEIGHT,
            total_weight: DEFAULT_TOTAL_WEIGHT,
            half_life_days: DEFAULT_HALF_LIFE_DAYS,
        }
    }
}

impl ScoreWeights {
    pub fn new(
        posts_weight: f64,
        total_weight: f64,
        half_life_days: f64,
    ) -> Result<Self, ScoringError> {
        let weights = Self {
            posts_weight,
            total_weight,
            half_life_days,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Weights must be finite and non-negative; the half-life must be positive.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, value) in [
            ("posts_weight", self.posts_weight),
            ("total_weight", self.total_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if !self.half_life_days.is_finite() || self.half_life_days <= 0.0 {
            return Err(ScoringError::invalid(format!(
                "half_life_days must be a finite positive number, got {}",
                self.half_life_days
            )));
        }

        Ok(())
    }
}

/// Volume component of the score before recency is applied.
pub fn raw_score(aggregate: &ActorAggregate, weights: &ScoreWeights) -> f64 {
    let distinct = aggregate.distinct_target_count as f64;
    let total = aggregate.total_interaction_count as f64;
    weights.posts_weight * distinct.ln_1p() + weights.total_weight * total.ln_1p()
}

/// Exponential decay: 1 at age zero, halving every `half_life_days`.
///
/// `now` earlier than `last_interaction_at` yields a factor above 1.
pub fn recency_factor(
    last_interaction_at: DateTime<Utc>,
    now: DateTime<Utc>,
    half_life_days: f64,
) -> f64 {
    let age_days = (now - last_interaction_at).num_milliseconds() as f64 / MILLIS_PER_DAY;
    (-std::f64::consts::LN_2 * age_days / half_life_days).exp()
}

/// Recency-weighted consistency score for one aggregate evaluated at `now`.
pub fn score(aggregate: &ActorAggregate, now: DateTime<Utc>, weights: &ScoreWeights) -> f64 {
    raw_score(aggregate, weights)
        * recency_factor(aggregate.last_interaction_at, now, weights.half_life_days)
}
