use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::super::interactions::{aggregate, InteractionEvent};
use super::super::ranking::{select_with_weights, ScoreWeights, ScoredAggregate, SelectionMode};
use super::super::ScoringError;
use super::feed::{FeedError, InteractionFeed};

/// Ranked recipients from one pass plus headline stats about the interactions behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientSnapshot {
    pub computed_at: DateTime<Utc>,
    pub mode: SelectionMode,
    pub active_interactors: usize,
    pub total_interactions: u64,
    pub max_targets_engaged: u64,
    pub recipients: Vec<ScoredAggregate>,
}

impl RecipientSnapshot {
    pub fn build(
        events: &[InteractionEvent],
        now: DateTime<Utc>,
        mode: SelectionMode,
        weights: &ScoreWeights,
    ) -> Result<Self, ScoringError> {
        let aggregates = aggregate(events);
        let recipients = select_with_weights(&aggregates, now, mode, weights)?;

        Ok(Self {
            computed_at: now,
            mode,
            active_interactors: aggregates.len(),
            total_interactions: aggregates
                .iter()
                .map(|entry| entry.total_interaction_count)
                .sum(),
            max_targets_engaged: aggregates
                .iter()
                .map(|entry| entry.distinct_target_count)
                .max()
                .unwrap_or(0),
            recipients,
        })
    }
}

/// Service composing the interaction feed with the scoring pipeline.
pub struct EngagementService<F> {
    feed: Arc<F>,
    weights: ScoreWeights,
    refresh_mode: SelectionMode,
    latest: RwLock<Option<RecipientSnapshot>>,
}

impl<F> EngagementService<F>
where
    F: InteractionFeed + 'static,
{
    pub fn new(
        feed: Arc<F>,
        weights: ScoreWeights,
        refresh_mode: SelectionMode,
    ) -> Result<Self, EngagementServiceError> {
        weights.validate()?;
        refresh_mode.validate()?;

        Ok(Self {
            feed,
            weights,
            refresh_mode,
            latest: RwLock::new(None),
        })
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    pub fn refresh_mode(&self) -> SelectionMode {
        self.refresh_mode
    }

    /// Store new interaction events, returning the feed size afterwards.
    pub fn record(&self, events: Vec<InteractionEvent>) -> Result<usize, EngagementServiceError> {
        let received = events.len();
        let stored = self.feed.append(events)?;
        debug!(received, stored, "recorded interactions");
        Ok(stored)
    }

    /// Rank a caller-supplied batch without touching the feed.
    pub fn rank(
        &self,
        events: &[InteractionEvent],
        now: DateTime<Utc>,
        mode: SelectionMode,
    ) -> Result<RecipientSnapshot, EngagementServiceError> {
        Ok(RecipientSnapshot::build(events, now, mode, &self.weights)?)
    }

    pub fn rank_feed(
        &self,
        now: DateTime<Utc>,
        mode: SelectionMode,
    ) -> Result<RecipientSnapshot, EngagementServiceError> {
        let events = self.feed.events()?;
        self.rank(&events, now, mode)
    }

    /// Re-rank the whole feed with the refresh mode and publish it as the latest snapshot.
    pub fn refresh(&self, now: DateTime<Utc>) -> Result<RecipientSnapshot, EngagementServiceError> {
        let snapshot = self.rank_feed(now, self.refresh_mode)?;
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());

        info!(
            interactors = snapshot.active_interactors,
            recipients = snapshot.recipients.len(),
            "refreshed recipient snapshot"
        );
        Ok(snapshot)
    }

    pub fn latest(&self) -> Option<RecipientSnapshot> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngagementServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}
