mod import;

pub use import::{parse_timestamp, InteractionImportError, InteractionImporter};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ScoringError;

/// Engagement an actor performed on a target cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Like,
    Recast,
    Reply,
}

impl InteractionKind {
    pub fn label(self) -> &'static str {
        match self {
            InteractionKind::Like => "like",
            InteractionKind::Recast => "recast",
            InteractionKind::Reply => "reply",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InteractionKind {
    type Err = ScoringError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "like" | "likes" => Ok(Self::Like),
            "recast" | "recasts" => Ok(Self::Recast),
            "reply" | "replies" => Ok(Self::Reply),
            other => Err(ScoringError::invalid(format!(
                "unknown interaction kind '{other}'"
            ))),
        }
    }
}

/// Single externally supplied interaction between an actor and a target cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub actor_id: String,
    pub target_id: String,
    pub kind: InteractionKind,
    pub occurred_at: DateTime<Utc>,
}

impl InteractionEvent {
    pub fn new(
        actor_id: impl Into<String>,
        target_id: impl Into<String>,
        kind: InteractionKind,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            target_id: target_id.into(),
            kind,
            occurred_at,
        }
    }
}

/// Per-actor summary derived from a batch of interaction events.
///
/// `total_interaction_count >= distinct_target_count` always holds because a
/// target may be engaged with more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorAggregate {
    pub actor_id: String,
    pub distinct_target_count: u64,
    pub total_interaction_count: u64,
    pub last_interaction_at: DateTime<Utc>,
}

struct Accumulator<'a> {
    actor_id: &'a str,
    targets: HashSet<&'a str>,
    total: u64,
    last_at: DateTime<Utc>,
}

/// Fold interaction events into one aggregate per actor.
///
/// Actors are emitted in order of first appearance so repeated runs over the
/// same input produce the same sequence.
pub fn aggregate(events: &[InteractionEvent]) -> Vec<ActorAggregate> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut accumulators: Vec<Accumulator<'_>> = Vec::new();

    for event in events {
        let existing = slots.get(event.actor_id.as_str()).copied();
        match existing {
            Some(slot) => {
                let accumulator = &mut accumulators[slot];
                accumulator.targets.insert(event.target_id.as_str());
                accumulator.total += 1;
                if event.occurred_at > accumulator.last_at {
                    accumulator.last_at = event.occurred_at;
                }
            }
            None => {
                slots.insert(event.actor_id.as_str(), accumulators.len());
                accumulators.push(Accumulator {
                    actor_id: event.actor_id.as_str(),
                    targets: HashSet::from([event.target_id.as_str()]),
                    total: 1,
                    last_at: event.occurred_at,
                });
            }
        }
    }

    debug!(
        events = events.len(),
        actors = accumulators.len(),
        "aggregated interactions"
    );

    accumulators
        .into_iter()
        .map(|accumulator| ActorAggregate {
            actor_id: accumulator.actor_id.to_string(),
            distinct_target_count: accumulator.targets.len() as u64,
            total_interaction_count: accumulator.total,
            last_interaction_at: accumulator.last_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn empty_input_yields_no_aggregates() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn single_event_counts_once() {
        let events = vec![InteractionEvent::new("a", "p1", InteractionKind::Like, at(9))];
        let aggregates = aggregate(&events);
        assert_eq!(
            aggregates,
            vec![ActorAggregate {
                actor_id: "a".to_string(),
                distinct_target_count: 1,
                total_interaction_count: 1,
                last_interaction_at: at(9),
            }]
        );
    }

    #[test]
    fn repeated_targets_count_toward_total_only() {
        let events = vec![
            InteractionEvent::new("a", "p1", InteractionKind::Like, at(9)),
            InteractionEvent::new("a", "p1", InteractionKind::Reply, at(11)),
            InteractionEvent::new("a", "p2", InteractionKind::Recast, at(10)),
            InteractionEvent::new("b", "p1", InteractionKind::Like, at(8)),
        ];

        let aggregates = aggregate(&events);
        assert_eq!(aggregates.len(), 2);

        let a = aggregates
            .iter()
            .find(|entry| entry.actor_id == "a")
            .expect("actor a present");
        assert_eq!(a.distinct_target_count, 2);
        assert_eq!(a.total_interaction_count, 3);
        assert_eq!(a.last_interaction_at, at(11));

        let b = aggregates
            .iter()
            .find(|entry| entry.actor_id == "b")
            .expect("actor b present");
        assert_eq!(b.distinct_target_count, 1);
        assert_eq!(b.total_interaction_count, 1);
    }

    #[test]
    fn latest_timestamp_wins_regardless_of_input_order() {
        let late = at(12) + Duration::minutes(30);
        let events = vec![
            InteractionEvent::new("a", "p1", InteractionKind::Like, late),
            InteractionEvent::new("a", "p2", InteractionKind::Like, at(1)),
        ];
        assert_eq!(aggregate(&events)[0].last_interaction_at, late);
    }

    #[test]
    fn interaction_kind_parses_loosely() {
        assert_eq!(" Recast ".parse::<InteractionKind>(), Ok(InteractionKind::Recast));
        assert_eq!("likes".parse::<InteractionKind>(), Ok(InteractionKind::Like));
        assert!("follow".parse::<InteractionKind>().is_err());
    }
}
