mod rules;

pub use rules::{
    ELEVATED_SPAM_SCORE, FOLLOW_FARMING_MIN_FOLLOWING, LABEL_ELEVATED_SPAM, LABEL_FOLLOW_FARMING,
    LABEL_INACTIVE,
};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Activity status reported for an account by the social-graph provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveStatus {
    Active,
    Inactive,
    #[default]
    Unknown,
}

/// Signals the quality rules inspect for a single account.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountSignals {
    #[serde(default)]
    pub active_status: ActiveStatus,
    /// Percentage of activity the provider considers spam, 0 to 100.
    pub spam_score: f64,
    pub follower_count: u64,
    pub following_count: u64,
}

type Predicate = Box<dyn Fn(&AccountSignals) -> bool + Send + Sync>;

/// Labelled predicate; the label is reported when the predicate matches.
pub struct QualityRule {
    label: String,
    predicate: Predicate,
}

impl QualityRule {
    pub fn new<P>(label: impl Into<String>, predicate: P) -> Self
    where
        P: Fn(&AccountSignals) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn matches(&self, signals: &AccountSignals) -> bool {
        (self.predicate)(signals)
    }
}

impl fmt::Debug for QualityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QualityRule")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Outcome of running a rule set against one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl QualityVerdict {
    pub fn clean() -> Self {
        Self {
            flagged: false,
            label: None,
        }
    }

    pub fn summary(&self) -> String {
        match &self.label {
            Some(label) => format!("flagged: {label}"),
            None => "no quality concerns".to_string(),
        }
    }
}

/// Ordered rule list. Rules are checked in insertion order and the first match wins.
#[derive(Debug, Default)]
pub struct QualityRuleSet {
    rules: Vec<QualityRule>,
}

impl QualityRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default priority: inactive account, elevated spam score, follow farming.
    pub fn standard() -> Self {
        Self {
            rules: rules::standard_rules(),
        }
    }

    /// Append a rule at the lowest priority.
    pub fn push(&mut self, rule: QualityRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rules.iter().map(QualityRule::label).collect()
    }

    pub fn evaluate(&self, signals: &AccountSignals) -> QualityVerdict {
        self.rules
            .iter()
            .find(|rule| rule.matches(signals))
            .map(|rule| QualityVerdict {
                flagged: true,
                label: Some(rule.label.clone()),
            })
            .unwrap_or_else(QualityVerdict::clean)
    }
}
