use super::{AccountSignals, ActiveStatus, QualityRule};

pub const LABEL_INACTIVE: &str = "Inactive Account";
pub const LABEL_ELEVATED_SPAM: &str = "Elevated Spam Score";
pub const LABEL_FOLLOW_FARMING: &str = "Follow Farming";

/// Spam scores are percentages (0 to 100).
pub const ELEVATED_SPAM_SCORE: f64 = 5.0;
pub const FOLLOW_FARMING_MIN_FOLLOWING: u64 = 500;

pub(crate) fn standard_rules() -> Vec<QualityRule> {
    vec![
        QualityRule::new(LABEL_INACTIVE, is_inactive),
        QualityRule::new(LABEL_ELEVATED_SPAM, has_elevated_spam_score),
        QualityRule::new(LABEL_FOLLOW_FARMING, is_follow_farming),
    ]
}

fn is_inactive(signals: &AccountSignals) -> bool {
    signals.active_status == ActiveStatus::Inactive
}

fn has_elevated_spam_score(signals: &AccountSignals) -> bool {
    signals.spam_score >= ELEVATED_SPAM_SCORE
}

fn is_follow_farming(signals: &AccountSignals) -> bool {
    signals.follower_count == 0 && signals.following_count >= FOLLOW_FARMING_MIN_FOLLOWING
}
