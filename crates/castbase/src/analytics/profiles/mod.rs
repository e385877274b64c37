//! Lookup parsing and the profile statistics shown when no live social-graph
//! data is available for an account. Well-known accounts come from a fixed
//! directory; everything else gets seeded statistics.

mod directory;

pub use directory::{find_by_fid, find_by_username, KnownProfile, KNOWN_PROFILES};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::eligibility::Seed;
use super::quality::{AccountSignals, ActiveStatus};
use super::ScoringError;

const SYNTHETIC_FID_BASE: u64 = 100_000;
const SYNTHETIC_FID_SPAN: u64 = 900_000;
const PROFILE_SEED_MODULUS: u64 = 1_000;
const JOIN_DATE_SPAN_DAYS: u64 = 365;

/// What a free-form lookup string refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LookupTarget {
    Fid(u64),
    /// `user<fid>` handle, kept exactly as typed (minus `@`).
    Placeholder { fid: u64, handle: String },
    Username(String),
}

impl LookupTarget {
    /// Accepts `@name`, `name`, a bare FID, or the `user<fid>` placeholder handle.
    pub fn parse(input: &str) -> Result<Self, ScoringError> {
        let cleaned = input.trim().to_lowercase().replacen('@', "", 1);
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return Err(ScoringError::invalid("enter a username or FID"));
        }

        if let Some(fid) = parse_fid(cleaned)? {
            return Ok(Self::Fid(fid));
        }

        if let Some(rest) = cleaned.strip_prefix("user") {
            if let Some(fid) = parse_fid(rest)? {
                return Ok(Self::Placeholder {
                    fid,
                    handle: cleaned.to_string(),
                });
            }
        }

        Ok(Self::Username(cleaned.to_string()))
    }

    /// Numeric id for the target; usernames map onto a stable synthetic FID.
    pub fn fid(&self) -> u64 {
        match self {
            LookupTarget::Fid(fid) | LookupTarget::Placeholder { fid, .. } => *fid,
            LookupTarget::Username(name) => synthetic_fid(name),
        }
    }

    pub fn seed(&self) -> Seed {
        Seed::new(self.fid())
    }

    pub fn handle(&self) -> String {
        match self {
            LookupTarget::Fid(fid) => format!("@user{fid}"),
            LookupTarget::Placeholder { handle, .. } => format!("@{handle}"),
            LookupTarget::Username(name) => format!("@{name}"),
        }
    }
}

fn parse_fid(candidate: &str) -> Result<Option<u64>, ScoringError> {
    if candidate.is_empty() || !candidate.bytes().all(|byte| byte.is_ascii_digit()) {
        return Ok(None);
    }
    candidate
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ScoringError::invalid(format!("FID '{candidate}' is out of range")))
}

/// Stable FID in `100000..1000000` derived from the character codes of a username.
pub fn synthetic_fid(username: &str) -> u64 {
    let hash = username
        .chars()
        .fold(0u64, |acc, ch| acc.wrapping_add(u64::from(u32::from(ch))));
    SYNTHETIC_FID_BASE + hash % SYNTHETIC_FID_SPAN
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub casts: u64,
    pub likes: u64,
    pub recasts: u64,
}

/// Profile statistics for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub username: String,
    pub fid: u64,
    pub followers: u64,
    pub following: u64,
    pub total_casts: u64,
    pub total_likes: u64,
    pub total_recasts: u64,
    pub avg_engagement: f64,
    pub rank: u64,
    pub spam_score: f64,
    pub quality_score: f64,
    pub neynar_score: f64,
    pub join_date: NaiveDate,
    #[serde(default)]
    pub active_status: ActiveStatus,
    pub recent_activity: RecentActivity,
}

impl ProfileSnapshot {
    pub fn signals(&self) -> AccountSignals {
        AccountSignals {
            active_status: self.active_status,
            spam_score: self.spam_score,
            follower_count: self.followers,
            following_count: self.following,
        }
    }
}

/// Deterministic profile statistics seeded by `fid % 1000`.
pub fn simulated_profile(target: &LookupTarget) -> ProfileSnapshot {
    let fid = target.fid();
    let s = fid % PROFILE_SEED_MODULUS;
    let bucket = (s % 5) as f64;

    ProfileSnapshot {
        username: target.handle(),
        fid,
        followers: 1_000 + s * 100,
        following: 100 + s * 10,
        total_casts: 500 + s * 50,
        total_likes: 10_000 + s * 1_000,
        total_recasts: 2_000 + s * 200,
        avg_engagement: round_tenths(5.0 + s as f64 / 50.0),
        rank: 100 + s,
        spam_score: round_tenths(bucket * 0.3),
        quality_score: round_tenths(99.5 - bucket * 0.3),
        neynar_score: (80 + s % 20) as f64,
        join_date: profile_epoch() + Duration::days((s % JOIN_DATE_SPAN_DAYS) as i64),
        active_status: ActiveStatus::Active,
        recent_activity: RecentActivity {
            casts: 10 + s / 10,
            likes: 100 + s * 5,
            recasts: 20 + s / 5,
        },
    }
}

/// Resolve a lookup string: known accounts by username or bare FID first, then
/// seeded statistics. Placeholder handles always get seeded statistics.
pub fn lookup_profile(input: &str) -> Result<ProfileSnapshot, ScoringError> {
    let target = LookupTarget::parse(input)?;
    let known = match &target {
        LookupTarget::Username(name) => find_by_username(name),
        LookupTarget::Fid(fid) => find_by_fid(*fid),
        LookupTarget::Placeholder { .. } => None,
    };

    Ok(known
        .map(KnownProfile::snapshot)
        .unwrap_or_else(|| simulated_profile(&target)))
}

fn profile_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 7, 1).unwrap_or(NaiveDate::MIN)
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::quality::QualityRuleSet;

    #[test]
    fn parse_distinguishes_fids_handles_and_placeholders() {
        assert_eq!(LookupTarget::parse(" 977 "), Ok(LookupTarget::Fid(977)));
        assert_eq!(
            LookupTarget::parse("User0042"),
            Ok(LookupTarget::Placeholder {
                fid: 42,
                handle: "user0042".to_string(),
            })
        );
        assert_eq!(
            LookupTarget::parse("@DWR.eth"),
            Ok(LookupTarget::Username("dwr.eth".to_string()))
        );
        assert_eq!(
            LookupTarget::parse("user"),
            Ok(LookupTarget::Username("user".to_string()))
        );
        assert!(LookupTarget::parse("  @ ").is_err());
        assert!(LookupTarget::parse("99999999999999999999999").is_err());
    }

    #[test]
    fn synthetic_fid_sums_character_codes() {
        // "abc" = 97 + 98 + 99
        assert_eq!(synthetic_fid("abc"), 100_000 + 294);
        let fid = synthetic_fid("vitalik.eth");
        assert!((100_000..1_000_000).contains(&fid));
        assert_eq!(fid, synthetic_fid("vitalik.eth"));
    }

    #[test]
    fn simulated_profile_follows_seed_formulas() {
        let profile = simulated_profile(&LookupTarget::Fid(1_234));
        // seed = 1234 % 1000 = 234
        assert_eq!(profile.username, "@user1234");
        assert_eq!(profile.followers, 24_400);
        assert_eq!(profile.following, 2_440);
        assert_eq!(profile.total_casts, 12_200);
        assert_eq!(profile.total_likes, 244_000);
        assert_eq!(profile.total_recasts, 48_800);
        assert_eq!(profile.avg_engagement, 9.7);
        assert_eq!(profile.rank, 334);
        assert_eq!(profile.spam_score, 1.2);
        assert_eq!(profile.quality_score, 98.3);
        assert_eq!(profile.neynar_score, 94.0);
        assert_eq!(
            profile.join_date,
            NaiveDate::from_ymd_opt(2024, 2, 20).expect("valid date")
        );
        assert_eq!(
            profile.recent_activity,
            RecentActivity {
                casts: 33,
                likes: 1_270,
                recasts: 66,
            }
        );
    }

    #[test]
    fn join_dates_wrap_within_a_year_of_launch() {
        // seed 400 wraps to day 35
        let profile = simulated_profile(&LookupTarget::Fid(400));
        assert_eq!(
            profile.join_date,
            NaiveDate::from_ymd_opt(2023, 8, 5).expect("valid date")
        );
        let last = simulated_profile(&LookupTarget::Fid(364));
        assert_eq!(
            last.join_date,
            NaiveDate::from_ymd_opt(2024, 6, 29).expect("valid date")
        );
    }

    #[test]
    fn placeholder_handles_keep_their_spelling() {
        let profile = lookup_profile("@user0042").expect("lookup succeeds");
        assert_eq!(profile.fid, 42);
        assert_eq!(profile.username, "@user0042");
        assert_eq!(profile.followers, 1_000 + 42 * 100);
    }

    #[test]
    fn known_accounts_resolve_by_name_and_fid() {
        let by_name = lookup_profile("@Vitalik.eth").expect("lookup succeeds");
        assert_eq!(by_name.fid, 5650);
        assert_eq!(by_name.username, "@vitalik.eth");
        assert_eq!(by_name.followers, 245_680);
        assert_eq!(
            by_name.join_date,
            NaiveDate::from_ymd_opt(2023, 8, 15).expect("valid date")
        );

        let by_fid = lookup_profile("3").expect("lookup succeeds");
        assert_eq!(by_fid.username, "@dwr.eth");
        assert_eq!(by_fid.rank, 2);
        assert_eq!(by_fid, lookup_profile("dwr.eth").expect("lookup succeeds"));

        // placeholder handles skip the directory
        let placeholder = lookup_profile("user5650").expect("lookup succeeds");
        assert_eq!(placeholder.username, "@user5650");
        assert_eq!(placeholder.followers, 1_000 + 650 * 100);
    }

    #[test]
    fn seeded_spam_scores_stay_below_the_elevated_threshold() {
        let rules = QualityRuleSet::standard();
        for fid in 0..1_000 {
            let profile = simulated_profile(&LookupTarget::Fid(fid));
            assert!(!rules.evaluate(&profile.signals()).flagged, "fid {fid}");
        }
    }

    #[test]
    fn inactive_status_reaches_quality_signals() {
        let mut profile = simulated_profile(&LookupTarget::Fid(7));
        assert_eq!(profile.signals().active_status, ActiveStatus::Active);
        profile.active_status = ActiveStatus::Inactive;
        assert_eq!(profile.signals().active_status, ActiveStatus::Inactive);
    }

    #[test]
    fn lookup_profile_uses_synthetic_fid_for_names() {
        let profile = lookup_profile("@abc").expect("lookup succeeds");
        assert_eq!(profile.fid, 100_294);
        assert_eq!(profile.username, "@abc");
    }
}
