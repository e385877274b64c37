use castbase::analytics::engagement::RecipientSnapshot;
use castbase::analytics::interactions::InteractionImporter;
use castbase::analytics::profiles::lookup_profile;
use castbase::analytics::quality::QualityRuleSet;
use castbase::analytics::{estimate, ScoringError, Seed, SelectionMode};
use castbase::config::AppConfig;
use castbase::error::AppError;
use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EligibilityArgs {
    /// Non-negative seed, usually the account FID
    pub(crate) seed: String,
}

#[derive(Args, Debug)]
pub(crate) struct ProfileArgs {
    /// Username (with or without @), FID, or user<fid> handle
    pub(crate) query: String,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// CSV export with actor_id,target_id,kind,occurred_at columns
    #[arg(long)]
    pub(crate) events: PathBuf,
    /// Keep the N highest-scoring actors (defaults to APP_RECIPIENT_TOP_N)
    #[arg(long, conflicts_with = "threshold")]
    pub(crate) top: Option<usize>,
    /// Keep every actor scoring at least this value
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
    /// Reference time for recency decay (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_eligibility(args: EligibilityArgs) -> Result<(), AppError> {
    let seed: Seed = args.seed.parse()?;
    let result = estimate(seed);

    println!("Airdrop eligibility for seed {}", seed);
    println!(
        "  Base:      {}",
        program_line(result.base_eligible, result.base_amount)
    );
    println!(
        "  Farcaster: {}",
        program_line(result.network_eligible, result.network_amount)
    );
    println!("  Total:     ${}", result.total_amount);
    println!("\nShare text:\n{}", result.share_message());
    Ok(())
}

pub(crate) fn run_profile(args: ProfileArgs) -> Result<(), AppError> {
    let profile = lookup_profile(&args.query)?;
    let verdict = QualityRuleSet::standard().evaluate(&profile.signals());

    println!("{} (FID {})", profile.username, profile.fid);
    println!(
        "  Followers: {}  Following: {}  Rank: #{}",
        profile.followers, profile.following, profile.rank
    );
    println!(
        "  Casts: {}  Likes: {}  Recasts: {}",
        profile.total_casts, profile.total_likes, profile.total_recasts
    );
    println!(
        "  Avg engagement: {:.1}%  Quality: {:.1}  Neynar: {:.0}  Spam: {:.1}",
        profile.avg_engagement, profile.quality_score, profile.neynar_score, profile.spam_score
    );
    println!("  Joined: {}  Status: {:?}", profile.join_date, profile.active_status);
    println!(
        "  Recent activity: {} casts, {} likes, {} recasts",
        profile.recent_activity.casts, profile.recent_activity.likes, profile.recent_activity.recasts
    );
    println!("  Quality check: {}", verdict.summary());
    Ok(())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let mode = rank_mode(&args, config.scoring.recipient_top_n)?;
    let events = InteractionImporter::from_path(&args.events)?;
    let now = args.now.unwrap_or_else(Utc::now);

    let snapshot = RecipientSnapshot::build(&events, now, mode, &config.scoring.weights)?;
    render_snapshot(&snapshot);
    Ok(())
}

fn rank_mode(args: &RankArgs, default_top_n: usize) -> Result<SelectionMode, ScoringError> {
    let mode = match (args.top, args.threshold) {
        (_, Some(min_score)) => SelectionMode::Threshold { min_score },
        (Some(n), None) => SelectionMode::TopN { n },
        (None, None) => SelectionMode::TopN { n: default_top_n },
    };
    mode.validate()?;
    Ok(mode)
}

fn program_line(eligible: bool, amount: u64) -> String {
    if eligible {
        format!("eligible, ${}", amount)
    } else {
        "not eligible".to_string()
    }
}

fn render_snapshot(snapshot: &RecipientSnapshot) {
    println!("Recipient ranking ({})", snapshot.mode.describe());
    println!("Computed at: {}", snapshot.computed_at.to_rfc3339());
    println!(
        "Active interactors: {}  Total interactions: {}  Max targets engaged: {}",
        snapshot.active_interactors, snapshot.total_interactions, snapshot.max_targets_engaged
    );

    if snapshot.recipients.is_empty() {
        println!("\nRecipients: none");
        return;
    }

    println!("\nRecipients");
    for (position, entry) in snapshot.recipients.iter().enumerate() {
        println!(
            "  {:>3}. {:<24} score {:>8.3}  targets {:>4}  interactions {:>5}  last {}",
            position + 1,
            entry.aggregate.actor_id,
            entry.score,
            entry.aggregate.distinct_target_count,
            entry.aggregate.total_interaction_count,
            entry.aggregate.last_interaction_at.to_rfc3339()
        );
    }
}
