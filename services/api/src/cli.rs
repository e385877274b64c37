use crate::commands::{run_eligibility, run_profile, run_rank, EligibilityArgs, ProfileArgs, RankArgs};
use crate::server;
use castbase::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Castbase",
    about = "Serve and query Farcaster engagement analytics from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Estimate airdrop eligibility for a seed
    Eligibility(EligibilityArgs),
    /// Show the profile snapshot and quality verdict for a username or FID
    Profile(ProfileArgs),
    /// Rank reward recipients from an interaction CSV export
    Rank(RankArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Eligibility(args) => run_eligibility(args),
        Command::Profile(args) => run_profile(args),
        Command::Rank(args) => run_rank(args),
    }
}
