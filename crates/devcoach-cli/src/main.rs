mod cmd;
mod output;
mod root;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "devcoach",
    about = "Rank a GitHub work queue and decide when to coach",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .devcoach/ or .git/)
    #[arg(long, global = true, env = "DEVCOACH_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .devcoach/config.yaml in the current project
    Init {
        /// GitHub username used when --user is omitted
        #[arg(long)]
        user: Option<String>,
    },

    /// Show or validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Map story points onto a difficulty tier (1-5)
    Tier {
        /// Story points (omit for unknown size)
        #[arg(allow_hyphen_values = true)]
        story_points: Option<i64>,
    },

    /// Score and sort every item of a queue file
    Score {
        /// JSON array of queue items, or `-` for stdin
        file: PathBuf,
        #[arg(long)]
        user: Option<String>,
    },

    /// Pick the three best items of a queue file, with reasons
    Recommend {
        /// JSON array of queue items, or `-` for stdin
        file: PathBuf,
        #[arg(long)]
        user: Option<String>,
    },

    /// Convert GitHub issues/pulls JSON into queue items
    Normalize {
        #[arg(long)]
        user: Option<String>,
        /// Output of GET /repos/{owner}/{repo}/issues
        #[arg(long)]
        issues: Option<PathBuf>,
        /// Output of GET /repos/{owner}/{repo}/pulls
        #[arg(long)]
        pulls: Option<PathBuf>,
    },

    /// Report repo hygiene: orphaned issues and PRs, pending reviews, stale issues
    Health {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        issues: Option<PathBuf>,
        #[arg(long)]
        pulls: Option<PathBuf>,
        /// Reference time for staleness (RFC 3339, default: now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },

    /// Classify last week's activity as peter or ransom
    Level {
        /// PRs merged in the last 7 days
        #[arg(long, default_value = "0")]
        merged: u32,
        /// PRs reviewed in the last 7 days
        #[arg(long, default_value = "0")]
        reviewed: u32,
        /// Fraction of work blocks with a GitHub annotation (0-1)
        #[arg(long, default_value = "0")]
        annotation_rate: f64,
    },

    /// Decide whether to interrupt the developer now
    Prompt {
        /// Coaching level: peter or ransom
        #[arg(long, default_value = "ransom")]
        level: String,
        /// Minutes since the last activity
        #[arg(long, default_value = "0")]
        idle: u32,
        /// Current work phase
        #[arg(long, default_value = "idle")]
        phase: String,
    },

    /// Check whether an idle developer looks stuck
    Stuck {
        #[arg(long, default_value = "ransom")]
        level: String,
        #[arg(long, default_value = "0")]
        idle: u32,
        /// Phase of the active work block, if any
        #[arg(long)]
        phase: Option<String>,
    },

    /// Suggest habits from weekly coaching signals
    Advise {
        #[arg(long)]
        annotation_rate: Option<f64>,
        #[arg(long, default_value = "0")]
        focus: f64,
        #[arg(long, default_value = "0")]
        consistency: f64,
        /// Consecutive days with a solved puzzle
        #[arg(long, default_value = "0")]
        streak: u32,
    },

    /// Minutes and block counts per work phase
    Balance {
        /// JSON array of work blocks, or `-` for stdin
        file: PathBuf,
    },

    /// Run the HTTP API
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { user } => cmd::init::run(&root, user.as_deref()),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Tier { story_points } => cmd::queue::tier(story_points, cli.json),
        Commands::Score { file, user } => {
            cmd::queue::score(&root, &file, user.as_deref(), cli.json)
        }
        Commands::Recommend { file, user } => {
            cmd::queue::recommend(&root, &file, user.as_deref(), cli.json)
        }
        Commands::Normalize {
            user,
            issues,
            pulls,
        } => cmd::normalize::run(
            &root,
            user.as_deref(),
            issues.as_deref(),
            pulls.as_deref(),
            cli.json,
        ),
        Commands::Health {
            user,
            issues,
            pulls,
            now,
        } => cmd::normalize::health(
            &root,
            user.as_deref(),
            issues.as_deref(),
            pulls.as_deref(),
            now,
            cli.json,
        ),
        Commands::Level {
            merged,
            reviewed,
            annotation_rate,
        } => cmd::coach::level(merged, reviewed, annotation_rate, cli.json),
        Commands::Prompt { level, idle, phase } => {
            cmd::coach::prompt(&level, idle, &phase, cli.json)
        }
        Commands::Stuck { level, idle, phase } => {
            cmd::coach::stuck(&level, idle, phase.as_deref(), cli.json)
        }
        Commands::Advise {
            annotation_rate,
            focus,
            consistency,
            streak,
        } => cmd::coach::advise(annotation_rate, focus, consistency, streak, cli.json),
        Commands::Balance { file } => cmd::coach::balance(&file, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
