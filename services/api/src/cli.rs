use crate::console::{
    render_detail, render_listing, render_preferences, render_saved, render_updates,
};
use crate::infra::{clipboard, open_radar, unless_all};
use crate::server;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use job_radar::config::AppConfig;
use job_radar::digest::{copy_digest, email_draft_link, render_html, render_plain_text};
use job_radar::error::AppError;
use job_radar::matching::parse_list;
use job_radar::tracker::DEFAULT_RECENT_UPDATES;
use job_radar::{
    telemetry, DailyDigest, FileStore, FilterCriteria, JobRadar, JobStatus, SortMode,
    UserPreferences, WorkMode,
};
use std::collections::BTreeSet;

#[derive(Parser, Debug)]
#[command(
    name = "Job Radar",
    about = "Score, filter, and track job postings and build a daily 9AM digest",
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
    /// Browse the catalog with filters, sorting, and match scores
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Show, update, or clear matching preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },
    /// Track application status per job
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
    /// Bookmark jobs for later
    Saved {
        #[command(subcommand)]
        command: SavedCommand,
    },
    /// Generate, inspect, and export the daily digest
    Digest {
        #[command(subcommand)]
        command: DigestCommand,
    },
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

#[derive(Subcommand, Debug)]
enum JobsCommand {
    /// List jobs matching the given filters
    List(ListArgs),
    /// Show one posting with its match breakdown
    Show { job_id: String },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Hide jobs below the saved minimum match score
    #[arg(long)]
    only_matches: bool,
    /// Case-insensitive search over title and company
    #[arg(long)]
    keyword: Option<String>,
    /// Exact location, or "all"
    #[arg(long)]
    location: Option<String>,
    /// Remote, Hybrid, Onsite, or "all"
    #[arg(long)]
    mode: Option<String>,
    /// Exact experience band, or "all"
    #[arg(long)]
    experience: Option<String>,
    /// LinkedIn, Naukri, Indeed, or "all"
    #[arg(long)]
    source: Option<String>,
    /// Not Applied, Applied, Rejected, Selected, or "all"
    #[arg(long)]
    status: Option<String>,
    /// latest, oldest, match-score, salary-high, or salary-low
    #[arg(long, default_value = "latest")]
    sort: SortMode,
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    /// Print the saved preferences
    Show,
    /// Replace the saved preferences
    Set(PrefsArgs),
    /// Remove the saved preferences
    Clear,
}

#[derive(Args, Debug)]
struct PrefsArgs {
    /// Comma-separated role keywords
    #[arg(long, default_value = "")]
    keywords: String,
    /// Comma-separated preferred locations, matched exactly
    #[arg(long, default_value = "")]
    locations: String,
    /// Comma-separated work modes (Remote, Hybrid, Onsite)
    #[arg(long, default_value = "")]
    modes: String,
    /// Experience band, e.g. 0-1
    #[arg(long, default_value = "")]
    experience: String,
    /// Comma-separated skills
    #[arg(long, default_value = "")]
    skills: String,
    /// Minimum match score for --only-matches (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    min_score: Option<u8>,
}

#[derive(Subcommand, Debug)]
enum StatusCommand {
    /// Print a job's current status
    Get { job_id: String },
    /// Set a job's status and record it in the history
    Set { job_id: String, status: JobStatus },
    /// List the most recent status changes
    Recent {
        #[arg(long, default_value_t = DEFAULT_RECENT_UPDATES)]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
enum SavedCommand {
    /// Save or unsave a job
    Toggle { job_id: String },
    /// List saved jobs in catalog order
    List,
}

#[derive(Subcommand, Debug)]
enum DigestCommand {
    /// Print a stored digest, generating today's if it does not exist yet
    Show(DigestDateArgs),
    /// Rebuild today's digest from the current preferences
    Regenerate,
    /// Render a stored digest as text, HTML, or a mailto link
    Export(ExportArgs),
    /// Copy today's digest to the configured clipboard command
    Copy,
}

#[derive(Args, Debug)]
struct DigestDateArgs {
    /// Digest date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    date: DigestDateArgs,
    #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
    format: ExportFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    Text,
    Html,
    Mailto,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Jobs { command } => run_jobs(&open_radar(&config)?, command),
        Command::Prefs { command } => run_prefs(&open_radar(&config)?, command),
        Command::Status { command } => run_status(&open_radar(&config)?, command),
        Command::Saved { command } => run_saved(&open_radar(&config)?, command),
        Command::Digest { command } => run_digest(&config, &open_radar(&config)?, command),
    }
}

fn run_jobs(radar: &JobRadar<FileStore>, command: JobsCommand) -> Result<(), AppError> {
    match command {
        JobsCommand::List(args) => {
            let criteria = criteria_from_args(args)?;
            render_listing(&radar.listing(&criteria));
        }
        JobsCommand::Show { job_id } => render_detail(&radar.job_detail(&job_id)?),
    }
    Ok(())
}

fn criteria_from_args(args: ListArgs) -> Result<FilterCriteria, AppError> {
    Ok(FilterCriteria {
        only_matches: args.only_matches,
        keyword: args
            .keyword
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty()),
        location: unless_all(args.location.as_deref())?,
        mode: unless_all(args.mode.as_deref())?,
        experience: unless_all(args.experience.as_deref())?,
        source: unless_all(args.source.as_deref())?,
        status: unless_all(args.status.as_deref())?,
        sort: args.sort,
    })
}

fn run_prefs(radar: &JobRadar<FileStore>, command: PrefsCommand) -> Result<(), AppError> {
    match command {
        PrefsCommand::Show => render_preferences(radar.preferences().as_ref()),
        PrefsCommand::Set(args) => {
            let preferences = preferences_from_args(args)?;
            if !radar.save_preferences(&preferences) {
                println!("Warning: preferences could not be persisted.");
            }
            render_preferences(Some(&preferences));
        }
        PrefsCommand::Clear => {
            radar.clear_preferences();
            println!("Preferences cleared.");
        }
    }
    Ok(())
}

fn preferences_from_args(args: PrefsArgs) -> Result<UserPreferences, AppError> {
    let preferred_modes = parse_list(&args.modes)
        .iter()
        .map(|mode| mode.parse::<WorkMode>())
        .collect::<Result<BTreeSet<_>, _>>()
        .map_err(|err| AppError::InvalidInput(err.to_string()))?;

    Ok(UserPreferences {
        role_keywords: args.keywords,
        preferred_locations: args
            .locations
            .split(',')
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .map(str::to_string)
            .collect(),
        preferred_modes,
        experience_level: args.experience.trim().to_string(),
        skills: args.skills,
        min_match_score: args.min_score,
    })
}

fn run_status(radar: &JobRadar<FileStore>, command: StatusCommand) -> Result<(), AppError> {
    match command {
        StatusCommand::Get { job_id } => {
            radar.job_detail(&job_id)?;
            println!("{}: {}", job_id, radar.status(&job_id));
        }
        StatusCommand::Set { job_id, status } => {
            let record = radar.set_status(&job_id, status)?;
            println!(
                "Status updated: {} - {} is now {}",
                record.job_title, record.company, record.status
            );
        }
        StatusCommand::Recent { limit } => {
            render_updates(&radar.recent_updates(limit), radar.now());
        }
    }
    Ok(())
}

fn run_saved(radar: &JobRadar<FileStore>, command: SavedCommand) -> Result<(), AppError> {
    match command {
        SavedCommand::Toggle { job_id } => {
            if radar.toggle_saved(&job_id)? {
                println!("Saved {job_id}.");
            } else {
                println!("Removed {job_id} from saved jobs.");
            }
        }
        SavedCommand::List => render_saved(&radar.saved_jobs()),
    }
    Ok(())
}

fn run_digest(
    config: &AppConfig,
    radar: &JobRadar<FileStore>,
    command: DigestCommand,
) -> Result<(), AppError> {
    match command {
        DigestCommand::Show(args) => {
            let digest = stored_or_today(radar, args.date)?;
            print!("{}", render_plain_text(&digest));
        }
        DigestCommand::Regenerate => {
            let digest = radar.regenerate_digest();
            print!("{}", render_plain_text(&digest));
        }
        DigestCommand::Export(args) => {
            let digest = stored_or_today(radar, args.date.date)?;
            match args.format {
                ExportFormat::Text => print!("{}", render_plain_text(&digest)),
                ExportFormat::Html => print!("{}", render_html(&digest)),
                ExportFormat::Mailto => println!("{}", email_draft_link(&digest)),
            }
        }
        DigestCommand::Copy => {
            let digest = radar.todays_digest();
            if copy_digest(&digest, clipboard(config).as_ref()) {
                println!("Digest for {} copied to clipboard.", digest.date);
            } else {
                println!(
                    "Clipboard unavailable. Set APP_CLIPBOARD_COMMAND or use `digest export`."
                );
            }
        }
    }
    Ok(())
}

/// Today's digest is created on demand; past dates must already be stored.
fn stored_or_today(
    radar: &JobRadar<FileStore>,
    date: Option<NaiveDate>,
) -> Result<DailyDigest, AppError> {
    match date {
        Some(date) if date != radar.today() => {
            radar.digest_for(date).ok_or(AppError::DigestNotFound(date))
        }
        _ => Ok(radar.todays_digest()),
    }
}
