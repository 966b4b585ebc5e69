use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Result};
use tracing::{info, warn};

use hubnotes::commands::{
    compare_repositories, create_dashboard, create_from_reference, format_budget, format_commits,
    format_issues, format_pull_requests, import_owner, list_commits, list_issues,
    list_pull_requests, pull_request_diff, rate_limits, switch_branch, watch, ConfigReloadHook,
};
use hubnotes::logging::{init_logging, parse_rotation, LogConfig, LOG_FILENAME};
use hubnotes::refresh::{tally, Orchestrator, StderrNotifier};
use hubnotes::remote::CurrentClient;
use hubnotes::snapshot::ListState;
use hubnotes::user_config::{interval_from_minutes, load_config};
use hubnotes::utils::format_display_path;
use hubnotes::vault::Vault;

/// Hubnotes - GitHub repository metadata mirrored into Markdown notes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Vault root; note paths are relative to it
    #[arg(long, env = "HUBNOTES_VAULT", default_value = ".")]
    vault: PathBuf,

    /// GitHub token, overrides auth_token from the vault config
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable JSON log format
    #[arg(long, env = "HUBNOTES_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "HUBNOTES_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: ~/.hubnotes/logs)
    #[arg(long, env = "HUBNOTES_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a note for a repository URL
    Create {
        reference: String,
        #[arg(long)]
        branch: Option<String>,
    },
    /// Refresh one note
    Refresh { path: PathBuf },
    /// Refresh every repository note and dashboard once
    RefreshAll,
    /// Refresh on a timer until interrupted
    Watch {
        /// Minutes between cycles, overrides the vault config
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Create or refresh the dashboard note
    Dashboard,
    /// Create notes for every repository of an owner
    Import { owner: String },
    /// Write a comparison note for two or more repositories
    Compare {
        #[arg(required = true, num_args = 2..)]
        references: Vec<String>,
    },
    /// List issues of a repository
    Issues {
        reference: String,
        #[arg(long, default_value = "open")]
        state: ListState,
    },
    /// List pull requests of a repository, or print one diff
    Pulls {
        reference: String,
        #[arg(long, default_value = "open")]
        state: ListState,
        /// Print the diff of this pull request instead of the list
        #[arg(long)]
        diff: Option<u64>,
    },
    /// List recent commits of a repository
    Commits {
        reference: String,
        #[arg(long)]
        branch: Option<String>,
    },
    /// Track another branch in a repository note; empty for the default branch
    SwitchBranch { path: PathBuf, branch: String },
    /// Show the remaining API budget
    Limits,
}

#[allow(unknown_lints, max_lines_per_function)]
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let mut log_config = LogConfig {
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };
    if let Some(dir) = args.log_dir {
        log_config.log_dir = PathBuf::from(dir);
    }
    let log_file = log_config.log_dir.join(LOG_FILENAME);
    if let Err(e) = init_logging(log_config) {
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!("Logs: {}", format_display_path(&log_file.to_string_lossy()));
        return Err(e);
    }

    let config = load_config(&args.vault)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to load vault config, using defaults: {e}");
            hubnotes::UserConfig::default()
        })
        .with_token_override(args.token.as_deref());

    let client = Arc::new(CurrentClient::github(
        &config.api_base_url,
        &config.auth_token,
    )?);
    let orchestrator = Arc::new(Orchestrator::new(
        Vault::new(&args.vault),
        Arc::clone(&client),
        config.template_options,
        Arc::new(StderrNotifier),
    ));
    let folder = config.default_folder.as_str();
    let mut out = std::io::stdout().lock();

    match args.command {
        Command::Create { reference, branch } => {
            let path =
                create_from_reference(&orchestrator, folder, &reference, branch.as_deref()).await?;
            writeln!(out, "{}", path.display())?;
        }
        Command::Refresh { path } => {
            let outcome = orchestrator.refresh_one(&path, false).await;
            if !outcome.is_success() {
                bail!("{outcome}");
            }
        }
        Command::RefreshAll => {
            let outcomes = orchestrator.refresh_all().await;
            for outcome in &outcomes {
                writeln!(out, "{outcome}")?;
            }
            let (synced, failed) = tally(&outcomes);
            writeln!(out, "{synced} refreshed, {failed} failed")?;
        }
        Command::Watch { interval } => {
            let period = interval.map_or_else(|| config.refresh_interval(), interval_from_minutes);
            let hook = Arc::new(ConfigReloadHook::new(
                args.vault.clone(),
                args.token.clone(),
                &config.auth_token,
            ));
            info!(vault = %args.vault.display(), "Starting watch");
            watch(Arc::clone(&orchestrator), hook, period, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Could not listen for Ctrl-C: {e}");
                }
            })
            .await?;
        }
        Command::Dashboard => {
            let outcome = create_dashboard(&orchestrator, folder).await?;
            if !outcome.is_success() {
                bail!("{outcome}");
            }
            writeln!(out, "{}", outcome.path.display())?;
        }
        Command::Import { owner } => {
            let report = import_owner(&orchestrator, folder, &owner).await?;
            for path in &report.created {
                writeln!(out, "created {}", path.display())?;
            }
            for name in &report.skipped {
                writeln!(out, "skipped {name} (already tracked)")?;
            }
            for (name, reason) in &report.failed {
                writeln!(out, "failed {name}: {reason}")?;
            }
        }
        Command::Compare { references } => {
            let result = compare_repositories(&orchestrator, folder, &references).await?;
            writeln!(out, "{}", result.path.display())?;
        }
        Command::Issues { reference, state } => {
            let issues = list_issues(&client, &reference, state).await?;
            write!(out, "{}", format_issues(&issues))?;
        }
        Command::Pulls {
            reference,
            state,
            diff,
        } => {
            if let Some(number) = diff {
                let diff = pull_request_diff(&client, &reference, number).await?;
                write!(out, "{diff}")?;
            } else {
                let pulls = list_pull_requests(&client, &reference, state).await?;
                write!(out, "{}", format_pull_requests(&pulls))?;
            }
        }
        Command::Commits { reference, branch } => {
            let commits = list_commits(&client, &reference, branch.as_deref()).await?;
            write!(out, "{}", format_commits(&commits))?;
        }
        Command::SwitchBranch { path, branch } => {
            let outcome = switch_branch(&orchestrator, &path, &branch).await?;
            if !outcome.is_success() {
                bail!("{outcome}");
            }
        }
        Command::Limits => {
            let budget = rate_limits(&client).await?;
            writeln!(out, "{}", format_budget(&budget, chrono::Utc::now()))?;
        }
    }

    Ok(())
}
