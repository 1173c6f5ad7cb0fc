//! CLI commands implementation.

mod ads;
mod analyze;
mod ingest;
mod init;
mod insights;
mod job;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, Settings};
use crate::models::Platform;

#[derive(Parser)]
#[command(name = "adscope")]
#[command(about = "Ad library normalization, scoring and analysis")]
#[command(version)]
pub struct Cli {
    /// Data directory (overrides the config file)
    #[arg(long, global = true, env = "ADSCOPE_TARGET")]
    target: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Manage scrape jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Normalize a provider dataset and store it under a job
    Ingest {
        /// Job ID
        job_id: String,
        /// Dataset file (JSON array, or object with `items`/`data`)
        file: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalize a dataset without storing it and print the result as JSON
    Normalize {
        /// Dataset file
        file: PathBuf,
        #[arg(short, long, value_enum, default_value = "facebook")]
        platform: Platform,
    },

    /// Browse stored ads
    Ads {
        #[command(subcommand)]
        command: AdsCommands,
    },

    /// Aggregate insights over stored ads
    Insights {
        #[arg(short, long, value_enum)]
        platform: Option<Platform>,
        /// Print insights as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze a stored ad with the configured provider
    Analyze {
        /// Ad row ID
        ad_id: String,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// Create a pending job
    Create {
        #[arg(short, long, value_enum)]
        platform: Platform,
        /// Search query
        #[arg(short, long)]
        query: String,
        /// Country code for the ad library search
        #[arg(short, long, default_value = "US")]
        country: String,
    },
    /// Mark a job running under a provider run
    Start {
        job_id: String,
        #[arg(long)]
        run_id: String,
    },
    /// Apply a provider run status (ingests the dataset on SUCCEEDED)
    Status {
        job_id: String,
        /// Provider status, e.g. RUNNING, SUCCEEDED, FAILED, TIMED-OUT, ABORTED
        status: String,
        /// Dataset file, required for SUCCEEDED
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Mark a job failed
    Fail { job_id: String },
    /// List jobs
    List,
    /// Show a job and its ads
    Show { job_id: String },
}

#[derive(Subcommand)]
enum AdsCommands {
    /// List stored ads, most recent first
    List {
        /// Only ads that have been analyzed
        #[arg(long)]
        analyzed: bool,
        #[arg(short, long, value_enum)]
        platform: Option<Platform>,
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },
    /// Show one stored ad
    Show {
        id: String,
        /// Include the raw provider item
        #[arg(long)]
        raw: bool,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    if let Some(target) = cli.target {
        settings.data_dir = target;
    }

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Job { command } => match command {
            JobCommands::Create {
                platform,
                query,
                country,
            } => job::cmd_job_create(&settings, platform, &query, &country).await,
            JobCommands::Start { job_id, run_id } => {
                job::cmd_job_start(&settings, &job_id, &run_id).await
            }
            JobCommands::Status {
                job_id,
                status,
                file,
            } => job::cmd_job_status(&settings, &job_id, &status, file.as_deref()).await,
            JobCommands::Fail { job_id } => job::cmd_job_fail(&settings, &job_id).await,
            JobCommands::List => job::cmd_job_list(&settings).await,
            JobCommands::Show { job_id } => job::cmd_job_show(&settings, &job_id).await,
        },
        Commands::Ingest { job_id, file, json } => {
            ingest::cmd_ingest(&settings, &job_id, &file, json).await
        }
        Commands::Normalize { file, platform } => ingest::cmd_normalize(&file, platform).await,
        Commands::Ads { command } => match command {
            AdsCommands::List {
                analyzed,
                platform,
                limit,
            } => ads::cmd_ads_list(&settings, analyzed, platform, limit).await,
            AdsCommands::Show { id, raw } => ads::cmd_ads_show(&settings, &id, raw).await,
        },
        Commands::Insights { platform, json } => {
            insights::cmd_insights(&settings, platform, json).await
        }
        Commands::Analyze { ad_id } => analyze::cmd_analyze(&settings, &config, &ad_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_job_create() {
        let cli = Cli::try_parse_from([
            "adscope", "job", "create", "--platform", "tiktok", "--query", "protein bars",
        ])
        .unwrap();
        match cli.command {
            Commands::Job {
                command:
                    JobCommands::Create {
                        platform,
                        query,
                        country,
                    },
            } => {
                assert_eq!(platform, Platform::Tiktok);
                assert_eq!(query, "protein bars");
                assert_eq!(country, "US");
            }
            _ => panic!("expected job create"),
        }
    }
}
