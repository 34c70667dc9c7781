mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use devscout_core::{AnalysisContext, ScoutError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "devscout")]
#[command(about = "GitHub profile analysis, filtered search, and candidate ranking")]
struct Cli {
    /// Write the HTML report to this file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze one profile
    Analyze {
        /// Login, @login, or profile URL
        identifier: String,
        /// Audience of the report (recruitment or self-review)
        #[arg(long, default_value = "recruitment")]
        context: AnalysisContext,
    },
    /// Find a profile matching filters and analyze it
    Search {
        /// Accepted language (repeatable; any one suffices)
        #[arg(long = "language")]
        languages: Vec<String>,
        /// Skill keyword (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,
        /// Methodology keyword (repeatable)
        #[arg(long = "methodology")]
        methodologies: Vec<String>,
        /// Minimum public repositories
        #[arg(long, default_value_t = 0)]
        min_repos: u32,
        /// Minimum stars across scanned repositories
        #[arg(long, default_value_t = 0)]
        min_stars: u64,
        /// Minimum followers
        #[arg(long, default_value_t = 0)]
        min_followers: u32,
        /// Require public activity in the last 90 days
        #[arg(long)]
        recent: bool,
        /// Location as written on the profile
        #[arg(long)]
        location: Option<String>,
    },
    /// Rank candidates against a job description
    Rank {
        /// File holding the job description
        #[arg(long)]
        job_file: PathBuf,
        /// Candidate login, @login, or profile URL (repeatable, up to 5)
        #[arg(long = "candidate", required = true)]
        candidates: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ScoutError>() {
                Some(scout) => eprintln!("{}: {scout}", scout.kind()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = devscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    let services = commands::Services::from_config(&config)?;
    let html = match cli.command {
        Commands::Analyze {
            identifier,
            context,
        } => commands::analyze(&services, &identifier, context).await?,
        Commands::Search {
            languages,
            skills,
            methodologies,
            min_repos,
            min_stars,
            min_followers,
            recent,
            location,
        } => {
            let criteria = devscout_core::FilterCriteria {
                languages,
                min_repos,
                min_stars,
                min_followers,
                recent_activity: recent,
                keyword: None,
                location,
            }
            .with_terms(&skills, &methodologies);
            commands::search(&services, &criteria).await?
        }
        Commands::Rank {
            job_file,
            candidates,
        } => commands::rank(&services, &job_file, &candidates).await?,
    };

    commands::write_output(cli.output.as_deref(), &html)
}
