//! suitelog - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use suitelog::changelog::{render_release, write_release, writer::generate_summary, SuiteRelease};
use suitelog::github::{github_token, GitHubSource};
use suitelog::suite::{collect_suite, SuiteConfig};
use suitelog::version::latest_release_in_dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

/// Generate combined release notes for a suite of repositories.
#[derive(Parser, Debug)]
#[command(name = "suitelog")]
#[command(about = "Generate combined release notes for a suite of repositories")]
#[command(version)]
struct Cli {
    /// Suite descriptor listing component repositories
    #[arg(short = 'f', long, default_value = "suite.yml")]
    file: PathBuf,

    /// Directory of published suite descriptors; the latest one pins the starting versions
    #[arg(short = 'r', long)]
    releases_dir: Option<PathBuf>,

    /// Collect changes released after the pinned versions (overrides --releases-dir)
    #[arg(long)]
    unreleased: bool,

    /// Suite version embedded in the output
    #[arg(short = 'v', long, default_value = "Unreleased")]
    suite_version: String,

    /// Release date as YYYY-MM-DD (defaults to today, UTC)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// GitHub token (falls back to GITHUB_TOKEN, then GH_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Output file; prints to stdout when omitted
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // Step 1: Load the suite descriptor
    let mut config = SuiteConfig::load(&cli.file)
        .with_context(|| format!("Failed to load suite descriptor {}", cli.file.display()))?;

    // Step 2: Decide the starting versions
    if cli.unreleased {
        info!("Collecting unreleased changes");
        config.select_unreleased();
    } else if let Some(dir) = &cli.releases_dir {
        let latest = latest_release_in_dir(dir).context("Failed to find previous suite release")?;
        info!(baseline = %latest.display(), "Using previous suite release as baseline");

        let previous = SuiteConfig::load(&latest)
            .with_context(|| format!("Failed to load previous suite release {}", latest.display()))?;
        config.set_baseline_repo_versions(&previous);
    }

    // Step 3: Collect component changelogs
    let token = github_token(cli.token.as_deref());
    if token.is_none() {
        info!("No GitHub token found, using unauthenticated requests");
    }
    let source = GitHubSource::new(token).context("Failed to create GitHub client")?;

    let categories = collect_suite(&config, &source)
        .await
        .context("Failed to collect component changelogs")?;

    // Step 4: Render
    let date = cli.date.unwrap_or_else(|| Utc::now().date_naive());
    let release = SuiteRelease::new(&config, &cli.suite_version, date, categories);

    let rendered = match cli.format {
        OutputFormat::Markdown => render_release(&release),
        OutputFormat::Json => release.to_json().context("Failed to serialize release notes")?,
    };

    // Step 5: Write or print
    match &cli.output {
        Some(path) => {
            write_release(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "{}", generate_summary(&release));
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Log to stderr so stdout carries only the release notes.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
