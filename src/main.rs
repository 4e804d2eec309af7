//! Problem-Harvest main entry point
//!
//! This is the command-line interface for the Problem-Harvest question-bank
//! harvester.

use anyhow::{bail, Context};
use clap::Parser;
use problem_harvest::config::{load_config_with_hash, Config, SinkKind};
use problem_harvest::crawler::{run_crawl, Coordinator};
use problem_harvest::output::{load_statistics, print_report, print_statistics};
use problem_harvest::storage::{open_sink, SqliteSink};
use problem_harvest::{DifficultyFilter, ProblemRecord};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Characters of the description shown by `--slug`
const PREVIEW_CHARS: usize = 200;

/// Problem-Harvest: a polite question-bank harvester
///
/// Walks the problem listing, fetches each free problem one at a time,
/// extracts description, examples and constraints, and stores the result
/// in SQLite or JSON files.
#[derive(Parser, Debug)]
#[command(name = "problem-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite question-bank harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the configured difficulty (easy, medium, hard, any)
    #[arg(long, value_name = "LEVEL")]
    difficulty: Option<DifficultyFilter>,

    /// Validate config and show what would be harvested without harvesting
    #[arg(long, conflicts_with_all = ["stats", "slug", "random"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "slug", "random"])]
    stats: bool,

    /// Harvest a single problem by slug and exit
    #[arg(long, value_name = "SLUG", conflicts_with_all = ["dry_run", "stats", "random"])]
    slug: Option<String>,

    /// Harvest one randomly chosen problem and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "slug"])]
    random: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(difficulty) = cli.difficulty {
        config.crawl.difficulty = difficulty;
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(slug) = cli.slug.as_deref() {
        handle_single(&config, slug).await?;
    } else if cli.random {
        handle_random(&config).await?;
    } else {
        handle_harvest(&config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("problem_harvest=info,warn"),
            1 => EnvFilter::new("problem_harvest=debug,info"),
            2 => EnvFilter::new("problem_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Problem-Harvest Dry Run ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  Query endpoint: {}", config.source.graphql_path);
    println!("  Landing page: {}", config.source.landing_path);
    println!();

    println!("Crawl:");
    println!("  Difficulty: {}", config.crawl.difficulty);
    println!("  Page size: {}", config.crawl.page_size);
    println!("  Page delay: {}ms", config.crawl.page_delay_ms);
    println!("  Detail delay: {}ms", config.crawl.detail_delay_ms);
    println!("  Request timeout: {}s", config.crawl.request_timeout_secs);
    match config.crawl.max_problems {
        Some(max) => println!("  Max problems: {}", max),
        None => println!("  Max problems: unlimited"),
    }
    println!();

    println!("Output:");
    match config.output.sink {
        SinkKind::Sqlite => println!("  SQLite database: {}", config.output.database_path),
        SinkKind::Json => println!("  JSON directory: {}", config.output.json_dir),
        SinkKind::Memory => println!("  In-memory (nothing is persisted)"),
    }
    println!("  Placeholders: {}", config.output.placeholders);
    println!();

    println!("Configuration is valid. Run without --dry-run to start harvesting.");
}

/// Handles the --stats mode: shows what the SQLite store holds
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.database_path);
    if !path.exists() {
        bail!("Database not found: {}", path.display());
    }

    let sink = SqliteSink::new(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    let stats = load_statistics(&sink)?;
    print_statistics(&stats);
    Ok(())
}

/// Handles the --slug mode: harvests one problem and previews it
async fn handle_single(config: &Config, slug: &str) -> anyhow::Result<()> {
    let sink = open_sink(&config.output)?;
    let mut coordinator = Coordinator::new(config, sink)?;

    let record = coordinator
        .harvest_slug(slug)
        .await
        .with_context(|| format!("Failed to harvest '{}'", slug))?;

    print_preview(&record);
    Ok(())
}

/// Handles the --random mode: harvests one random problem and previews it
async fn handle_random(config: &Config) -> anyhow::Result<()> {
    let sink = open_sink(&config.output)?;
    let mut coordinator = Coordinator::new(config, sink)?;

    let record = coordinator
        .harvest_random()
        .await
        .context("Failed to harvest a random problem")?;

    print_preview(&record);
    Ok(())
}

/// Handles the default mode: a full harvest
async fn handle_harvest(config: &Config, config_hash: String) -> anyhow::Result<()> {
    let report = run_crawl(config, Some(config_hash)).await?;
    print_report(&report);

    if !report.outcome.is_completed() {
        bail!("Harvest did not complete: {}", report.outcome);
    }
    Ok(())
}

fn print_preview(record: &ProblemRecord) {
    println!("=== {}. {} ({}) ===\n", record.id, record.title, record.difficulty);
    println!("URL: {}", record.url);
    println!();

    let preview: String = record.description.chars().take(PREVIEW_CHARS).collect();
    if preview.len() < record.description.len() {
        println!("{}...", preview);
    } else {
        println!("{}", preview);
    }
    println!();

    println!("Examples: {}", record.examples.len());
    for example in &record.examples {
        println!("  - {}", example);
    }
    println!("Constraints: {}", record.constraints.len());
    for constraint in &record.constraints {
        println!("  - {}", constraint);
    }
}
