//! Attribute Search Sweep CLI
//!
//! Writes the fixture CSV files into a fresh repository directory, builds the
//! combinatorial scenario list, and runs it against the search service on a
//! dedicated worker thread.
//!
//! Usage:
//!   cargo run --bin search_harness -- /tmp/sweep-repo
//!   cargo run --bin search_harness -- /tmp/sweep-repo --dry-run --limit 20 --verbose
//!   cargo run --bin search_harness -- /tmp/sweep-repo --config harness.yaml --json

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use attr_search_harness::{
    catalog, prepare_fixtures, HarnessConfig, HttpSearchBackend, RecordingBackend, RunSummary,
    SearchBackend, SearchScenario, SweepRunner,
};

/// Combinatorial search-by-attributes sweep
#[derive(Parser, Debug)]
#[command(name = "search_harness")]
#[command(about = "Run the attribute search sweep against the entity search service")]
struct Args {
    /// Repository directory to create; must not exist yet
    directory: PathBuf,

    /// YAML configuration file
    #[arg(long, short = 'c', env = "SEARCH_HARNESS_CONFIG")]
    config: Option<PathBuf>,

    /// Build and record requests without contacting the service
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Only run the first N scenarios
    #[arg(long, short = 'l')]
    limit: Option<usize>,

    /// Show every scenario outcome, not just problems
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,
}

fn sweep<B: SearchBackend + 'static>(
    runner: &SweepRunner,
    scenarios: Arc<Vec<SearchScenario>>,
    backend: B,
) -> Result<RunSummary> {
    let (summary, _backend) = runner
        .run_on_worker(scenarios, backend)
        .context("Search sweep did not complete")?;
    Ok(summary)
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.directory.exists() {
        bail!(
            "Must specify a directory that does not exist: {}",
            args.directory.display()
        );
    }

    let config = HarnessConfig::load(args.config.as_deref())?;

    std::fs::create_dir_all(&args.directory)
        .with_context(|| format!("Failed to create {}", args.directory.display()))?;
    let manifest = prepare_fixtures(&args.directory, &catalog::fixture_tables())
        .context("Failed to prepare fixture files")?;
    info!(
        data_sources = ?manifest.data_sources,
        "Fixtures ready for loading"
    );

    let scenarios = config
        .assembler()
        .assemble(&catalog::search_groups())
        .context("Failed to assemble scenarios")?;
    let scenarios = Arc::new(scenarios);

    let runner = SweepRunner::new(&config).with_limit(args.limit);
    let summary = if args.dry_run {
        sweep(&runner, scenarios, RecordingBackend::new())?
    } else {
        let backend = HttpSearchBackend::new(Duration::from_secs(config.request_timeout_secs))?;
        sweep(&runner, scenarios, backend)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print_summary(args.verbose);
    }

    if !summary.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}
