//! wee-summary - Web Exploration Engine result summarizer
//!
//! A CLI tool that aggregates per-URL scrape results into a summary
//! (status counts, industry breakdowns, rankings, sentiment rollups)
//! and writes it as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success (match percentage at or above --min-match, or no --min-match set)
//!   1 - Runtime error (missing input, API failure, config error, etc.)
//!   2 - Match percentage below the --min-match threshold

mod analysis;
mod cli;
mod client;
mod config;
mod error;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use loader::{LoadConfig, LoadedInput, ResultLoader};
use report::{ReportDocument, ReportMetadata};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("wee-summary v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Summary failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .wee-summary.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize thresholds, input filters, and the API endpoint.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete summary workflow. Returns exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    if args.dry_run {
        let input = args.input.clone().unwrap_or_default();
        return handle_dry_run(&input, &LoadConfig::from(&config.input));
    }

    // Step 1: Collect results
    let loaded = match (&args.input, &args.job) {
        (Some(input), _) => {
            println!("📂 Loading results from: {}", input.display());
            let loader = ResultLoader::new(input.clone(), LoadConfig::from(&config.input));
            loader.load()?
        }
        (None, Some(job_id)) => {
            println!("🛰️  Fetching job {} from {}", job_id, config.api.base_url);
            let mut client_config =
                client::ClientConfig::from_config(&config.api, config.input.score_scale);
            client_config.show_progress = !args.quiet;

            let job_client = client::JobClient::new(client_config)?;
            let batch = job_client
                .wait_for_results(job_id)
                .await
                .with_context(|| format!("Failed to fetch results for job {}", job_id))?;
            LoadedInput {
                batch,
                ..LoadedInput::default()
            }
        }
        (None, None) => anyhow::bail!("Either --input or --job is required"),
    };

    let batch = &loaded.batch;
    if !batch.failures.is_empty() {
        warn!(
            "Excluding {} failed scrapes from the summary",
            batch.failures.len()
        );
    }
    if batch.results.is_empty() {
        warn!("No scrape results found; the summary will be empty");
    }

    // Step 2: Aggregate
    println!("\n📊 Summarizing {} results...", batch.results.len());
    let summary = analysis::generate_summary(&batch.results, &config.summary_options());

    // Step 3: Build and write the report
    let report = ReportDocument {
        metadata: ReportMetadata {
            source: args.source_label(),
            generated_at: Utc::now(),
            files_loaded: loaded.files_loaded,
            files_failed: loaded.files_failed,
            scrape_failures: batch.failures.len(),
            invalid_entries: batch.invalid,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        summary,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_path = PathBuf::from(&config.general.output);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    print_digest(&report);
    println!(
        "\n✅ Summary complete! Report saved to: {}",
        output_path.display()
    );

    // Check --min-match threshold
    if let Some(min_match) = args.min_match {
        let actual = report.summary.percentage_match;
        if actual < min_match {
            eprintln!(
                "\n⛔ Metadata/domain match {:.2}% is below {:.2}%. Failing (exit code 2).",
                actual, min_match
            );
            return Ok(2);
        }
    }

    Ok(0)
}

fn print_digest(report: &ReportDocument) {
    let summary = &report.summary;
    let [live, parked] = summary.domain_status;

    println!("\n📋 Summary:");
    println!("   URLs: {}", summary.total_urls);
    println!(
        "   - 🟢 Live: {} | 🟡 Parked: {} | 🔴 Errors: {}",
        live, parked, summary.domain_error_status
    );
    println!("   Scrapable: {}", summary.scrapable_urls);
    println!("   Metadata/domain match: {:.2}%", summary.percentage_match);
    if let Some((industry, pct)) = summary
        .industry_percentages
        .industries
        .iter()
        .zip(&summary.industry_percentages.percentages)
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
    {
        println!("   Leading industry: {} ({:.2}%)", industry, pct);
    }
    println!("   Average scrape time: {:.2}s", summary.avg_time);
    println!("   Duration: {:.1}s", report.metadata.duration_seconds);
}

/// Handle --dry-run: scan files, print what would be loaded, exit.
fn handle_dry_run(input: &Path, load_config: &LoadConfig) -> Result<i32> {
    println!("\n🔍 Dry run: scanning {} (nothing is parsed)...\n", input.display());

    let loader = ResultLoader::new(input.to_path_buf(), load_config.clone());
    let files = loader.scan()?;

    if files.is_empty() {
        println!("   No matching result files found.");
    } else {
        println!("   Found {} files that would be loaded:\n", files.len());
        for file in &files {
            println!("     📄 {} ({} bytes)", file.path, file.size);
        }
        println!("\n   Total: {} files", files.len());
    }

    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
