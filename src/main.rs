//! Likertboard - Likert-scale survey dashboard
//!
//! A CLI tool that reads survey answers from CSV, aggregates them over a
//! configurable ordinal scale, and renders a dashboard of the results.
//!
//! Exit codes:
//!   0 - Success (or some views failed without --strict)
//!   1 - Runtime error (unreadable input, invalid config, etc.)
//!   2 - At least one requested view failed and --strict was set

mod analysis;
mod cli;
mod config;
mod error;
mod ingest;
mod models;
mod report;
mod scale;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use ingest::{IngestConfig, SurveyReader};
use models::{Report, ReportMetadata};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first so [general] verbose can raise the log level
    let loaded = load_config(&args);
    let config_verbose = matches!(&loaded, Ok((config, _)) if config.general.verbose);

    // Initialize logging
    init_logging(args.log_level(config_verbose));

    info!("Likertboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let result = loaded.and_then(|(config, origin)| {
        origin.log();
        run(args, config)
    });

    match result {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .likertboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize the scale, sentiment buckets, and columns.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load, aggregate and render. Returns exit code (0 or 2).
fn run(args: Args, mut config: Config) -> Result<i32> {
    config.merge_with_args(&args);

    let scale = config.scale().context("Invalid [scale] configuration")?;
    let buckets = config
        .sentiment_buckets(&scale)
        .context("Invalid [sentiment] configuration")?;

    // Step 1: Read the survey
    let input = args
        .input
        .clone()
        .context("No input file given (use --input)")?;
    let reader = SurveyReader::new(IngestConfig::from(&config.input));
    let table = reader.load_responses(&input)?;

    let labels = match args.labels {
        Some(ref path) => reader.load_labels(path)?,
        None => Default::default(),
    };

    if let Ok(summary) = analysis::dataset_summary(&table, &scale) {
        if summary.unknown_cells > 0 {
            warn!(
                "{} of {} answers are outside the scale and will be left out",
                summary.unknown_cells, summary.cells
            );
        }
    }

    // Step 2: Compute the requested views
    let requests = args.view_requests(&scale);
    let outcomes = analysis::evaluate_all(&requests, &table, &scale, &buckets);
    let failed = outcomes.iter().filter(|o| o.is_failed()).count();

    // Step 3: Render
    if args.format == OutputFormat::Line {
        let line = outcomes
            .first()
            .map(report::generate_line)
            .unwrap_or_default();

        match args.output {
            Some(ref path) => std::fs::write(path, format!("{}\n", line))
                .with_context(|| format!("Failed to write output to {}", path.display()))?,
            None => println!("{}", line),
        }
        return Ok(exit_code(&args, failed));
    }

    let report = Report {
        title: config.report.title.clone(),
        metadata: ReportMetadata {
            source: input.display().to_string(),
            analysis_date: Utc::now(),
            respondents: table.respondent_count(),
            questions: table.question_count(),
            views_requested: outcomes.len(),
            views_failed: failed,
        },
        labels,
        outcomes,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        _ => report::generate_markdown_report(
            &report,
            &report::RenderOptions::from(&config.report),
        ),
    };

    let output_path = output_path(&args, &config);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Survey Summary:");
    println!("   Respondents: {}", report.metadata.respondents);
    println!("   Questions: {}", report.metadata.questions);
    println!(
        "   Views: {} computed | {} failed",
        report.metadata.views_requested - failed,
        failed
    );
    for outcome in report.outcomes.iter().filter(|o| o.is_failed()) {
        if let Err(ref e) = outcome.result {
            println!("   ⚠️  {}: {}", outcome.request.title(), e);
        }
    }
    println!(
        "\n✅ Dashboard complete! Report saved to: {}",
        output_path.display()
    );

    Ok(exit_code(&args, failed))
}

/// Exit code 2 when --strict is set and a view failed.
fn exit_code(args: &Args, failed: usize) -> i32 {
    if args.strict && failed > 0 {
        eprintln!(
            "\n⛔ {} view(s) could not be computed. Failing (exit code 2).",
            failed
        );
        2
    } else {
        0
    }
}

/// Explicit --output, or the configured output (as .json for JSON reports).
fn output_path(args: &Args, config: &Config) -> PathBuf {
    if let Some(ref path) = args.output {
        return path.clone();
    }

    let path = PathBuf::from(&config.general.output);
    if args.format == OutputFormat::Json {
        path.with_extension("json")
    } else {
        path
    }
}

/// Where the configuration came from. Logged once the subscriber is set up.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Unreadable(String),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::DefaultFile => info!("Loaded default config from {}", DEFAULT_CONFIG_FILE),
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::Unreadable(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Unreadable(e.to_string()))),
    }
}
