//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::ViewRequest;
use crate::scale::Scale;
use clap::Parser;
use std::path::PathBuf;

/// Likertboard - descriptive statistics for Likert-scale surveys
///
/// Reads a CSV of survey answers and renders a dashboard of answer
/// distributions, mean scores and sentiment. Markdown/JSON reports.
///
/// Examples:
///   likertboard --input kuesioner.csv
///   likertboard --input kuesioner.csv --labels pertanyaan.csv --format json
///   likertboard --input kuesioner.csv --view most-frequent --format line
///   likertboard --input kuesioner.csv --view most-symbol --symbol SS --format line
///   likertboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Survey CSV file: one row per respondent, one column per question
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// CSV file mapping question ids to question texts
    #[arg(short, long, value_name = "FILE")]
    pub labels: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the config value. With --format line, prints to stdout
    /// unless set.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json, line)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// View to compute (repeatable). Defaults to the full dashboard
    #[arg(long = "view", value_name = "VIEW")]
    pub views: Vec<ViewKind>,

    /// Answer symbol for --view most-symbol and --view symbol-share
    #[arg(long, value_name = "SYMBOL")]
    pub symbol: Option<String>,

    /// Name of the respondent id column
    #[arg(long, value_name = "NAME", env = "LIKERTBOARD_RESPONDENT_COLUMN")]
    pub respondent_column: Option<String>,

    /// Dashboard title
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Leave the score heatmap out of the dashboard
    #[arg(long)]
    pub no_heatmap: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .likertboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 when any requested view could not be computed
    #[arg(long)]
    pub strict: bool,

    /// Generate a default .likertboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown dashboard (default)
    #[default]
    Markdown,
    /// JSON document of every view
    Json,
    /// One compact pipe-delimited line for a single view
    Line,
}

/// View selectable with --view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ViewKind {
    Summary,
    Overall,
    PerQuestion,
    Means,
    GlobalMean,
    Sentiment,
    Extremes,
    MostFrequent,
    LeastFrequent,
    MostSymbol,
    SymbolShare,
    HighestMean,
    LowestMean,
    Heatmap,
}

impl ViewKind {
    fn needs_symbol(&self) -> bool {
        matches!(self, ViewKind::MostSymbol | ViewKind::SymbolShare)
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        if let Some(ref labels) = self.labels {
            if !labels.is_file() {
                return Err(format!("Label file does not exist: {}", labels.display()));
            }
        }

        if self.views.iter().any(ViewKind::needs_symbol) && self.symbol.is_none() {
            return Err("--view most-symbol and --view symbol-share require --symbol".to_string());
        }

        if self.format == OutputFormat::Line && self.views.len() != 1 {
            return Err("--format line needs exactly one --view".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; --quiet wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Views to compute: the selected ones, or the full dashboard.
    pub fn view_requests(&self, scale: &Scale) -> Vec<ViewRequest> {
        if self.views.is_empty() {
            return ViewRequest::dashboard_set(scale);
        }

        let symbol = self.symbol.clone().unwrap_or_default();
        self.views
            .iter()
            .map(|kind| match kind {
                ViewKind::Summary => ViewRequest::Summary,
                ViewKind::Overall => ViewRequest::Overall,
                ViewKind::PerQuestion => ViewRequest::PerQuestion,
                ViewKind::Means => ViewRequest::QuestionMeans,
                ViewKind::GlobalMean => ViewRequest::GlobalMean,
                ViewKind::Sentiment => ViewRequest::Sentiment,
                ViewKind::Extremes => ViewRequest::Extremes,
                ViewKind::MostFrequent => ViewRequest::MostFrequent,
                ViewKind::LeastFrequent => ViewRequest::LeastFrequent,
                ViewKind::MostSymbol => ViewRequest::MostSymbol(symbol.clone()),
                ViewKind::SymbolShare => ViewRequest::SymbolShare(symbol.clone()),
                ViewKind::HighestMean => ViewRequest::HighestMean,
                ViewKind::LowestMean => ViewRequest::LowestMean,
                ViewKind::Heatmap => ViewRequest::ScoreMatrix,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: None,
            labels: None,
            output: None,
            format: OutputFormat::Markdown,
            views: Vec::new(),
            symbol: None,
            respondent_column: None,
            title: None,
            no_heatmap: false,
            config: None,
            verbose: false,
            quiet: false,
            strict: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_repeated_views() {
        let args = Args::try_parse_from([
            "likertboard",
            "--input",
            "data.csv",
            "--view",
            "means",
            "--view",
            "most-symbol",
            "--symbol",
            "SS",
        ])
        .unwrap();

        assert_eq!(args.views, vec![ViewKind::Means, ViewKind::MostSymbol]);
        assert_eq!(args.symbol.as_deref(), Some("SS"));
    }

    #[test]
    fn test_input_required_unless_init_config() {
        assert!(Args::try_parse_from(["likertboard"]).is_err());
        assert!(Args::try_parse_from(["likertboard", "--init-config"]).is_ok());
    }

    #[test]
    fn test_validation_missing_input_file() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("/definitely/not/here.csv"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_symbol_required() {
        let mut args = make_args();
        args.views = vec![ViewKind::SymbolShare];
        assert!(args.validate().is_err());

        args.symbol = Some("STS".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_line_format_needs_one_view() {
        let mut args = make_args();
        args.format = OutputFormat::Line;
        assert!(args.validate().is_err());

        args.views = vec![ViewKind::GlobalMean];
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_from_config_verbose() {
        let mut args = make_args();
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_view_requests_default_to_dashboard() {
        let args = make_args();
        let scale = Scale::likert6();
        assert_eq!(args.view_requests(&scale), ViewRequest::dashboard_set(&scale));
    }

    #[test]
    fn test_view_requests_carry_symbol() {
        let mut args = make_args();
        args.views = vec![ViewKind::MostSymbol, ViewKind::Heatmap];
        args.symbol = Some("CS".to_string());

        assert_eq!(
            args.view_requests(&Scale::likert6()),
            vec![
                ViewRequest::MostSymbol("CS".to_string()),
                ViewRequest::ScoreMatrix
            ]
        );
    }
}
