//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.likertboard.toml` files. The answer scale and sentiment buckets live
//! here so a survey with different labels needs no code change.

use crate::error::SurveyResult;
use crate::scale::{default_bucket_lists, default_points, Scale, ScalePoint, SentimentBuckets};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".likertboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Survey file layout.
    #[serde(default)]
    pub input: InputConfig,

    /// Answer scale.
    #[serde(default)]
    pub scale: ScaleConfig,

    /// Sentiment buckets.
    #[serde(default)]
    pub sentiment: SentimentConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Log at debug level, as with --verbose. --quiet still wins.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "survey_dashboard.md".to_string()
}

/// Layout of the survey and label CSV files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Column holding the respondent id; excluded from aggregation.
    #[serde(default = "default_respondent_column")]
    pub respondent_column: String,

    /// Field delimiter of the CSV files.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Question id column of the label file.
    #[serde(default = "default_label_id_column")]
    pub label_id_column: String,

    /// Question text column of the label file.
    #[serde(default = "default_label_text_column")]
    pub label_text_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            respondent_column: default_respondent_column(),
            delimiter: default_delimiter(),
            label_id_column: default_label_id_column(),
            label_text_column: default_label_text_column(),
        }
    }
}

fn default_respondent_column() -> String {
    "Partisipan".to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_label_id_column() -> String {
    "ID".to_string()
}

fn default_label_text_column() -> String {
    "Pertanyaan".to_string()
}

/// Answer symbols from highest to lowest agreement, with their scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleConfig {
    #[serde(default = "default_points")]
    pub points: Vec<ScalePoint>,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            points: default_points(),
        }
    }
}

/// Symbols of each sentiment bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    #[serde(default = "default_positive")]
    pub positive: Vec<String>,

    #[serde(default = "default_neutral")]
    pub neutral: Vec<String>,

    #[serde(default = "default_negative")]
    pub negative: Vec<String>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive: default_positive(),
            neutral: default_neutral(),
            negative: default_negative(),
        }
    }
}

fn default_positive() -> Vec<String> {
    default_bucket_lists().0
}

fn default_neutral() -> Vec<String> {
    default_bucket_lists().1
}

fn default_negative() -> Vec<String> {
    default_bucket_lists().2
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Dashboard title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Width of the text bars in the Markdown dashboard.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,

    /// Include the respondent × question heatmap.
    #[serde(default = "default_true")]
    pub include_heatmap: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            bar_width: default_bar_width(),
            include_heatmap: true,
        }
    }
}

fn default_title() -> String {
    "Survey Dashboard".to_string()
}

fn default_bar_width() -> usize {
    30
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(ref column) = args.respondent_column {
            self.input.respondent_column = column.clone();
        }

        if let Some(ref title) = args.title {
            self.report.title = title.clone();
        }

        if args.no_heatmap {
            self.report.include_heatmap = false;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Validated answer scale.
    pub fn scale(&self) -> SurveyResult<Scale> {
        Scale::new(self.scale.points.clone())
    }

    /// Validated sentiment buckets for `scale`.
    pub fn sentiment_buckets(&self, scale: &Scale) -> SurveyResult<SentimentBuckets> {
        SentimentBuckets::new(
            self.sentiment.positive.clone(),
            self.sentiment.neutral.clone(),
            self.sentiment.negative.clone(),
            scale,
        )
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Sentiment;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.respondent_column, "Partisipan");
        assert_eq!(config.scale.points.len(), 6);
        assert_eq!(config.report.bar_width, 30);

        let scale = config.scale().unwrap();
        assert_eq!(scale, Scale::likert6());
        assert_eq!(
            config.sentiment_buckets(&scale).unwrap(),
            SentimentBuckets::likert6()
        );
    }

    #[test]
    fn test_parse_custom_scale() {
        let toml_content = r#"
[input]
respondent_column = "Respondent"

[[scale.points]]
symbol = "SA"
score = 5

[[scale.points]]
symbol = "A"
score = 4

[[scale.points]]
symbol = "N"
score = 3

[[scale.points]]
symbol = "D"
score = 2

[[scale.points]]
symbol = "SD"
score = 1

[sentiment]
positive = ["SA", "A"]
neutral = ["N"]
negative = ["D", "SD"]

[report]
title = "Staff Survey"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.respondent_column, "Respondent");
        assert_eq!(config.input.label_id_column, "ID");
        assert_eq!(config.report.title, "Staff Survey");

        let scale = config.scale().unwrap();
        assert_eq!(scale.len(), 5);
        assert_eq!(scale.score("SA"), Some(5));

        let buckets = config.sentiment_buckets(&scale).unwrap();
        assert_eq!(buckets.bucket_of("N"), Some(Sentiment::Neutral));
    }

    #[test]
    fn test_buckets_must_match_scale() {
        let toml_content = r#"
[[scale.points]]
symbol = "YES"
score = 2

[[scale.points]]
symbol = "NO"
score = 1
"#;
        let config: Config = toml::from_str(toml_content).unwrap();
        let scale = config.scale().unwrap();
        // Default buckets name the six-point symbols, which this scale lacks.
        assert!(config.sentiment_buckets(&scale).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general]\noutput = \"out.json\"\nverbose = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.general.output, "out.json");
        assert!(config.general.verbose);
    }

    #[test]
    fn test_load_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general\noutput = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[sentiment]"));
        assert!(toml_str.contains("STS"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.scale().unwrap(), Scale::likert6());
    }
}
