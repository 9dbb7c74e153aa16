//! Data models for the survey aggregator.
//!
//! This module contains the response table the aggregator reads and every
//! derived view it produces.

use crate::analysis::ViewOutcome;
use crate::error::{SurveyError, SurveyResult};
use crate::scale::Sentiment;
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{HashMap, HashSet};

/// Percentage of `part` in `total`, or 0.0 when `total` is zero.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// One survey participant and their answers, aligned with the table's questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    /// Respondent identifier (from the id column, or the 1-based row number).
    pub id: String,
    /// Raw answer tokens, one per question.
    pub answers: Vec<String>,
}

/// Rectangular table of survey answers: one row per respondent, one column per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseTable {
    questions: Vec<String>,
    respondents: Vec<Respondent>,
}

impl ResponseTable {
    /// Builds a table, rejecting blank or duplicate question ids and ragged rows.
    pub fn new(questions: Vec<String>, respondents: Vec<Respondent>) -> SurveyResult<Self> {
        let mut seen = HashSet::new();
        for question in &questions {
            if question.trim().is_empty() {
                return Err(SurveyError::MalformedInput(
                    "question identifiers must not be blank".to_string(),
                ));
            }
            if !seen.insert(question.as_str()) {
                return Err(SurveyError::MalformedInput(format!(
                    "question '{}' appears more than once",
                    question
                )));
            }
        }

        for respondent in &respondents {
            if respondent.answers.len() != questions.len() {
                return Err(SurveyError::MalformedInput(format!(
                    "respondent '{}' has {} answers, expected {}",
                    respondent.id,
                    respondent.answers.len(),
                    questions.len()
                )));
            }
        }

        Ok(Self {
            questions,
            respondents,
        })
    }

    /// Builds a table from literal rows, numbering respondents from 1.
    #[allow(dead_code)] // Convenience constructor for literal tables
    pub fn from_rows(questions: &[&str], rows: &[Vec<&str>]) -> SurveyResult<Self> {
        let respondents = rows
            .iter()
            .enumerate()
            .map(|(i, row)| Respondent {
                id: (i + 1).to_string(),
                answers: row.iter().map(|s| s.to_string()).collect(),
            })
            .collect();

        Self::new(questions.iter().map(|q| q.to_string()).collect(), respondents)
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn respondents(&self) -> &[Respondent] {
        &self.respondents
    }

    pub fn respondent_count(&self) -> usize {
        self.respondents.len()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Number of cells (`rows × columns`).
    pub fn cell_count(&self) -> usize {
        self.respondent_count() * self.question_count()
    }

    /// Fails with [`SurveyError::EmptyDataset`] when there is nothing to aggregate.
    pub fn ensure_non_empty(&self) -> SurveyResult<()> {
        if self.respondents.is_empty() || self.questions.is_empty() {
            Err(SurveyError::EmptyDataset)
        } else {
            Ok(())
        }
    }

    /// Answers of one question column, in respondent order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.respondents
            .iter()
            .map(move |r| r.answers[index].as_str())
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &str> + '_ {
        self.respondents
            .iter()
            .flat_map(|r| r.answers.iter().map(String::as_str))
    }
}

/// Count of one scale symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCount {
    pub symbol: String,
    pub count: usize,
}

/// Symbol frequencies in scale order, with unknown cells counted separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// One entry per scale symbol, in canonical order; unobserved symbols are zero.
    pub counts: Vec<SymbolCount>,
    /// Cells whose value is outside the scale.
    pub unknown: usize,
}

impl Distribution {
    /// Total of the known symbol counts.
    pub fn known_total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn count(&self, symbol: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.symbol == symbol)
            .map(|c| c.count)
    }

    /// Share of a symbol among known answers.
    pub fn percentage(&self, symbol: &str) -> f64 {
        pct(self.count(symbol).unwrap_or(0), self.known_total())
    }
}

/// Answer distribution of a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDistribution {
    pub question: String,
    pub distribution: Distribution,
}

/// Mean score of a single question.
///
/// A question without any scorable answer carries
/// [`SurveyError::NoScorableData`] instead of a number.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionMean {
    pub question: String,
    pub mean: SurveyResult<f64>,
    /// Number of answers that contributed to the mean.
    pub scored: usize,
}

impl Serialize for QuestionMean {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("QuestionMean", 4)?;
        state.serialize_field("question", &self.question)?;
        state.serialize_field("mean", &self.mean.as_ref().ok())?;
        state.serialize_field("scored", &self.scored)?;
        state.serialize_field("error", &self.mean.as_ref().err().map(|e| e.to_string()))?;
        state.end()
    }
}

/// Answers classified by sentiment bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// Cells that belong to no bucket; excluded from percentages.
    pub unknown: usize,
}

impl SentimentCounts {
    pub fn count(&self, bucket: Sentiment) -> usize {
        match bucket {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    /// Cells that fell into one of the three buckets.
    pub fn classified_total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn percentage(&self, bucket: Sentiment) -> f64 {
        pct(self.count(bucket), self.classified_total())
    }
}

/// A symbol with its count and share of known answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extreme {
    pub symbol: String,
    pub count: usize,
    pub percentage: f64,
}

/// Most and least frequent answers overall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    pub most: Extreme,
    pub least: Extreme,
}

/// How often a question received a given symbol, as a share of respondents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionHit {
    pub question: String,
    pub symbol: String,
    pub count: usize,
    pub percentage: f64,
}

/// A question with its mean score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub question: String,
    pub mean: f64,
}

/// Per-respondent scores for heatmap rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub respondent: String,
    /// One score per question; `None` where the answer is outside the scale.
    pub scores: Vec<Option<u32>>,
}

/// Respondent × question score grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreMatrix {
    pub questions: Vec<String>,
    pub rows: Vec<ScoreRow>,
}

/// Headline numbers for the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub respondents: usize,
    pub questions: usize,
    pub cells: usize,
    pub unknown_cells: usize,
}

/// Metadata about the dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the survey file.
    pub source: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Number of respondents in the table.
    pub respondents: usize,
    /// Number of question columns.
    pub questions: usize,
    /// Number of views requested.
    pub views_requested: usize,
    /// Number of views that could not be produced.
    pub views_failed: usize,
}

/// The complete dashboard report.
#[derive(Debug, Clone)]
pub struct Report {
    /// Dashboard title.
    pub title: String,
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Question id to question text.
    pub labels: HashMap<String, String>,
    /// Every requested view, successful or not.
    pub outcomes: Vec<ViewOutcome>,
}

impl Report {
    /// Text for a question id, falling back to the id itself.
    pub fn label<'a>(&'a self, question: &'a str) -> &'a str {
        self.labels
            .get(question)
            .map(String::as_str)
            .unwrap_or(question)
    }
}
