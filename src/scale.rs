//! Answer scale and sentiment bucket definitions.
//!
//! A [`Scale`] maps each ordinal answer symbol to an integer score and fixes
//! the canonical order (highest agreement first) used by every view. A
//! [`SentimentBuckets`] partitions the same symbols into three groups.

use crate::error::{SurveyError, SurveyResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One answer symbol and its numeric score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalePoint {
    /// Answer token as it appears in the survey data (e.g. "SS").
    pub symbol: String,
    /// Integer score used for means.
    pub score: u32,
}

impl ScalePoint {
    pub fn new(symbol: impl Into<String>, score: u32) -> Self {
        Self {
            symbol: symbol.into(),
            score,
        }
    }
}

/// Ordered answer scale, highest agreement first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scale {
    points: Vec<ScalePoint>,
}

impl Scale {
    /// Builds a scale, checking that symbols and scores are unique.
    pub fn new(points: Vec<ScalePoint>) -> SurveyResult<Self> {
        if points.is_empty() {
            return Err(SurveyError::InvalidScale(
                "scale must define at least one symbol".to_string(),
            ));
        }

        let mut symbols = HashSet::new();
        let mut scores = HashSet::new();

        for point in &points {
            if point.symbol.trim().is_empty() {
                return Err(SurveyError::InvalidScale(
                    "scale symbols must not be blank".to_string(),
                ));
            }
            if !symbols.insert(point.symbol.as_str()) {
                return Err(SurveyError::InvalidScale(format!(
                    "symbol '{}' appears more than once",
                    point.symbol
                )));
            }
            if !scores.insert(point.score) {
                return Err(SurveyError::InvalidScale(format!(
                    "score {} is assigned to more than one symbol",
                    point.score
                )));
            }
        }

        Ok(Self { points })
    }

    /// The six-point agreement scale: SS, S, CS, CTS, TS, STS scored 6 to 1.
    pub fn likert6() -> Self {
        Self {
            points: default_points(),
        }
    }

    /// Symbols in canonical order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Score of a symbol, or `None` when it is outside the scale.
    pub fn score(&self, symbol: &str) -> Option<u32> {
        self.points
            .iter()
            .find(|p| p.symbol == symbol)
            .map(|p| p.score)
    }

    /// Position of a symbol in canonical order.
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.points.iter().position(|p| p.symbol == symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.position(symbol).is_some()
    }

    /// Lowest-agreement symbol.
    pub fn last_symbol(&self) -> &str {
        &self.points[self.points.len() - 1].symbol
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::likert6()
    }
}

pub(crate) fn default_points() -> Vec<ScalePoint> {
    vec![
        ScalePoint::new("SS", 6),
        ScalePoint::new("S", 5),
        ScalePoint::new("CS", 4),
        ScalePoint::new("CTS", 3),
        ScalePoint::new("TS", 2),
        ScalePoint::new("STS", 1),
    ]
}

/// Coarse sentiment of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Returns an emoji representation of the sentiment.
    pub fn emoji(&self) -> &'static str {
        match self {
            Sentiment::Positive => "🟢",
            Sentiment::Neutral => "⚪",
            Sentiment::Negative => "🔴",
        }
    }

    /// Lowercase key used in compact output.
    pub fn key(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Negative => write!(f, "Negative"),
        }
    }
}

/// Partition of a scale's symbols into positive, neutral and negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentBuckets {
    positive: Vec<String>,
    neutral: Vec<String>,
    negative: Vec<String>,
}

impl SentimentBuckets {
    /// Builds the buckets, checking they partition `scale` exactly.
    pub fn new(
        positive: Vec<String>,
        neutral: Vec<String>,
        negative: Vec<String>,
        scale: &Scale,
    ) -> SurveyResult<Self> {
        let mut seen: HashSet<&str> = HashSet::new();

        for symbol in positive.iter().chain(&neutral).chain(&negative) {
            if !scale.contains(symbol) {
                return Err(SurveyError::InvalidScale(format!(
                    "sentiment symbol '{}' is not part of the scale",
                    symbol
                )));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(SurveyError::InvalidScale(format!(
                    "symbol '{}' belongs to more than one sentiment bucket",
                    symbol
                )));
            }
        }

        if let Some(missing) = scale.symbols().find(|s| !seen.contains(s)) {
            return Err(SurveyError::InvalidScale(format!(
                "symbol '{}' is not assigned to any sentiment bucket",
                missing
            )));
        }

        Ok(Self {
            positive,
            neutral,
            negative,
        })
    }

    /// Buckets for [`Scale::likert6`]: {SS, S}, {CS}, {CTS, TS, STS}.
    pub fn likert6() -> Self {
        let (positive, neutral, negative) = default_bucket_lists();
        Self {
            positive,
            neutral,
            negative,
        }
    }

    /// Bucket a symbol belongs to, or `None` for unknown symbols.
    pub fn bucket_of(&self, symbol: &str) -> Option<Sentiment> {
        Sentiment::ALL
            .into_iter()
            .find(|bucket| self.members(*bucket).iter().any(|s| s == symbol))
    }

    pub fn members(&self, bucket: Sentiment) -> &[String] {
        match bucket {
            Sentiment::Positive => &self.positive,
            Sentiment::Neutral => &self.neutral,
            Sentiment::Negative => &self.negative,
        }
    }
}

impl Default for SentimentBuckets {
    fn default() -> Self {
        Self::likert6()
    }
}

pub(crate) fn default_bucket_lists() -> (Vec<String>, Vec<String>, Vec<String>) {
    let to_vec = |symbols: &[&str]| symbols.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    (
        to_vec(&["SS", "S"]),
        to_vec(&["CS"]),
        to_vec(&["CTS", "TS", "STS"]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_likert6_scores_and_order() {
        let scale = Scale::likert6();
        assert_eq!(scale.len(), 6);
        assert_eq!(scale.score("SS"), Some(6));
        assert_eq!(scale.score("STS"), Some(1));
        assert_eq!(scale.score("XX"), None);
        assert_eq!(
            scale.symbols().collect::<Vec<_>>(),
            vec!["SS", "S", "CS", "CTS", "TS", "STS"]
        );
        assert_eq!(scale.last_symbol(), "STS");
    }

    #[test]
    fn test_scale_rejects_duplicate_symbol() {
        let result = Scale::new(vec![ScalePoint::new("A", 2), ScalePoint::new("A", 1)]);
        assert!(matches!(result, Err(SurveyError::InvalidScale(_))));
    }

    #[test]
    fn test_scale_rejects_duplicate_score() {
        let result = Scale::new(vec![ScalePoint::new("A", 1), ScalePoint::new("B", 1)]);
        assert!(matches!(result, Err(SurveyError::InvalidScale(_))));
    }

    #[test]
    fn test_scale_rejects_empty() {
        assert!(Scale::new(vec![]).is_err());
    }

    #[test]
    fn test_custom_scale_cardinality() {
        let scale = Scale::new(vec![
            ScalePoint::new("Agree", 3),
            ScalePoint::new("Neutral", 2),
            ScalePoint::new("Disagree", 1),
        ])
        .unwrap();
        assert_eq!(scale.len(), 3);
        assert_eq!(scale.position("Disagree"), Some(2));
    }

    #[test]
    fn test_default_buckets_partition_scale() {
        let scale = Scale::likert6();
        let buckets = SentimentBuckets::likert6();
        for symbol in scale.symbols() {
            assert!(buckets.bucket_of(symbol).is_some(), "{} unassigned", symbol);
        }
        assert_eq!(buckets.bucket_of("SS"), Some(Sentiment::Positive));
        assert_eq!(buckets.bucket_of("CS"), Some(Sentiment::Neutral));
        assert_eq!(buckets.bucket_of("STS"), Some(Sentiment::Negative));
        assert_eq!(buckets.bucket_of("??"), None);
    }

    #[test]
    fn test_buckets_reject_overlap() {
        let scale = Scale::likert6();
        let result = SentimentBuckets::new(
            strings(&["SS", "S"]),
            strings(&["S", "CS"]),
            strings(&["CTS", "TS", "STS"]),
            &scale,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_buckets_reject_missing_symbol() {
        let scale = Scale::likert6();
        let result = SentimentBuckets::new(
            strings(&["SS", "S"]),
            strings(&["CS"]),
            strings(&["CTS", "TS"]),
            &scale,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("STS"));
    }

    #[test]
    fn test_buckets_reject_foreign_symbol() {
        let scale = Scale::likert6();
        let result = SentimentBuckets::new(
            strings(&["SS", "S", "YES"]),
            strings(&["CS"]),
            strings(&["CTS", "TS", "STS"]),
            &scale,
        );
        assert!(result.is_err());
    }
}
