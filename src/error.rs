//! Error taxonomy for survey aggregation.
//!
//! Symbol-level anomalies are counted rather than raised; these errors are
//! returned only when a specific view cannot be produced.

/// Errors produced by the survey aggregator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurveyError {
    /// The input is not a well-formed response table.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A requested symbol is not part of the configured scale.
    #[error("Unknown symbol '{symbol}' is not part of the configured scale")]
    UnknownSymbol { symbol: String },

    /// The table has no respondents or no question columns.
    #[error("Empty dataset: the table has no respondents or no question columns")]
    EmptyDataset,

    /// Every input to a computation was outside the scale.
    #[error("No scorable data for {view}: every answer is outside the configured scale")]
    NoScorableData { view: String },

    /// The scale or sentiment configuration breaks an invariant.
    #[error("Invalid scale configuration: {0}")]
    InvalidScale(String),
}

impl SurveyError {
    pub(crate) fn no_scorable(view: impl Into<String>) -> Self {
        Self::NoScorableData { view: view.into() }
    }

    /// Short machine-friendly name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "malformed_input",
            Self::UnknownSymbol { .. } => "unknown_symbol",
            Self::EmptyDataset => "empty_dataset",
            Self::NoScorableData { .. } => "no_scorable_data",
            Self::InvalidScale(_) => "invalid_scale",
        }
    }
}

pub type SurveyResult<T> = std::result::Result<T, SurveyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_scorable_message_names_view() {
        let err = SurveyError::no_scorable("mean score of P3");
        assert!(err.to_string().contains("mean score of P3"));
        assert_eq!(err.kind(), "no_scorable_data");
    }

    #[test]
    fn test_unknown_symbol_message() {
        let err = SurveyError::UnknownSymbol {
            symbol: "XX".to_string(),
        };
        assert!(err.to_string().contains("'XX'"));
    }
}
