//! Named view requests and their dispatch to the aggregator.

use super::aggregator;
use crate::error::SurveyResult;
use crate::models::{
    DatasetSummary, Distribution, Extreme, Extremes, QuestionDistribution, QuestionHit,
    QuestionMean, QuestionScore, ResponseTable, ScoreMatrix, SentimentCounts,
};
use crate::scale::{Scale, SentimentBuckets};
use serde::Serialize;
use tracing::{debug, warn};

/// One dashboard view to compute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "symbol", rename_all = "snake_case")]
pub enum ViewRequest {
    Summary,
    Overall,
    PerQuestion,
    QuestionMeans,
    GlobalMean,
    Sentiment,
    Extremes,
    /// Most frequent answer alone.
    MostFrequent,
    /// Least frequent answer alone.
    LeastFrequent,
    /// Question that received the given symbol most often.
    MostSymbol(String),
    /// Share of respondents choosing the given symbol, per question.
    SymbolShare(String),
    HighestMean,
    LowestMean,
    ScoreMatrix,
}

impl ViewRequest {
    /// Human-readable title used in reports and error messages.
    pub fn title(&self) -> String {
        match self {
            ViewRequest::Summary => "Dataset Summary".to_string(),
            ViewRequest::Overall => "Overall Answer Distribution".to_string(),
            ViewRequest::PerQuestion => "Answer Distribution per Question".to_string(),
            ViewRequest::QuestionMeans => "Mean Score per Question".to_string(),
            ViewRequest::GlobalMean => "Overall Mean Score".to_string(),
            ViewRequest::Sentiment => "Answer Sentiment".to_string(),
            ViewRequest::Extremes => "Most and Least Frequent Answers".to_string(),
            ViewRequest::MostFrequent => "Most Frequent Answer".to_string(),
            ViewRequest::LeastFrequent => "Least Frequent Answer".to_string(),
            ViewRequest::MostSymbol(symbol) => format!("Question with Most '{}' Answers", symbol),
            ViewRequest::SymbolShare(symbol) => format!("Share of '{}' Answers per Question", symbol),
            ViewRequest::HighestMean => "Highest Scoring Question".to_string(),
            ViewRequest::LowestMean => "Lowest Scoring Question".to_string(),
            ViewRequest::ScoreMatrix => "Score Heatmap".to_string(),
        }
    }

    /// Computes this view from the table.
    pub fn evaluate(
        &self,
        table: &ResponseTable,
        scale: &Scale,
        buckets: &SentimentBuckets,
    ) -> SurveyResult<View> {
        let view = match self {
            ViewRequest::Summary => View::Summary(aggregator::dataset_summary(table, scale)?),
            ViewRequest::Overall => {
                View::Distribution(aggregator::overall_distribution(table, scale)?)
            }
            ViewRequest::PerQuestion => {
                View::PerQuestion(aggregator::per_question_distribution(table, scale)?)
            }
            ViewRequest::QuestionMeans => {
                View::QuestionMeans(aggregator::per_question_mean(table, scale)?)
            }
            ViewRequest::GlobalMean => View::GlobalMean(aggregator::global_mean(table, scale)?),
            ViewRequest::Sentiment => View::Sentiment(aggregator::sentiment_counts(table, buckets)?),
            ViewRequest::Extremes => {
                let distribution = aggregator::overall_distribution(table, scale)?;
                View::Extremes(aggregator::extremes(&distribution)?)
            }
            ViewRequest::MostFrequent => {
                let distribution = aggregator::overall_distribution(table, scale)?;
                View::Extreme(aggregator::extremes(&distribution)?.most)
            }
            ViewRequest::LeastFrequent => {
                let distribution = aggregator::overall_distribution(table, scale)?;
                View::Extreme(aggregator::extremes(&distribution)?.least)
            }
            ViewRequest::MostSymbol(symbol) => {
                View::QuestionHit(aggregator::question_with_most_symbol(table, scale, symbol)?)
            }
            ViewRequest::SymbolShare(symbol) => {
                View::SymbolShare(aggregator::symbol_share_by_question(table, scale, symbol)?)
            }
            ViewRequest::HighestMean => {
                View::QuestionScore(aggregator::highest_mean_question(table, scale)?)
            }
            ViewRequest::LowestMean => {
                View::QuestionScore(aggregator::lowest_mean_question(table, scale)?)
            }
            ViewRequest::ScoreMatrix => View::ScoreMatrix(aggregator::score_matrix(table, scale)?),
        };

        Ok(view)
    }

    /// Every view of the full dashboard.
    ///
    /// Includes the top question for each symbol except the lowest one, and
    /// the per-question share of the lowest symbol.
    pub fn dashboard_set(scale: &Scale) -> Vec<ViewRequest> {
        let mut requests = vec![
            ViewRequest::Summary,
            ViewRequest::Overall,
            ViewRequest::PerQuestion,
            ViewRequest::QuestionMeans,
            ViewRequest::GlobalMean,
            ViewRequest::HighestMean,
            ViewRequest::LowestMean,
            ViewRequest::Sentiment,
            ViewRequest::Extremes,
        ];

        let lowest = scale.last_symbol();
        requests.extend(
            scale
                .symbols()
                .filter(|s| *s != lowest)
                .map(|s| ViewRequest::MostSymbol(s.to_string())),
        );
        requests.push(ViewRequest::SymbolShare(lowest.to_string()));
        requests.push(ViewRequest::ScoreMatrix);

        requests
    }
}

/// A computed view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum View {
    Summary(DatasetSummary),
    Distribution(Distribution),
    PerQuestion(Vec<QuestionDistribution>),
    QuestionMeans(Vec<QuestionMean>),
    GlobalMean(f64),
    Sentiment(SentimentCounts),
    Extremes(Extremes),
    Extreme(Extreme),
    QuestionHit(QuestionHit),
    SymbolShare(Vec<QuestionHit>),
    QuestionScore(QuestionScore),
    ScoreMatrix(ScoreMatrix),
}

/// A request together with its result.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOutcome {
    pub request: ViewRequest,
    pub result: SurveyResult<View>,
}

impl ViewOutcome {
    pub fn is_failed(&self) -> bool {
        self.result.is_err()
    }
}

/// Evaluates every request independently; a failed view does not stop the others.
pub fn evaluate_all(
    requests: &[ViewRequest],
    table: &ResponseTable,
    scale: &Scale,
    buckets: &SentimentBuckets,
) -> Vec<ViewOutcome> {
    requests
        .iter()
        .map(|request| {
            let result = request.evaluate(table, scale, buckets);
            match &result {
                Ok(_) => debug!("Computed view: {}", request.title()),
                Err(e) => warn!("Could not compute {}: {}", request.title(), e),
            }
            ViewOutcome {
                request: request.clone(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurveyError;

    fn sample_table() -> ResponseTable {
        ResponseTable::from_rows(
            &["Q1", "Q2"],
            &[vec!["SS", "CS"], vec!["S", "CTS"], vec!["SS", "S"]],
        )
        .unwrap()
    }

    #[test]
    fn test_dashboard_set_covers_scale() {
        let requests = ViewRequest::dashboard_set(&Scale::likert6());

        let most: Vec<_> = requests
            .iter()
            .filter_map(|r| match r {
                ViewRequest::MostSymbol(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(most, vec!["SS", "S", "CS", "CTS", "TS"]);
        assert!(requests.contains(&ViewRequest::SymbolShare("STS".to_string())));
        assert!(requests.contains(&ViewRequest::GlobalMean));
    }

    #[test]
    fn test_evaluate_dispatches_to_named_view() {
        let table = sample_table();
        let scale = Scale::likert6();
        let buckets = SentimentBuckets::likert6();

        let view = ViewRequest::Sentiment
            .evaluate(&table, &scale, &buckets)
            .unwrap();
        match view {
            View::Sentiment(counts) => assert_eq!(counts.positive, 4),
            other => panic!("unexpected view: {:?}", other),
        }

        let view = ViewRequest::MostSymbol("SS".to_string())
            .evaluate(&table, &scale, &buckets)
            .unwrap();
        assert!(matches!(view, View::QuestionHit(hit) if hit.question == "Q1"));
    }

    #[test]
    fn test_failed_view_does_not_hide_others() {
        let table = ResponseTable::from_rows(&["P1"], &[vec!["??"], vec!["SS"]]).unwrap();
        let requests = vec![
            ViewRequest::MostSymbol("XX".to_string()),
            ViewRequest::Overall,
            ViewRequest::GlobalMean,
        ];

        let outcomes = evaluate_all(
            &requests,
            &table,
            &Scale::likert6(),
            &SentimentBuckets::likert6(),
        );

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(
            outcomes[0].result,
            Err(SurveyError::UnknownSymbol { .. })
        ));
        assert!(!outcomes[1].is_failed());
        assert_eq!(outcomes[2].result, Ok(View::GlobalMean(6.0)));
    }

    #[test]
    fn test_single_extreme_requests() {
        let table = sample_table();
        let scale = Scale::likert6();
        let buckets = SentimentBuckets::likert6();

        let most = ViewRequest::MostFrequent
            .evaluate(&table, &scale, &buckets)
            .unwrap();
        assert!(matches!(most, View::Extreme(e) if e.symbol == "SS" && e.count == 2));

        let least = ViewRequest::LeastFrequent
            .evaluate(&table, &scale, &buckets)
            .unwrap();
        assert!(matches!(least, View::Extreme(e) if e.symbol == "CS" && e.count == 1));
    }

    #[test]
    fn test_title_names_symbol() {
        assert!(ViewRequest::SymbolShare("STS".to_string())
            .title()
            .contains("STS"));
    }
}
