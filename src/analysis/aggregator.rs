//! Survey aggregation and statistics.
//!
//! Every function here is a pure scan of an immutable [`ResponseTable`].
//! Answers outside the configured scale are never fatal: they are counted as
//! unknown and left out of counts, means and percentages.

use crate::error::{SurveyError, SurveyResult};
use crate::models::{
    pct, DatasetSummary, Distribution, Extreme, Extremes, QuestionDistribution, QuestionHit,
    QuestionMean, QuestionScore, ResponseTable, ScoreMatrix, ScoreRow, SentimentCounts,
    SymbolCount,
};
use crate::scale::{Scale, Sentiment, SentimentBuckets};
use tracing::debug;

/// Counts answers against the scale, keeping scale order.
fn count_symbols<'a>(cells: impl Iterator<Item = &'a str>, scale: &Scale) -> Distribution {
    let mut counts = vec![0usize; scale.len()];
    let mut unknown = 0;

    for cell in cells {
        match scale.position(cell) {
            Some(index) => counts[index] += 1,
            None => unknown += 1,
        }
    }

    Distribution {
        counts: scale
            .symbols()
            .zip(counts)
            .map(|(symbol, count)| SymbolCount {
                symbol: symbol.to_string(),
                count,
            })
            .collect(),
        unknown,
    }
}

/// Sum and count of the scores of the scorable answers.
fn score_totals<'a>(cells: impl Iterator<Item = &'a str>, scale: &Scale) -> (u64, usize) {
    cells
        .filter_map(|cell| scale.score(cell))
        .fold((0u64, 0usize), |(sum, n), score| (sum + score as u64, n + 1))
}

/// Frequency of every scale symbol across all questions and respondents.
pub fn overall_distribution(table: &ResponseTable, scale: &Scale) -> SurveyResult<Distribution> {
    table.ensure_non_empty()?;

    let distribution = count_symbols(table.cells(), scale);
    if distribution.unknown > 0 {
        debug!(
            unknown = distribution.unknown,
            "Dropped answers outside the scale from the overall distribution"
        );
    }

    Ok(distribution)
}

/// Frequency of every scale symbol for each question, in column order.
pub fn per_question_distribution(
    table: &ResponseTable,
    scale: &Scale,
) -> SurveyResult<Vec<QuestionDistribution>> {
    table.ensure_non_empty()?;

    Ok(table
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| QuestionDistribution {
            question: question.clone(),
            distribution: count_symbols(table.column(index), scale),
        })
        .collect())
}

/// Mean score of each question.
///
/// A question with no scorable answer gets [`SurveyError::NoScorableData`]
/// without affecting the other questions.
pub fn per_question_mean(table: &ResponseTable, scale: &Scale) -> SurveyResult<Vec<QuestionMean>> {
    table.ensure_non_empty()?;

    Ok(table
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let (sum, scored) = score_totals(table.column(index), scale);
            let mean = if scored == 0 {
                debug!(question = %question, "Question has no scorable answers");
                Err(SurveyError::no_scorable(format!("mean score of {}", question)))
            } else {
                Ok(sum as f64 / scored as f64)
            };

            QuestionMean {
                question: question.clone(),
                mean,
                scored,
            }
        })
        .collect())
}

/// Mean score over every scorable cell of the flattened table.
///
/// This is not the mean of [`per_question_mean`]: questions with more
/// unknown answers weigh less here.
pub fn global_mean(table: &ResponseTable, scale: &Scale) -> SurveyResult<f64> {
    table.ensure_non_empty()?;

    let (sum, scored) = score_totals(table.cells(), scale);
    if scored == 0 {
        return Err(SurveyError::no_scorable("global mean score"));
    }

    Ok(sum as f64 / scored as f64)
}

/// Number of answers in each sentiment bucket.
pub fn sentiment_counts(
    table: &ResponseTable,
    buckets: &SentimentBuckets,
) -> SurveyResult<SentimentCounts> {
    table.ensure_non_empty()?;

    let mut counts = SentimentCounts::default();
    for cell in table.cells() {
        match buckets.bucket_of(cell) {
            Some(Sentiment::Positive) => counts.positive += 1,
            Some(Sentiment::Neutral) => counts.neutral += 1,
            Some(Sentiment::Negative) => counts.negative += 1,
            None => counts.unknown += 1,
        }
    }

    if counts.classified_total() == 0 {
        return Err(SurveyError::no_scorable("sentiment counts"));
    }

    Ok(counts)
}

/// Most and least frequent symbols among those observed at least once.
///
/// Ties go to the symbol that comes first in scale order.
pub fn extremes(distribution: &Distribution) -> SurveyResult<Extremes> {
    let total = distribution.known_total();
    let mut observed = distribution.counts.iter().filter(|c| c.count > 0);

    let first = observed
        .next()
        .ok_or_else(|| SurveyError::no_scorable("answer extremes"))?;

    let (most, least) = observed.fold((first, first), |(most, least), entry| {
        (
            if entry.count > most.count { entry } else { most },
            if entry.count < least.count { entry } else { least },
        )
    });

    let to_extreme = |entry: &SymbolCount| Extreme {
        symbol: entry.symbol.clone(),
        count: entry.count,
        percentage: pct(entry.count, total),
    };

    Ok(Extremes {
        most: to_extreme(most),
        least: to_extreme(least),
    })
}

/// Per-question count of one symbol. Fails for symbols outside the scale.
fn symbol_counts_by_question(
    table: &ResponseTable,
    scale: &Scale,
    symbol: &str,
) -> SurveyResult<Vec<usize>> {
    table.ensure_non_empty()?;

    if !scale.contains(symbol) {
        return Err(SurveyError::UnknownSymbol {
            symbol: symbol.to_string(),
        });
    }

    Ok((0..table.question_count())
        .map(|index| table.column(index).filter(|cell| *cell == symbol).count())
        .collect())
}

/// Question that received `symbol` most often, as a share of respondents.
///
/// Ties go to the question that comes first in column order.
pub fn question_with_most_symbol(
    table: &ResponseTable,
    scale: &Scale,
    symbol: &str,
) -> SurveyResult<QuestionHit> {
    let counts = symbol_counts_by_question(table, scale, symbol)?;

    let (index, count) = counts
        .iter()
        .copied()
        .enumerate()
        .fold((0, counts[0]), |best, (index, count)| {
            if count > best.1 {
                (index, count)
            } else {
                best
            }
        });

    Ok(QuestionHit {
        question: table.questions()[index].clone(),
        symbol: symbol.to_string(),
        count,
        percentage: pct(count, table.respondent_count()),
    })
}

/// Share of respondents choosing `symbol`, for each question where it occurs.
pub fn symbol_share_by_question(
    table: &ResponseTable,
    scale: &Scale,
    symbol: &str,
) -> SurveyResult<Vec<QuestionHit>> {
    let counts = symbol_counts_by_question(table, scale, symbol)?;
    let respondents = table.respondent_count();

    Ok(table
        .questions()
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(question, count)| QuestionHit {
            question: question.clone(),
            symbol: symbol.to_string(),
            count,
            percentage: pct(count, respondents),
        })
        .collect())
}

/// Picks one question by mean score, skipping questions without a mean.
/// `replaces(candidate, current)` decides whether a later question wins.
fn pick_by_mean(
    table: &ResponseTable,
    scale: &Scale,
    view: &str,
    replaces: impl Fn(f64, f64) -> bool,
) -> SurveyResult<QuestionScore> {
    let means = per_question_mean(table, scale)?;

    means
        .into_iter()
        .filter_map(|m| m.mean.ok().map(|mean| QuestionScore { question: m.question, mean }))
        .reduce(|best, candidate| {
            if replaces(candidate.mean, best.mean) {
                candidate
            } else {
                best
            }
        })
        .ok_or_else(|| SurveyError::no_scorable(view))
}

/// Question with the highest mean score. Ties go to the first question.
pub fn highest_mean_question(table: &ResponseTable, scale: &Scale) -> SurveyResult<QuestionScore> {
    pick_by_mean(table, scale, "highest mean question", |candidate, best| {
        candidate > best
    })
}

/// Question with the lowest mean score. Ties go to the first question.
pub fn lowest_mean_question(table: &ResponseTable, scale: &Scale) -> SurveyResult<QuestionScore> {
    pick_by_mean(table, scale, "lowest mean question", |candidate, best| {
        candidate < best
    })
}

/// Score of every cell, for heatmaps.
pub fn score_matrix(table: &ResponseTable, scale: &Scale) -> SurveyResult<ScoreMatrix> {
    table.ensure_non_empty()?;

    Ok(ScoreMatrix {
        questions: table.questions().to_vec(),
        rows: table
            .respondents()
            .iter()
            .map(|r| ScoreRow {
                respondent: r.id.clone(),
                scores: r.answers.iter().map(|a| scale.score(a)).collect(),
            })
            .collect(),
    })
}

/// Respondent, question and unknown-cell counts.
pub fn dataset_summary(table: &ResponseTable, scale: &Scale) -> SurveyResult<DatasetSummary> {
    table.ensure_non_empty()?;

    Ok(DatasetSummary {
        respondents: table.respondent_count(),
        questions: table.question_count(),
        cells: table.cell_count(),
        unknown_cells: table.cells().filter(|c| !scale.contains(c)).count(),
    })
}
