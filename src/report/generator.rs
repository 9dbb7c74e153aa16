//! Dashboard report generation.
//!
//! This module renders the computed views as a Markdown dashboard, a JSON
//! document, or a single compact line.

use crate::analysis::{View, ViewOutcome, ViewRequest};
use crate::config::ReportConfig;
use crate::models::{
    DatasetSummary, Distribution, Extreme, Extremes, QuestionDistribution, QuestionHit,
    QuestionMean, QuestionScore, Report, ReportMetadata, ScoreMatrix, SentimentCounts,
};
use crate::scale::Sentiment;
use anyhow::Result;
use serde_json::json;

/// Rendering options for the Markdown dashboard.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Width of the longest text bar.
    pub bar_width: usize,
    /// Render the score heatmap.
    pub include_heatmap: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for RenderOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            bar_width: config.bar_width,
            include_heatmap: config.include_heatmap,
        }
    }
}

/// Generate a complete Markdown dashboard.
pub fn generate_markdown_report(report: &Report, options: &RenderOptions) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", report.title));

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // One section per view
    for outcome in &report.outcomes {
        if !options.include_heatmap && outcome.request == ViewRequest::ScoreMatrix {
            continue;
        }
        output.push_str(&generate_view_section(report, outcome, options));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Respondents:** {}\n", metadata.respondents));
    section.push_str(&format!("- **Questions:** {}\n", metadata.questions));
    if metadata.views_failed > 0 {
        section.push_str(&format!(
            "- **Views Failed:** {} of {}\n",
            metadata.views_failed, metadata.views_requested
        ));
    }
    section.push('\n');

    section
}

/// Generate the section of one view, or a notice when it failed.
fn generate_view_section(report: &Report, outcome: &ViewOutcome, options: &RenderOptions) -> String {
    let mut section = format!("## {}\n\n", outcome.request.title());

    let view = match &outcome.result {
        Ok(view) => view,
        Err(e) => {
            section.push_str(&format!(
                "> ⚠️ **Could not compute {}:** {}\n\n",
                outcome.request.title(),
                e
            ));
            return section;
        }
    };

    let body = match view {
        View::Summary(summary) => render_summary(summary),
        View::Distribution(dist) => render_distribution(dist, options.bar_width),
        View::PerQuestion(rows) => render_per_question(report, rows),
        View::QuestionMeans(means) => render_means(report, means, options.bar_width),
        View::GlobalMean(mean) => format!("**Mean score across all answers:** {:.2}\n\n", mean),
        View::Sentiment(counts) => render_sentiment(counts, options.bar_width),
        View::Extremes(extremes) => render_extremes(extremes),
        View::Extreme(extreme) => render_extreme(extreme),
        View::QuestionHit(hit) => render_hit(report, hit),
        View::SymbolShare(shares) => render_shares(report, shares),
        View::QuestionScore(score) => render_score(report, score),
        View::ScoreMatrix(matrix) => render_heatmap(matrix),
    };
    section.push_str(&body);

    section
}

/// Text bar scaled so that `max` fills `width` cells.
fn bar(value: usize, max: usize, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let cells = (value as f64 / max as f64 * width as f64).round() as usize;
    "█".repeat(cells)
}

fn render_summary(summary: &DatasetSummary) -> String {
    let mut body = String::new();

    body.push_str("| Respondents | Questions | Answers | Unknown Answers |\n");
    body.push_str("|:---:|:---:|:---:|:---:|\n");
    body.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        summary.respondents, summary.questions, summary.cells, summary.unknown_cells
    ));

    body
}

fn render_distribution(dist: &Distribution, bar_width: usize) -> String {
    let mut body = String::new();
    let max = dist.counts.iter().map(|c| c.count).max().unwrap_or(0);

    body.push_str("| Answer | Count | Share | |\n");
    body.push_str("|:---|:---:|:---:|:---|\n");
    for entry in &dist.counts {
        body.push_str(&format!(
            "| {} | {} | {:.1}% | {} |\n",
            entry.symbol,
            entry.count,
            dist.percentage(&entry.symbol),
            bar(entry.count, max, bar_width)
        ));
    }
    body.push('\n');

    if dist.unknown > 0 {
        body.push_str(&format!(
            "*{} answers outside the scale were left out.*\n\n",
            dist.unknown
        ));
    }

    body
}

fn render_per_question(report: &Report, rows: &[QuestionDistribution]) -> String {
    let mut body = String::new();
    let Some(first) = rows.first() else {
        return body;
    };

    let symbols: Vec<&str> = first
        .distribution
        .counts
        .iter()
        .map(|c| c.symbol.as_str())
        .collect();

    body.push_str("| Question |");
    for symbol in &symbols {
        body.push_str(&format!(" {} |", symbol));
    }
    body.push_str(" Unknown |\n|:---|");
    body.push_str(&":---:|".repeat(symbols.len() + 1));
    body.push('\n');

    for row in rows {
        body.push_str(&format!("| {} |", question_cell(report, &row.question)));
        for entry in &row.distribution.counts {
            body.push_str(&format!(" {} |", entry.count));
        }
        body.push_str(&format!(" {} |\n", row.distribution.unknown));
    }
    body.push('\n');

    body
}

fn render_means(report: &Report, means: &[QuestionMean], bar_width: usize) -> String {
    let mut body = String::new();
    let max = means
        .iter()
        .filter_map(|m| m.mean.as_ref().ok().copied())
        .fold(0.0_f64, f64::max);

    body.push_str("| Question | Mean | Answers Scored | |\n");
    body.push_str("|:---|:---:|:---:|:---|\n");
    for mean in means {
        let question = question_cell(report, &mean.question);
        match &mean.mean {
            Ok(value) => {
                let cells = if max > 0.0 {
                    (value / max * bar_width as f64).round() as usize
                } else {
                    0
                };
                body.push_str(&format!(
                    "| {} | {:.2} | {} | {} |\n",
                    question,
                    value,
                    mean.scored,
                    "█".repeat(cells)
                ));
            }
            Err(e) => {
                body.push_str(&format!("| {} | n/a | 0 | ⚠️ {} |\n", question, e));
            }
        }
    }
    body.push('\n');

    body
}

fn render_sentiment(counts: &SentimentCounts, bar_width: usize) -> String {
    let mut body = String::new();
    let max = Sentiment::ALL
        .iter()
        .map(|s| counts.count(*s))
        .max()
        .unwrap_or(0);

    body.push_str("| Sentiment | Count | Share | |\n");
    body.push_str("|:---|:---:|:---:|:---|\n");
    for sentiment in Sentiment::ALL {
        body.push_str(&format!(
            "| {} {} | {} | {:.1}% | {} |\n",
            sentiment.emoji(),
            sentiment,
            counts.count(sentiment),
            counts.percentage(sentiment),
            bar(counts.count(sentiment), max, bar_width)
        ));
    }
    body.push('\n');

    if counts.unknown > 0 {
        body.push_str(&format!(
            "*{} answers outside the scale were left out.*\n\n",
            counts.unknown
        ));
    }

    body
}

fn render_extremes(extremes: &Extremes) -> String {
    let mut body = String::new();

    body.push_str("| | Answer | Count | Share |\n");
    body.push_str("|:---|:---:|:---:|:---:|\n");
    body.push_str(&format!(
        "| Most frequent | {} | {} | {:.1}% |\n",
        extremes.most.symbol, extremes.most.count, extremes.most.percentage
    ));
    body.push_str(&format!(
        "| Least frequent | {} | {} | {:.1}% |\n\n",
        extremes.least.symbol, extremes.least.count, extremes.least.percentage
    ));

    body
}

fn render_extreme(extreme: &Extreme) -> String {
    format!(
        "**{}** was chosen {} times ({:.1}% of known answers).\n\n",
        extreme.symbol, extreme.count, extreme.percentage
    )
}

fn render_hit(report: &Report, hit: &QuestionHit) -> String {
    format!(
        "**{}** received '{}' from {} respondents ({:.1}%).\n\n",
        question_cell(report, &hit.question),
        hit.symbol,
        hit.count,
        hit.percentage
    )
}

fn render_shares(report: &Report, shares: &[QuestionHit]) -> String {
    let mut body = String::new();

    let Some(first) = shares.first() else {
        body.push_str("No question received this answer.\n\n");
        return body;
    };

    body.push_str(&format!("| Question | '{}' Answers | Share of Respondents |\n", first.symbol));
    body.push_str("|:---|:---:|:---:|\n");
    for share in shares {
        body.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            question_cell(report, &share.question),
            share.count,
            share.percentage
        ));
    }
    body.push('\n');

    body
}

fn render_score(report: &Report, score: &QuestionScore) -> String {
    format!(
        "**{}** with a mean score of {:.2}.\n\n",
        question_cell(report, &score.question),
        score.mean
    )
}

fn render_heatmap(matrix: &ScoreMatrix) -> String {
    let mut body = String::new();

    body.push_str("| Respondent |");
    for question in &matrix.questions {
        body.push_str(&format!(" {} |", question));
    }
    body.push_str("\n|:---|");
    body.push_str(&":---:|".repeat(matrix.questions.len()));
    body.push('\n');

    for row in &matrix.rows {
        body.push_str(&format!("| {} |", row.respondent));
        for score in &row.scores {
            match score {
                Some(score) => body.push_str(&format!(" {} |", score)),
                None => body.push_str(" – |"),
            }
        }
        body.push('\n');
    }
    body.push('\n');

    body
}

/// Question id, followed by its text when a label is known.
///
/// Pipes are escaped so the text can sit inside a Markdown table cell.
fn question_cell(report: &Report, question: &str) -> String {
    let label = report.label(question);
    let cell = if label == question {
        question.to_string()
    } else {
        format!("{}: {}", question, label)
    };
    cell.replace('|', "\\|")
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by Likertboard*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    let views: Vec<serde_json::Value> = report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(view) => json!({
                "request": outcome.request,
                "title": outcome.request.title(),
                "result": view,
            }),
            Err(e) => json!({
                "request": outcome.request,
                "title": outcome.request.title(),
                "error": { "kind": e.kind(), "message": e.to_string() },
            }),
        })
        .collect();

    let document = json!({
        "title": report.title,
        "metadata": report.metadata,
        "labels": report.labels,
        "views": views,
    });

    serde_json::to_string_pretty(&document).map_err(Into::into)
}

/// Render one outcome as a single pipe-delimited line.
pub fn generate_line(outcome: &ViewOutcome) -> String {
    let view = match &outcome.result {
        Ok(view) => view,
        Err(e) => return format!("error: {}", e),
    };

    match view {
        View::Summary(s) => format!(
            "respondents={}|questions={}|answers={}|unknown={}",
            s.respondents, s.questions, s.cells, s.unknown_cells
        ),
        View::Distribution(dist) => dist
            .counts
            .iter()
            .map(|c| format!("{}={}", c.symbol, c.count))
            .collect::<Vec<_>>()
            .join("|"),
        View::PerQuestion(rows) => rows
            .iter()
            .map(|row| {
                let counts = row
                    .distribution
                    .counts
                    .iter()
                    .map(|c| format!("{}:{}", c.symbol, c.count))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}={}", row.question, counts)
            })
            .collect::<Vec<_>>()
            .join("|"),
        View::QuestionMeans(means) => means
            .iter()
            .map(|m| match &m.mean {
                Ok(value) => format!("{}:{:.2}", m.question, value),
                Err(_) => format!("{}:n/a", m.question),
            })
            .collect::<Vec<_>>()
            .join("|"),
        View::GlobalMean(mean) => format!("{:.2}", mean),
        View::Sentiment(counts) => Sentiment::ALL
            .iter()
            .map(|s| {
                format!(
                    "{}={}:{:.1}",
                    s.key(),
                    counts.count(*s),
                    counts.percentage(*s)
                )
            })
            .collect::<Vec<_>>()
            .join("|"),
        // One `symbol|count|pct` line per extreme, most frequent first.
        View::Extremes(e) => format!("{}\n{}", extreme_line(&e.most), extreme_line(&e.least)),
        View::Extreme(e) => extreme_line(e),
        View::QuestionHit(hit) => format!("{}|{}|{:.1}", hit.question, hit.count, hit.percentage),
        View::SymbolShare(shares) => shares
            .iter()
            .map(|s| format!("{}:{:.1}", s.question, s.percentage))
            .collect::<Vec<_>>()
            .join("|"),
        View::QuestionScore(score) => format!("{}:{:.2}", score.question, score.mean),
        View::ScoreMatrix(matrix) => matrix
            .rows
            .iter()
            .map(|row| {
                let scores = row
                    .scores
                    .iter()
                    .map(|s| s.map_or_else(|| "-".to_string(), |s| s.to_string()))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}={}", row.respondent, scores)
            })
            .collect::<Vec<_>>()
            .join("|"),
    }
}

fn extreme_line(extreme: &Extreme) -> String {
    format!(
        "{}|{}|{:.1}",
        extreme.symbol, extreme.count, extreme.percentage
    )
}
