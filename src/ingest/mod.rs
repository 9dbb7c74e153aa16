//! Survey file ingestion.
//!
//! Turns CSV bytes into a [`ResponseTable`] and an optional question-label
//! map. Answer values are kept verbatim (after trimming); deciding which of
//! them are on the scale is left to the aggregator.

use crate::models::{Respondent, ResponseTable};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration for reading survey files.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Column holding the respondent id (excluded from the questions)
    pub respondent_column: String,
    /// CSV field delimiter
    pub delimiter: u8,
    /// Question id column of the label file
    pub label_id_column: String,
    /// Question text column of the label file
    pub label_text_column: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::from(&crate::config::InputConfig::default())
    }
}

impl From<&crate::config::InputConfig> for IngestConfig {
    fn from(config: &crate::config::InputConfig) -> Self {
        let delimiter = if config.delimiter.is_ascii() {
            config.delimiter as u8
        } else {
            warn!(
                "Delimiter '{}' is not ASCII, falling back to ','",
                config.delimiter
            );
            b','
        };

        Self {
            respondent_column: config.respondent_column.clone(),
            delimiter,
            label_id_column: config.label_id_column.clone(),
            label_text_column: config.label_text_column.clone(),
        }
    }
}

/// Reader for survey answer and label files.
pub struct SurveyReader {
    config: IngestConfig,
}

impl SurveyReader {
    /// Create a new survey reader.
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    fn csv_reader<R: Read>(&self, reader: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader)
    }

    /// Read a response table from any CSV source.
    ///
    /// Every header except the respondent column becomes a question. When
    /// the respondent column is absent, respondents are numbered from 1.
    pub fn read_responses<R: Read>(&self, reader: R) -> Result<ResponseTable> {
        let mut csv_reader = self.csv_reader(reader);

        let headers = csv_reader
            .headers()
            .context("Failed to read survey header row")?
            .clone();

        let id_index = headers
            .iter()
            .position(|h| h == self.config.respondent_column);
        if id_index.is_none() {
            debug!(
                "No '{}' column, numbering respondents by row",
                self.config.respondent_column
            );
        }

        let questions: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != id_index)
            .map(|(_, h)| h.to_string())
            .collect();

        let mut respondents = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            // Header is line 1.
            let record = record.with_context(|| format!("Failed to parse survey line {}", row + 2))?;

            let id = id_index
                .and_then(|i| record.get(i))
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| (row + 1).to_string());

            let answers = record
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != id_index)
                .map(|(_, value)| value.to_string())
                .collect();

            respondents.push(Respondent { id, answers });
        }

        let table = ResponseTable::new(questions, respondents)?;
        info!(
            respondents = table.respondent_count(),
            questions = table.question_count(),
            "Loaded survey responses"
        );

        Ok(table)
    }

    /// Load a response table from a CSV file.
    pub fn load_responses(&self, path: &Path) -> Result<ResponseTable> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open survey file: {}", path.display()))?;

        self.read_responses(file)
            .with_context(|| format!("Failed to load survey file: {}", path.display()))
    }

    /// Read question id → question text pairs.
    pub fn read_labels<R: Read>(&self, reader: R) -> Result<HashMap<String, String>> {
        let mut csv_reader = self.csv_reader(reader);

        let headers = csv_reader
            .headers()
            .context("Failed to read label header row")?
            .clone();

        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("Label file has no '{}' column", name))
        };
        let id_index = find(&self.config.label_id_column)?;
        let text_index = find(&self.config.label_text_column)?;

        let mut labels = HashMap::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to parse label line {}", row + 2))?;

            match (record.get(id_index), record.get(text_index)) {
                (Some(id), Some(text)) if !id.is_empty() => {
                    labels.insert(id.to_string(), text.to_string());
                }
                _ => debug!("Skipping label line {} without an id", row + 2),
            }
        }

        debug!("Loaded {} question labels", labels.len());
        Ok(labels)
    }

    /// Load question labels from a CSV file.
    pub fn load_labels(&self, path: &Path) -> Result<HashMap<String, String>> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open label file: {}", path.display()))?;

        self.read_labels(file)
            .with_context(|| format!("Failed to load label file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn reader() -> SurveyReader {
        SurveyReader::new(IngestConfig::default())
    }

    #[test]
    fn test_read_responses_drops_respondent_column() {
        let data = "Partisipan,P1,P2\nR1,SS,CS\nR2, S ,CTS\n";
        let table = reader().read_responses(data.as_bytes()).unwrap();

        assert_eq!(table.questions(), &["P1".to_string(), "P2".to_string()]);
        assert_eq!(table.respondent_count(), 2);
        assert_eq!(table.respondents()[0].id, "R1");
        // Values are trimmed.
        assert_eq!(table.respondents()[1].answers, vec!["S", "CTS"]);
    }

    #[test]
    fn test_read_responses_without_respondent_column() {
        let data = "P1,P2\nSS,CS\nS,CTS\n";
        let table = reader().read_responses(data.as_bytes()).unwrap();

        assert_eq!(table.question_count(), 2);
        assert_eq!(table.respondents()[1].id, "2");
    }

    #[test]
    fn test_read_responses_keeps_empty_and_unknown_cells() {
        let data = "Partisipan,P1,P2\nR1,SS,\nR2,maybe,TS\n";
        let table = reader().read_responses(data.as_bytes()).unwrap();

        assert_eq!(table.respondents()[0].answers, vec!["SS", ""]);
        assert_eq!(table.respondents()[1].answers, vec!["maybe", "TS"]);
    }

    #[test]
    fn test_read_responses_rejects_ragged_rows() {
        let data = "Partisipan,P1,P2\nR1,SS\n";
        assert!(reader().read_responses(data.as_bytes()).is_err());
    }

    #[test]
    fn test_read_responses_rejects_duplicate_questions() {
        let data = "P1,P1\nSS,S\n";
        let err = reader().read_responses(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_custom_delimiter_and_column() {
        let config = IngestConfig {
            respondent_column: "Respondent".to_string(),
            delimiter: b';',
            ..IngestConfig::default()
        };
        let data = "Respondent;Q1\nA;SS\n";
        let table = SurveyReader::new(config)
            .read_responses(data.as_bytes())
            .unwrap();

        assert_eq!(table.questions(), &["Q1".to_string()]);
        assert_eq!(table.respondents()[0].id, "A");
    }

    #[test]
    fn test_read_labels() {
        let data = "ID,Pertanyaan\nP1,Layanan cepat\nP2,Harga wajar\n,orphan\n";
        let labels = reader().read_labels(data.as_bytes()).unwrap();

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("P1").map(String::as_str), Some("Layanan cepat"));
    }

    #[test]
    fn test_read_labels_missing_column() {
        let data = "Code,Text\nP1,Something\n";
        let err = reader().read_labels(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("'ID'"));
    }

    #[test]
    fn test_load_responses_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Partisipan,P1\nR1,SS\nR2,STS\n").unwrap();

        let table = reader().load_responses(file.path()).unwrap();
        assert_eq!(table.cell_count(), 2);
    }

    #[test]
    fn test_load_responses_missing_file() {
        let err = reader()
            .load_responses(Path::new("/no/such/survey.csv"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open survey file"));
    }
}
