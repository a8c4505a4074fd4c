use crate::error::PrepError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Question and answer text as found in a record node, trimmed but otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPair {
    pub question: String,
    pub answer: String,
}

impl RawPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// One line of the output dataset. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormattedRecord {
    pub instruction: String,
    pub response: String,
}

#[derive(Debug, Clone)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetReport {
    pub documents_found: usize,
    pub records: usize,
    pub rejected_pairs: usize,
    pub skipped_documents: Vec<SkippedDocument>,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub min_answer_chars: usize,
    pub min_question_chars: usize,
    pub extension: String,
    pub record_tag: String,
    pub question_tag: String,
    pub answer_tag: String,
    /// Fail the run instead of writing an empty dataset when no documents are found.
    pub strict: bool,
    /// Write through a temporary file in the destination directory and rename it into place.
    pub atomic_write: bool,
}

impl PipelineOptions {
    pub fn validate(&self) -> Result<(), PrepError> {
        let named = [
            ("extension", &self.extension),
            ("record tag", &self.record_tag),
            ("question tag", &self.question_tag),
            ("answer tag", &self.answer_tag),
        ];

        for (label, value) in named {
            if value.trim().is_empty() {
                return Err(PrepError::InvalidArgument(format!("{label} must not be empty")));
            }
        }

        if self.question_tag == self.answer_tag {
            return Err(PrepError::InvalidArgument(format!(
                "question and answer tags must differ (both are {})",
                self.question_tag
            )));
        }

        Ok(())
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            min_answer_chars: 20,
            min_question_chars: 10,
            extension: "xml".to_string(),
            record_tag: "QAPair".to_string(),
            question_tag: "Question".to_string(),
            answer_tag: "Answer".to_string(),
            strict: false,
            atomic_write: false,
        }
    }
}
