use crate::cleaning::clean_text;
use crate::models::{FormattedRecord, PipelineOptions, RawPair};

#[derive(Debug, Clone, Copy)]
pub struct FormatConfig {
    pub min_answer_chars: usize,
    pub min_question_chars: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::from(&PipelineOptions::default())
    }
}

impl From<&PipelineOptions> for FormatConfig {
    fn from(value: &PipelineOptions) -> Self {
        Self {
            min_answer_chars: value.min_answer_chars,
            min_question_chars: value.min_question_chars,
        }
    }
}

/// Cleans both sides of a pair and keeps it only if the cleaned text is long enough.
///
/// Thresholds are compared against the character count after cleaning, so
/// markup never counts towards the minimum. A side that cleans down to
/// nothing is rejected even when a threshold is zero.
pub fn format_pair(pair: &RawPair, config: &FormatConfig) -> Option<FormattedRecord> {
    let question = clean_text(&pair.question);
    let answer = clean_text(&pair.answer);

    if question.is_empty()
        || answer.is_empty()
        || answer.chars().count() < config.min_answer_chars
        || question.chars().count() < config.min_question_chars
    {
        return None;
    }

    Some(FormattedRecord {
        instruction: question,
        response: answer,
    })
}
