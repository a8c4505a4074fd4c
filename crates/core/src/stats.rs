use crate::FormattedRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LengthSummary {
    pub mean: f64,
    pub min: usize,
    pub max: usize,
}

impl LengthSummary {
    fn from_lengths(lengths: impl Iterator<Item = usize>) -> Self {
        let mut count = 0usize;
        let mut total = 0usize;
        let mut min = usize::MAX;
        let mut max = 0usize;

        for length in lengths {
            count += 1;
            total += length;
            min = min.min(length);
            max = max.max(length);
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            mean: total as f64 / count as f64,
            min,
            max,
        }
    }
}

/// Character-length profile of a dataset, used to size model inputs and outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DatasetStats {
    pub records: usize,
    pub instruction_chars: LengthSummary,
    pub response_chars: LengthSummary,
}

impl DatasetStats {
    pub fn from_records(records: &[FormattedRecord]) -> Self {
        Self {
            records: records.len(),
            instruction_chars: LengthSummary::from_lengths(
                records.iter().map(|record| record.instruction.chars().count()),
            ),
            response_chars: LengthSummary::from_lengths(
                records.iter().map(|record| record.response.chars().count()),
            ),
        }
    }
}
