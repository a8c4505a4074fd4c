use crate::{FormattedRecord, PrepError};

/// Destination for a finished dataset. Receives every record of a run in one call.
pub trait DatasetSink {
    fn write_dataset(&self, records: &[FormattedRecord]) -> Result<(), PrepError>;

    fn describe(&self) -> String;
}
