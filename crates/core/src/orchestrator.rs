use crate::extractor::RecordExtractor;
use crate::ingest::{build_dataset_best_effort, discover_documents};
use crate::traits::DatasetSink;
use crate::{DatasetReport, PipelineOptions, PrepError};
use std::path::{Path, PathBuf};

/// Runs scan, extract, clean, filter and write once over a corpus root.
pub struct DatasetPipeline<E, S>
where
    E: RecordExtractor,
    S: DatasetSink,
{
    extractor: E,
    sink: S,
    options: PipelineOptions,
}

impl<E, S> DatasetPipeline<E, S>
where
    E: RecordExtractor,
    S: DatasetSink,
{
    pub fn new(extractor: E, sink: S, options: PipelineOptions) -> Self {
        Self {
            extractor,
            sink,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Scans and processes `root` in one pass. See [`Self::scan`] and [`Self::process`].
    pub fn run(&self, root: &Path) -> Result<DatasetReport, PrepError> {
        let documents = self.scan(root)?;
        self.process(&documents)
    }

    /// Validates the options and lists the documents under `root`.
    ///
    /// With `strict` set, an empty corpus is an error and nothing gets written.
    pub fn scan(&self, root: &Path) -> Result<Vec<PathBuf>, PrepError> {
        self.options.validate()?;

        let documents = discover_documents(root, &self.options.extension);
        if documents.is_empty() && self.options.strict {
            return Err(PrepError::EmptyCorpus(format!(
                "no .{} files under {}",
                self.options.extension.trim_start_matches('.'),
                root.display()
            )));
        }

        Ok(documents)
    }

    /// Builds the whole dataset in memory, then hands it to the sink in one call.
    ///
    /// Unreadable documents are reported, not fatal. Sink errors are fatal.
    pub fn process(&self, documents: &[PathBuf]) -> Result<DatasetReport, PrepError> {
        let build = build_dataset_best_effort(documents, &self.extractor, &self.options);
        self.sink.write_dataset(&build.records)?;

        Ok(DatasetReport {
            documents_found: documents.len(),
            records: build.records.len(),
            rejected_pairs: build.rejected_pairs,
            skipped_documents: build.skipped_documents,
        })
    }
}
