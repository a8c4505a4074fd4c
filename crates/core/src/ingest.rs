use crate::extractor::RecordExtractor;
use crate::formatting::{format_pair, FormatConfig};
use crate::{FormattedRecord, PipelineOptions, SkippedDocument};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collects files under `root` whose extension matches, ignoring ASCII case.
///
/// A missing or unreadable root gives an empty list. Results are sorted.
pub fn discover_documents(root: &Path, extension: &str) -> Vec<PathBuf> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

        if matches {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

pub fn discover_xml_files(root: &Path) -> Vec<PathBuf> {
    discover_documents(root, "xml")
}

#[derive(Debug, Default)]
pub struct DatasetBuild {
    pub records: Vec<FormattedRecord>,
    pub rejected_pairs: usize,
    pub skipped_documents: Vec<SkippedDocument>,
}

/// Extracts, cleans and filters every document in order.
///
/// A document that cannot be read or parsed is listed in `skipped_documents`
/// and contributes nothing; the remaining documents are still processed.
pub fn build_dataset_best_effort<E>(
    documents: &[PathBuf],
    extractor: &E,
    options: &PipelineOptions,
) -> DatasetBuild
where
    E: RecordExtractor + ?Sized,
{
    let config = FormatConfig::from(options);
    let mut build = DatasetBuild::default();

    for path in documents {
        let pairs = match extractor.extract_pairs(path) {
            Ok(pairs) => pairs,
            Err(error) => {
                build.skipped_documents.push(SkippedDocument {
                    path: path.clone(),
                    reason: error.to_string(),
                });
                continue;
            }
        };

        for pair in &pairs {
            match format_pair(pair, &config) {
                Some(record) => build.records.push(record),
                None => build.rejected_pairs += 1,
            }
        }
    }

    build
}
