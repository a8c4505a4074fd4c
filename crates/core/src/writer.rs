use crate::error::PrepError;
use crate::models::{FormattedRecord, PipelineOptions};
use crate::traits::DatasetSink;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes one compact JSON object per line, replacing whatever is at `path`.
///
/// Non-ASCII text is written as UTF-8, never as `\u` escapes. A failure part
/// way through can leave a truncated file behind; see [`write_jsonl_atomic`].
pub fn write_jsonl(path: &Path, records: &[FormattedRecord]) -> Result<(), PrepError> {
    fs::create_dir_all(parent_dir(path))?;
    let file = File::create(path)?;
    write_records(BufWriter::new(file), records)
}

/// Same output as [`write_jsonl`], staged in a temp file next to `path` and renamed over it.
pub fn write_jsonl_atomic(path: &Path, records: &[FormattedRecord]) -> Result<(), PrepError> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    write_records(BufWriter::new(staged.as_file_mut()), records)?;
    staged.as_file().sync_all()?;
    staged.persist(path)?;
    Ok(())
}

pub fn read_jsonl(path: &Path) -> Result<Vec<FormattedRecord>, PrepError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = serde_json::from_str(&line).map_err(|source| PrepError::Json {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

fn write_records<W: Write>(mut writer: W, records: &[FormattedRecord]) -> Result<(), PrepError> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[derive(Debug, Clone)]
pub struct JsonlWriter {
    path: PathBuf,
    atomic: bool,
}

impl JsonlWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic: false,
        }
    }

    pub fn from_options(path: impl Into<PathBuf>, options: &PipelineOptions) -> Self {
        Self::new(path).atomic(options.atomic_write)
    }

    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSink for JsonlWriter {
    fn write_dataset(&self, records: &[FormattedRecord]) -> Result<(), PrepError> {
        if self.atomic {
            write_jsonl_atomic(&self.path, records)
        } else {
            write_jsonl(&self.path, records)
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(instruction: &str, response: &str) -> FormattedRecord {
        FormattedRecord {
            instruction: instruction.to_string(),
            response: response.to_string(),
        }
    }

    #[test]
    fn each_record_is_one_line_with_fixed_key_order() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("out.jsonl");

        write_jsonl(&path, &[record("What is X?", "Answer Y.")])?;

        let written = fs::read_to_string(&path)?;
        assert_eq!(written, "{\"instruction\":\"What is X?\",\"response\":\"Answer Y.\"}\n");
        Ok(())
    }

    #[test]
    fn records_round_trip_with_non_ascii_text() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("dataset.jsonl");
        let records = vec![
            record("¿Qué es la anemia?", "La anemia es una afección \"común\"."),
            record("什么是糖尿病？", "糖尿病是一种慢性疾病。\nLine two."),
            record("What is X?", "Answer Y."),
        ];

        write_jsonl(&path, &records)?;

        let written = fs::read_to_string(&path)?;
        assert_eq!(written.lines().count(), records.len());
        assert!(written.contains("什么是糖尿病？"));
        assert!(!written.contains("\\u"));

        assert_eq!(read_jsonl(&path)?, records);
        Ok(())
    }

    #[test]
    fn existing_file_is_overwritten() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("out.jsonl");
        fs::write(&path, "stale line 1\nstale line 2\nstale line 3\n")?;

        write_jsonl(&path, &[record("Fresh question?", "Fresh answer.")])?;

        assert_eq!(read_jsonl(&path)?, vec![record("Fresh question?", "Fresh answer.")]);
        Ok(())
    }

    #[test]
    fn empty_dataset_writes_empty_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("empty.jsonl");

        write_jsonl(&path, &[])?;

        assert_eq!(fs::read_to_string(&path)?, "");
        Ok(())
    }

    #[test]
    fn atomic_write_replaces_target_and_leaves_no_temp_files(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("out.jsonl");
        fs::write(&path, "old\n")?;

        let options = PipelineOptions {
            atomic_write: true,
            ..PipelineOptions::default()
        };
        let writer = JsonlWriter::from_options(&path, &options);
        writer.write_dataset(&[record("Atomic question?", "Atomic answer.")])?;

        assert_eq!(read_jsonl(&path)?, vec![record("Atomic question?", "Atomic answer.")]);
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn unwritable_destination_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory")?;

        let result = write_jsonl(&blocker.join("out.jsonl"), &[record("Q?", "A.")]);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn malformed_line_reports_its_number() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.jsonl");
        fs::write(
            &path,
            "{\"instruction\":\"a\",\"response\":\"b\"}\n\n{\"instruction\":\"a\"}\n",
        )?;

        match read_jsonl(&path) {
            Err(PrepError::Json { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected json error, got {other:?}"),
        }
        Ok(())
    }
}
