pub mod cleaning;
pub mod error;
pub mod extractor;
pub mod formatting;
pub mod ingest;
pub mod models;
pub mod orchestrator;
pub mod stats;
pub mod traits;
pub mod writer;

pub use cleaning::{clean_text, normalize_whitespace};
pub use error::PrepError;
pub use extractor::{RecordExtractor, XmlRecordExtractor};
pub use formatting::{format_pair, FormatConfig};
pub use ingest::{build_dataset_best_effort, discover_documents, discover_xml_files, DatasetBuild};
pub use models::{DatasetReport, FormattedRecord, PipelineOptions, RawPair, SkippedDocument};
pub use orchestrator::DatasetPipeline;
pub use stats::{DatasetStats, LengthSummary};
pub use traits::DatasetSink;
pub use writer::{read_jsonl, write_jsonl, write_jsonl_atomic, JsonlWriter};
