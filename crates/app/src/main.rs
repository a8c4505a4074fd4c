use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use medqa_prep_core::{
    read_jsonl, DatasetPipeline, DatasetSink, DatasetStats, JsonlWriter, PipelineOptions,
    XmlRecordExtractor,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "medqa-prep", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an XML question-answer corpus into an instruction JSONL dataset.
    Prepare {
        /// Root folder searched recursively for documents.
        #[arg(long, env = "MEDQA_INPUT_DIR", default_value = "data/MedQuAD_XMLs")]
        input_dir: PathBuf,
        /// Output .jsonl file, replaced if it exists.
        #[arg(long, env = "MEDQA_OUTPUT", default_value = "data/medquad_preprocessed.jsonl")]
        output: PathBuf,
        /// Minimum answer length in characters after cleaning.
        #[arg(long, env = "MEDQA_MIN_ANSWER_CHARS", default_value = "20")]
        min_answer_chars: usize,
        /// Minimum question length in characters after cleaning.
        #[arg(long, env = "MEDQA_MIN_QUESTION_CHARS", default_value = "10")]
        min_question_chars: usize,
        /// File extension of source documents.
        #[arg(long, default_value = "xml")]
        extension: String,
        /// Element that wraps one question/answer record.
        #[arg(long, default_value = "QAPair")]
        record_tag: String,
        #[arg(long, default_value = "Question")]
        question_tag: String,
        #[arg(long, default_value = "Answer")]
        answer_tag: String,
        /// Fail instead of writing an empty dataset when no documents are found.
        #[arg(long, default_value_t = false)]
        strict: bool,
        /// Stage output in a temporary file and rename it into place.
        #[arg(long, default_value_t = false)]
        atomic: bool,
    },
    /// Print length statistics for an existing JSONL dataset.
    Stats {
        /// Dataset produced by `prepare`.
        #[arg(long, env = "MEDQA_OUTPUT", default_value = "data/medquad_preprocessed.jsonl")]
        dataset: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "medqa-prep boot"
    );

    match cli.command {
        Command::Prepare {
            input_dir,
            output,
            min_answer_chars,
            min_question_chars,
            extension,
            record_tag,
            question_tag,
            answer_tag,
            strict,
            atomic,
        } => {
            let options = PipelineOptions {
                min_answer_chars,
                min_question_chars,
                extension,
                record_tag,
                question_tag,
                answer_tag,
                strict,
                atomic_write: atomic,
            };

            let pipeline = DatasetPipeline::new(
                XmlRecordExtractor::from_options(&options),
                JsonlWriter::from_options(&output, &options),
                options,
            );

            let documents = pipeline
                .scan(&input_dir)
                .with_context(|| format!("failed to scan {}", input_dir.display()))?;

            info!(
                input_dir = %input_dir.display(),
                extension = %pipeline.options().extension,
                documents = documents.len(),
                "source documents discovered"
            );

            if documents.is_empty() {
                warn!(input_dir = %input_dir.display(), "no source documents found, dataset will be empty");
            }

            let report = pipeline
                .process(&documents)
                .with_context(|| format!("failed to build dataset from {}", input_dir.display()))?;

            if !report.skipped_documents.is_empty() {
                warn!(
                    "skipped_documents={} for input_dir={}",
                    report.skipped_documents.len(),
                    input_dir.display()
                );
                for skipped in &report.skipped_documents {
                    warn!(path = %skipped.path.display(), reason = %skipped.reason, "Failed to parse document");
                }
            }

            info!(
                records = report.records,
                rejected_pairs = report.rejected_pairs,
                output = %pipeline.sink().describe(),
                atomic = pipeline.options().atomic_write,
                "dataset written"
            );

            println!(
                "Saved {} Q&A pairs to {} at {}",
                report.records,
                pipeline.sink().path().display(),
                Utc::now().to_rfc3339()
            );
        }
        Command::Stats { dataset } => {
            let records = read_jsonl(&dataset)
                .with_context(|| format!("failed to read dataset {}", dataset.display()))?;
            let stats = DatasetStats::from_records(&records);

            info!(dataset = %dataset.display(), records = stats.records, "dataset loaded");

            println!("records: {}", stats.records);
            println!(
                "instruction chars: mean={:.1} min={} max={}",
                stats.instruction_chars.mean, stats.instruction_chars.min, stats.instruction_chars.max
            );
            println!(
                "response chars: mean={:.1} min={} max={}",
                stats.response_chars.mean, stats.response_chars.min, stats.response_chars.max
            );
        }
    }

    Ok(())
}
