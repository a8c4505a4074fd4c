use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("xml parse error in {path}: {details}")]
    XmlParse { path: String, details: String },

    #[error("invalid jsonl record at line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no documents found: {0}")]
    EmptyCorpus(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl PrepError {
    pub(crate) fn xml(path: &std::path::Path, details: impl std::fmt::Display) -> Self {
        PrepError::XmlParse {
            path: path.display().to_string(),
            details: details.to_string(),
        }
    }
}

pub type Result<T, E = PrepError> = std::result::Result<T, E>;
