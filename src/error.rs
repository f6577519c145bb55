use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of an analysis run. Any of these aborts the run; a caller
/// never sees a partially aggregated result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed record at {}:{line}: {message}", path.display())]
    RecordParse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("worker pool failed: {0}")]
    WorkerFailed(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileAccess { path: path.into(), source }
    }

    pub(crate) fn record_parse(path: impl Into<PathBuf>, line: u64, message: impl ToString) -> Self {
        Self::RecordParse { path: path.into(), line, message: message.to_string() }
    }
}
