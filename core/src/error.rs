//! Pipeline error type.

use std::io;
use std::path::PathBuf;

use hostprint_forest::ForestError;
use hostprint_types::EncoderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}: {reason}", path.display())]
    MalformedLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("no usable rows after preprocessing ({records} records read)")]
    NoUsableRows { records: usize },
    #[error("dataset of {rows} rows is too small to split into train and test sets")]
    DatasetTooSmall {
        rows: usize,
        #[source]
        source: ForestError,
    },
    #[error("model produced class index {0} with no label")]
    UnknownClass(usize),
    #[error(transparent)]
    Encoder(#[from] EncoderError),
    #[error(transparent)]
    Forest(#[from] ForestError),
    #[error("failed to serialize predictions")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
