//! Core pipeline for hostprint.
//!
//! Four sequential stages, each usable on its own:
//!
//! ```text
//! load_records -> preprocess -> encode_and_train -> classify -> write_predictions
//! ```
//!
//! [`run`] composes them for the CLI.

mod classify;
mod error;
mod load;
mod output;
mod pipeline;
mod preprocess;
mod train;

pub use classify::classify;
pub use error::PipelineError;
pub use load::{LoadOptions, load_records, parse_records};
pub use output::{OUTPUT_INDENT, write_predictions};
pub use pipeline::{RunRequest, RunSummary, run};
pub use preprocess::{PreprocessStats, Preprocessed, deduplicate, extract_features, preprocess};
pub use train::{TrainedModel, encode_and_train};
