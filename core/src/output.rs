use std::path::Path;

use hostprint_types::Prediction;
use hostprint_utils::{atomic_write, to_pretty_json};
use tracing::info;

use crate::PipelineError;

/// Spaces per nesting level in the output file.
pub const OUTPUT_INDENT: usize = 4;

/// Write `predictions` as an indented JSON array, replacing `path` atomically.
pub fn write_predictions(path: &Path, predictions: &[Prediction]) -> Result<(), PipelineError> {
    let bytes = to_pretty_json(predictions, OUTPUT_INDENT).map_err(PipelineError::Serialize)?;
    atomic_write(path, &bytes).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), records = predictions.len(), "Wrote predictions");
    Ok(())
}
