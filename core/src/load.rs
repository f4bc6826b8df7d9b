//! JSON-lines input.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hostprint_types::HandshakeRecord;
use serde_json::Value;
use tracing::{info, warn};

use crate::PipelineError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Log and skip lines that are not JSON objects instead of failing.
    pub skip_malformed: bool,
}

/// Read one [`HandshakeRecord`] per non-blank line of `path`.
pub fn load_records(
    path: &Path,
    options: LoadOptions,
) -> Result<Vec<HandshakeRecord>, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(BufReader::new(file), path, options)?;
    info!(path = %path.display(), records = records.len(), "Loaded records");
    Ok(records)
}

/// Parse JSON lines from `reader`; `path` is only used in errors and logs.
pub fn parse_records<R: BufRead>(
    reader: R,
    path: &Path,
    options: LoadOptions,
) -> Result<Vec<HandshakeRecord>, PipelineError> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(record) => records.push(record),
            Err(reason) if options.skip_malformed => {
                warn!(path = %path.display(), line = line_no, "Skipping malformed line: {reason}");
                skipped += 1;
            }
            Err(reason) => {
                return Err(PipelineError::MalformedLine {
                    path: path.to_path_buf(),
                    line: line_no,
                    reason,
                });
            }
        }
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "Skipped malformed lines");
    }
    Ok(records)
}

fn parse_line(line: &str) -> Result<HandshakeRecord, String> {
    let value: Value = serde_json::from_str(line).map_err(|e| format!("invalid JSON: {e}"))?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| format!("unexpected record shape: {e}"))
}
