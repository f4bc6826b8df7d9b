use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForestError {
    #[error("cannot fit on zero samples")]
    NoSamples,
    #[error("samples have zero features")]
    NoFeatures,
    #[error("class count must be at least 1")]
    NoClasses,
    #[error("{rows} feature rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },
    #[error("row {row} has {found} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("input has {found} features, model expects {expected}")]
    WidthMismatch { expected: usize, found: usize },
    #[error("label {label} is out of range for {n_classes} classes")]
    LabelOutOfRange { label: usize, n_classes: usize },
    #[error("split needs at least one training and one test row (have {samples} samples)")]
    TooFewSamples { samples: usize },
}
