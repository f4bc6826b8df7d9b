use std::path::PathBuf;

use hostprint_config::ResolvedConfig;
use hostprint_types::{ForestSettings, Prediction, SplitSettings};
use tracing::info;

use crate::{
    LoadOptions, PipelineError, PreprocessStats, classify, encode_and_train, load_records,
    preprocess, write_predictions,
};

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub forest: ForestSettings,
    pub split: SplitSettings,
    pub load: LoadOptions,
}

impl RunRequest {
    #[must_use]
    pub fn new(input: PathBuf, output: PathBuf, config: &ResolvedConfig) -> Self {
        Self {
            input,
            output,
            forest: config.forest,
            split: config.split,
            load: LoadOptions {
                skip_malformed: config.skip_malformed,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub records: usize,
    pub stats: PreprocessStats,
    pub accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub predictions: Vec<Prediction>,
    pub output: PathBuf,
}

/// Load, preprocess, train, classify, and write, in that order.
pub fn run(request: &RunRequest) -> Result<RunSummary, PipelineError> {
    info!(
        input = %request.input.display(),
        output = %request.output.display(),
        trees = request.forest.trees().get(),
        seed = request.split.seed,
        "Starting run"
    );

    let records = load_records(&request.input, request.load)?;
    let preprocessed = preprocess(&records);
    if preprocessed.rows.is_empty() {
        return Err(PipelineError::NoUsableRows {
            records: records.len(),
        });
    }

    let model = encode_and_train(&preprocessed.rows, &request.forest, &request.split)?;
    let predictions = classify(&model, &preprocessed.rows)?;
    write_predictions(&request.output, &predictions)?;

    Ok(RunSummary {
        records: records.len(),
        stats: preprocessed.stats,
        accuracy: model.accuracy,
        train_rows: model.train_rows,
        test_rows: model.test_rows,
        predictions,
        output: request.output.clone(),
    })
}
