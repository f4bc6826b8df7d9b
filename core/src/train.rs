//! Label encoding, holdout split, forest fit, and evaluation.

use hostprint_forest::{RandomForest, train_test_split};
use hostprint_types::{
    EncoderError, FeatureRow, FeatureVector, ForestSettings, LabelEncoder, SplitSettings,
};
use tracing::info;

use crate::PipelineError;

/// A fitted forest together with the encoders needed to use it.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub forest: RandomForest,
    /// Maps OS labels to forest class indices.
    pub os_encoder: LabelEncoder,
    /// Maps negotiated TLS versions to the numeric first feature.
    pub version_encoder: LabelEncoder,
    /// Share of held-out rows predicted correctly.
    pub accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl TrainedModel {
    /// Numeric input for `row`; its TLS version must have been seen in training.
    pub fn vector(&self, row: &FeatureRow) -> Result<FeatureVector, PipelineError> {
        let code = self
            .version_encoder
            .encode(&row.tls_version)
            .ok_or_else(|| EncoderError::Unseen(row.tls_version.clone()))?;
        Ok(row.to_vector(code))
    }
}

pub fn encode_and_train(
    rows: &[FeatureRow],
    forest_settings: &ForestSettings,
    split_settings: &SplitSettings,
) -> Result<TrainedModel, PipelineError> {
    let version_encoder = LabelEncoder::fit(rows.iter().map(|r| r.tls_version.as_str()))?;
    let os_encoder = LabelEncoder::fit(rows.iter().map(|r| r.os_label.as_str()))?;

    let versions = version_encoder.transform(rows.iter().map(|r| r.tls_version.as_str()))?;
    let x: Vec<FeatureVector> = rows
        .iter()
        .zip(versions)
        .map(|(row, code)| row.to_vector(code))
        .collect();
    let y = os_encoder.transform(rows.iter().map(|r| r.os_label.as_str()))?;

    let split = train_test_split(rows.len(), split_settings.test_fraction, split_settings.seed)
        .map_err(|source| PipelineError::DatasetTooSmall {
            rows: rows.len(),
            source,
        })?;

    let x_train: Vec<FeatureVector> = split.train.iter().map(|&i| x[i]).collect();
    let y_train: Vec<usize> = split.train.iter().map(|&i| y[i]).collect();
    let forest = RandomForest::fit(
        &x_train,
        &y_train,
        os_encoder.len(),
        forest_settings,
        split_settings.seed,
    )?;

    let y_test: Vec<usize> = split.test.iter().map(|&i| y[i]).collect();
    let predicted = split
        .test
        .iter()
        .map(|&i| forest.predict(&x[i]))
        .collect::<Result<Vec<_>, _>>()?;
    let accuracy = hostprint_forest::accuracy(&y_test, &predicted);

    info!(
        accuracy,
        train_rows = split.train.len(),
        test_rows = split.test.len(),
        os_classes = os_encoder.len(),
        tls_versions = version_encoder.len(),
        "Model evaluated on holdout split"
    );

    Ok(TrainedModel {
        forest,
        os_encoder,
        version_encoder,
        accuracy,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    })
}
