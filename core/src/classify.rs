use hostprint_types::{FeatureRow, Prediction};
use tracing::debug;

use crate::{PipelineError, TrainedModel};

/// Predict every row, in order. `confidence` is the winning class probability.
pub fn classify(
    model: &TrainedModel,
    rows: &[FeatureRow],
) -> Result<Vec<Prediction>, PipelineError> {
    let predictions = rows
        .iter()
        .map(|row| -> Result<Prediction, PipelineError> {
            let (class, confidence) = model.forest.predict_with_confidence(&model.vector(row)?)?;
            let predicted_os = model
                .os_encoder
                .decode(class)
                .ok_or(PipelineError::UnknownClass(class))?;
            Ok(Prediction {
                ip: row.ip.clone(),
                predicted_os: predicted_os.to_string(),
                confidence,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(predictions = predictions.len(), "Classified rows");
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode_and_train;
    use hostprint_types::{ForestSettings, SplitSettings, TreeCount};

    fn row(ip: &str, version: &str, ttl: u32, os: &str) -> FeatureRow {
        FeatureRow {
            ip: ip.to_string(),
            tls_version: version.to_string(),
            num_ciphers: 10,
            num_extensions: 12,
            http2_window_size: 18,
            tcp_ttl: ttl,
            os_label: os.to_string(),
        }
    }

    fn rows() -> Vec<FeatureRow> {
        (0..20)
            .map(|i| {
                if i % 2 == 0 {
                    row(&format!("198.51.100.{i}"), "772", 64, "Linux")
                } else {
                    row(&format!("198.51.100.{i}"), "771", 128, "Windows")
                }
            })
            .collect()
    }

    #[test]
    fn predicts_every_row_in_order() {
        let rows = rows();
        let settings = ForestSettings::default().with_trees(TreeCount::new(8).unwrap());
        let model = encode_and_train(&rows, &settings, &SplitSettings::default()).unwrap();

        let predictions = classify(&model, &rows).unwrap();
        assert_eq!(predictions.len(), rows.len());
        for (p, r) in predictions.iter().zip(&rows) {
            assert_eq!(p.ip, r.ip);
            assert_eq!(p.predicted_os, r.os_label);
            assert!(p.confidence > 0.5 && p.confidence <= 1.0);
        }
    }

    #[test]
    fn unseen_tls_version_is_an_error() {
        let rows = rows();
        let settings = ForestSettings::default().with_trees(TreeCount::new(2).unwrap());
        let model = encode_and_train(&rows, &settings, &SplitSettings::default()).unwrap();

        let stranger = row("203.0.113.1", "769", 64, "Linux");
        let err = classify(&model, &[stranger]).unwrap_err();
        assert!(matches!(err, PipelineError::Encoder(_)));
    }
}
