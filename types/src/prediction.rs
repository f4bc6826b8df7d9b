use serde::{Deserialize, Serialize};

/// One output record: the predicted OS for a host and how sure the model is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub ip: String,
    pub predicted_os: String,
    /// Highest class probability, in `[0, 1]`.
    pub confidence: f64,
}
