//! Random forest classifier for hostprint.
//!
//! - **`tree`**: CART decision tree (Gini impurity, flat node arena)
//! - **`ensemble`**: bootstrap-aggregated forest with probability averaging
//! - **`split`**: seeded train/test index partitioning
//!
//! All randomness flows from a caller-supplied `u64` seed, so the same inputs
//! and seed always produce the same model.

mod ensemble;
mod error;
mod split;
mod tree;

pub use ensemble::RandomForest;
pub use error::ForestError;
pub use split::{TrainTestSplit, train_test_split};
pub use tree::DecisionTree;

/// Fraction of correct predictions. Empty input scores 0.
#[must_use]
pub fn accuracy(expected: &[usize], predicted: &[usize]) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }
    let correct = expected
        .iter()
        .zip(predicted)
        .filter(|(a, b)| a == b)
        .count();
    correct as f64 / expected.len() as f64
}
