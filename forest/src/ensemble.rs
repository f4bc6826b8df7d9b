//! Bootstrap-aggregated forest of [`DecisionTree`]s.

use hostprint_types::{ForestSettings, Sampling};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::ForestError;
use crate::tree::{DecisionTree, argmax, validate_training_set};

#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// Fit `settings.trees()` trees. Each tree draws from its own RNG derived
    /// from `seed` and the tree index.
    pub fn fit<R: AsRef<[f64]>>(
        x: &[R],
        y: &[usize],
        n_classes: usize,
        settings: &ForestSettings,
        seed: u64,
    ) -> Result<Self, ForestError> {
        let n_features = validate_training_set(x, y, n_classes)?;
        let n = x.len();
        let n_trees = settings.trees().get();

        let mut trees = Vec::with_capacity(n_trees);
        for index in 0..n_trees {
            let mut rng = StdRng::seed_from_u64(tree_seed(seed, index));
            let mut samples: Vec<usize> = match settings.sampling() {
                Sampling::Bootstrap => (0..n).map(|_| rng.random_range(0..n)).collect(),
                Sampling::Full => (0..n).collect(),
            };
            let tree = DecisionTree::fit_samples(
                x,
                y,
                &mut samples,
                n_classes,
                n_features,
                settings,
                &mut rng,
            );
            debug!(
                tree = index,
                nodes = tree.node_count(),
                depth = tree.depth(),
                "Fitted tree"
            );
            trees.push(tree);
        }

        info!(
            trees = n_trees,
            samples = n,
            features = n_features,
            classes = n_classes,
            max_features = %settings.max_features(),
            "Random forest trained"
        );

        Ok(Self { trees, n_classes })
    }

    /// Mean of the per-tree leaf distributions, length `n_classes`.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, ForestError> {
        let mut sum = vec![0.0; self.n_classes];
        for tree in &self.trees {
            tree.check_width(x)?;
            for (acc, p) in sum.iter_mut().zip(tree.leaf_distribution(x)) {
                *acc += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        for acc in &mut sum {
            *acc /= n_trees;
        }
        Ok(sum)
    }

    pub fn predict(&self, x: &[f64]) -> Result<usize, ForestError> {
        self.predict_with_confidence(x).map(|(class, _)| class)
    }

    /// Winning class and its averaged probability.
    pub fn predict_with_confidence(&self, x: &[f64]) -> Result<(usize, f64), ForestError> {
        let proba = self.predict_proba(x)?;
        Ok(argmax(&proba))
    }

    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn tree_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
