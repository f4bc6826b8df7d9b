use hostprint_types::TestFraction;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::ForestError;

/// Row indices for each side of a holdout split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_samples` with `seed` and hold out `ceil(fraction * n)` rows.
///
/// Both sides must end up non-empty.
pub fn train_test_split(
    n_samples: usize,
    fraction: TestFraction,
    seed: u64,
) -> Result<TrainTestSplit, ForestError> {
    let n_test = (fraction.get() * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(ForestError::TooFewSamples {
            samples: n_samples,
        });
    }

    let mut permutation: Vec<usize> = (0..n_samples).collect();
    permutation.shuffle(&mut StdRng::seed_from_u64(seed));
    let train = permutation.split_off(n_test);
    Ok(TrainTestSplit {
        train,
        test: permutation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fraction(f: f64) -> TestFraction {
        TestFraction::new(f).unwrap()
    }

    #[test]
    fn sizes_round_test_side_up() {
        let split = train_test_split(11, fraction(0.2), 42).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn partitions_every_index_once() {
        let split = train_test_split(50, fraction(0.3), 7).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn deterministic_for_seed() {
        assert_eq!(
            train_test_split(30, fraction(0.2), 5).unwrap(),
            train_test_split(30, fraction(0.2), 5).unwrap()
        );
    }

    #[test]
    fn rejects_single_sample() {
        assert_eq!(
            train_test_split(1, fraction(0.2), 0).unwrap_err(),
            ForestError::TooFewSamples { samples: 1 }
        );
        assert!(train_test_split(0, fraction(0.5), 0).is_err());
    }
}
