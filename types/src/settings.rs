//! Resolved training settings shared across crates.
//!
//! These types represent fully-validated, resolved configuration state.
//! Raw TOML deserialization structs (with `Option` fields) stay private in
//! `hostprint-config`. The config loader resolves them into these types at
//! the parse boundary.
//!
//! Existence of a value is the proof of its validity.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("tree count must be at least 1")]
    NoTrees,
    #[error("test size must be strictly between 0 and 1 (got {0})")]
    TestFractionOutOfRange(f64),
    #[error("min_samples_split must be at least 2 (got {0})")]
    MinSamplesSplitTooSmall(usize),
    #[error("min_samples_leaf must be at least 1")]
    MinSamplesLeafZero,
    #[error("max_features must be at least 1")]
    MaxFeaturesZero,
    #[error("max_depth must be at least 1")]
    MaxDepthZero,
    #[error("invalid max_features value '{0}'; expected one of: \"sqrt\", \"log2\", \"all\", or a positive integer")]
    UnknownMaxFeatures(String),
}

/// Number of trees in the forest, at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeCount(NonZeroUsize);

impl TreeCount {
    pub const DEFAULT: usize = 100;

    pub fn new(value: usize) -> Result<Self, SettingsError> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or(SettingsError::NoTrees)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for TreeCount {
    fn default() -> Self {
        Self(NonZeroUsize::new(Self::DEFAULT).expect("default tree count is non-zero"))
    }
}

/// Fraction of rows held out for evaluation, strictly inside `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestFraction(f64);

impl TestFraction {
    pub const DEFAULT: f64 = 0.2;

    pub fn new(value: f64) -> Result<Self, SettingsError> {
        if value.is_finite() && value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(SettingsError::TestFractionOutOfRange(value))
        }
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for TestFraction {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// How many candidate features each split considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxFeatures {
    #[default]
    Sqrt,
    Log2,
    All,
    Fixed(NonZeroUsize),
}

impl MaxFeatures {
    /// Concrete candidate count for `n_features` columns, in `1..=n_features`.
    #[must_use]
    pub fn resolve(self, n_features: usize) -> usize {
        let n = n_features.max(1);
        let k = match self {
            MaxFeatures::Sqrt => (n as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n as f64).log2().floor() as usize,
            MaxFeatures::All => n,
            MaxFeatures::Fixed(k) => k.get(),
        };
        k.clamp(1, n)
    }

    pub fn fixed(count: usize) -> Result<Self, SettingsError> {
        NonZeroUsize::new(count)
            .map(MaxFeatures::Fixed)
            .ok_or(SettingsError::MaxFeaturesZero)
    }
}

impl FromStr for MaxFeatures {
    type Err = SettingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "sqrt" | "auto" => Ok(MaxFeatures::Sqrt),
            "log2" => Ok(MaxFeatures::Log2),
            "all" | "none" => Ok(MaxFeatures::All),
            other => match other.parse::<usize>() {
                Ok(count) => MaxFeatures::fixed(count),
                Err(_) => Err(SettingsError::UnknownMaxFeatures(raw.to_string())),
            },
        }
    }
}

impl fmt::Display for MaxFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxFeatures::Sqrt => f.write_str("sqrt"),
            MaxFeatures::Log2 => f.write_str("log2"),
            MaxFeatures::All => f.write_str("all"),
            MaxFeatures::Fixed(k) => write!(f, "{k}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthLimit {
    #[default]
    Unlimited,
    Limited(NonZeroUsize),
}

impl DepthLimit {
    pub fn limited(max_depth: usize) -> Result<Self, SettingsError> {
        NonZeroUsize::new(max_depth)
            .map(DepthLimit::Limited)
            .ok_or(SettingsError::MaxDepthZero)
    }

    /// Whether a node at `depth` (root = 0) may still be split.
    #[must_use]
    pub fn allows_split_at(self, depth: usize) -> bool {
        match self {
            DepthLimit::Unlimited => true,
            DepthLimit::Limited(max) => depth < max.get(),
        }
    }
}

/// Which rows each tree is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// `n` draws with replacement from `n` training rows.
    #[default]
    Bootstrap,
    /// Every tree sees every training row.
    Full,
}

/// Validated random forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestSettings {
    trees: TreeCount,
    depth: DepthLimit,
    min_samples_split: usize,
    min_samples_leaf: usize,
    max_features: MaxFeatures,
    sampling: Sampling,
}

impl Default for ForestSettings {
    fn default() -> Self {
        Self {
            trees: TreeCount::default(),
            depth: DepthLimit::Unlimited,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            sampling: Sampling::Bootstrap,
        }
    }
}

impl ForestSettings {
    pub fn new(
        trees: TreeCount,
        depth: DepthLimit,
        min_samples_split: usize,
        min_samples_leaf: usize,
        max_features: MaxFeatures,
        sampling: Sampling,
    ) -> Result<Self, SettingsError> {
        if min_samples_split < 2 {
            return Err(SettingsError::MinSamplesSplitTooSmall(min_samples_split));
        }
        if min_samples_leaf == 0 {
            return Err(SettingsError::MinSamplesLeafZero);
        }
        Ok(Self {
            trees,
            depth,
            min_samples_split,
            min_samples_leaf,
            max_features,
            sampling,
        })
    }

    #[must_use]
    pub fn with_trees(mut self, trees: TreeCount) -> Self {
        self.trees = trees;
        self
    }

    #[must_use]
    pub const fn trees(&self) -> TreeCount {
        self.trees
    }

    #[must_use]
    pub const fn depth(&self) -> DepthLimit {
        self.depth
    }

    #[must_use]
    pub const fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    #[must_use]
    pub const fn min_samples_leaf(&self) -> usize {
        self.min_samples_leaf
    }

    #[must_use]
    pub const fn max_features(&self) -> MaxFeatures {
        self.max_features
    }

    #[must_use]
    pub const fn sampling(&self) -> Sampling {
        self.sampling
    }
}

/// Train/test split parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSettings {
    pub test_fraction: TestFraction,
    pub seed: u64,
}

impl SplitSettings {
    pub const DEFAULT_SEED: u64 = 42;
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            test_fraction: TestFraction::default(),
            seed: Self::DEFAULT_SEED,
        }
    }
}
