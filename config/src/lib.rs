//! Configuration loading, parsing, and resolution for hostprint.
//!
//! The optional config file lives at `~/.hostprint/config.toml` (or wherever
//! `HOSTPRINT_CONFIG` points):
//!
//! ```toml
//! [forest]
//! trees = 100
//! max_depth = 12
//! min_samples_split = 2
//! min_samples_leaf = 1
//! max_features = "sqrt"
//! bootstrap = true
//!
//! [split]
//! test_size = 0.2
//! seed = 42
//!
//! [input]
//! skip_malformed = false
//! ```
//!
//! Raw structs mirror the file with `Option` fields. [`HostprintConfig::resolve`]
//! layers command-line overrides, environment variables, the file, and defaults
//! (in that order of precedence) into validated [`ResolvedConfig`] values.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hostprint_types::{
    DepthLimit, ForestSettings, MaxFeatures, Sampling, SettingsError, SplitSettings,
    TestFraction, TreeCount,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Explicit config file location. A missing file at this path is an error.
pub const CONFIG_ENV: &str = "HOSTPRINT_CONFIG";
pub const TREES_ENV: &str = "HOSTPRINT_TREES";
pub const SEED_ENV: &str = "HOSTPRINT_SEED";
pub const TEST_SIZE_ENV: &str = "HOSTPRINT_TEST_SIZE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("environment variable {var} has invalid value '{value}'")]
    Env { var: &'static str, value: String },
    #[error(transparent)]
    Invalid(#[from] SettingsError),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Env { .. } | ConfigError::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostprintConfig {
    pub forest: Option<ForestConfig>,
    pub split: Option<SplitConfig>,
    pub input: Option<InputConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForestConfig {
    pub trees: Option<usize>,
    /// Omit for unlimited depth.
    pub max_depth: Option<usize>,
    pub min_samples_split: Option<usize>,
    pub min_samples_leaf: Option<usize>,
    pub max_features: Option<MaxFeaturesValue>,
    pub bootstrap: Option<bool>,
}

/// `max_features` accepts either a name (`"sqrt"`, `"log2"`, `"all"`) or a count.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MaxFeaturesValue {
    Count(usize),
    Name(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitConfig {
    pub test_size: Option<f64>,
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Skip lines that are not JSON objects instead of failing the run.
    pub skip_malformed: Option<bool>,
}

/// Values supplied on the command line; these win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub trees: Option<usize>,
    pub test_size: Option<f64>,
    pub seed: Option<u64>,
    /// `true` forces lenient loading; `false` defers to the file.
    pub skip_malformed: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    pub forest: ForestSettings,
    pub split: SplitSettings,
    pub skip_malformed: bool,
}

impl HostprintConfig {
    /// Load from `HOSTPRINT_CONFIG` if set, else from the default location.
    ///
    /// Returns `Ok(None)` only when no explicit path is set and the default
    /// file does not exist.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        if let Some(path) = explicit_config_path() {
            return Self::load_from(&path).map(Some);
        }
        let Some(path) = default_config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Where [`HostprintConfig::load`] looks.
    #[must_use]
    pub fn path() -> Option<PathBuf> {
        explicit_config_path().or_else(default_config_path)
    }

    pub fn resolve(&self, overrides: &Overrides) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with_env(overrides, |var| env::var(var).ok())
    }

    /// Same as [`HostprintConfig::resolve`] with an injectable environment.
    pub fn resolve_with_env<F>(
        &self,
        overrides: &Overrides,
        lookup: F,
    ) -> Result<ResolvedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let forest = self.forest.as_ref();
        let split = self.split.as_ref();

        let trees = match overrides.trees {
            Some(trees) => trees,
            None => parse_env(TREES_ENV, &lookup)?
                .or_else(|| forest.and_then(|f| f.trees))
                .unwrap_or(TreeCount::DEFAULT),
        };
        let depth = match forest.and_then(|f| f.max_depth) {
            Some(max_depth) => DepthLimit::limited(max_depth)?,
            None => DepthLimit::Unlimited,
        };
        let max_features = match forest.and_then(|f| f.max_features.as_ref()) {
            None => MaxFeatures::default(),
            Some(MaxFeaturesValue::Count(count)) => MaxFeatures::fixed(*count)?,
            Some(MaxFeaturesValue::Name(name)) => name.parse()?,
        };
        let sampling = if forest.and_then(|f| f.bootstrap).unwrap_or(true) {
            Sampling::Bootstrap
        } else {
            Sampling::Full
        };
        let forest_settings = ForestSettings::new(
            TreeCount::new(trees)?,
            depth,
            forest.and_then(|f| f.min_samples_split).unwrap_or(2),
            forest.and_then(|f| f.min_samples_leaf).unwrap_or(1),
            max_features,
            sampling,
        )?;

        let test_size = match overrides.test_size {
            Some(test_size) => test_size,
            None => parse_env(TEST_SIZE_ENV, &lookup)?
                .or_else(|| split.and_then(|s| s.test_size))
                .unwrap_or(TestFraction::DEFAULT),
        };
        let seed = match overrides.seed {
            Some(seed) => seed,
            None => parse_env(SEED_ENV, &lookup)?
                .or_else(|| split.and_then(|s| s.seed))
                .unwrap_or(SplitSettings::DEFAULT_SEED),
        };

        let skip_malformed = overrides.skip_malformed
            || self
                .input
                .as_ref()
                .and_then(|input| input.skip_malformed)
                .unwrap_or(false);

        Ok(ResolvedConfig {
            forest: forest_settings,
            split: SplitSettings {
                test_fraction: TestFraction::new(test_size)?,
                seed,
            },
            skip_malformed,
        })
    }
}

fn parse_env<T, F>(var: &'static str, lookup: &F) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::Env { var, value: raw })
}

fn explicit_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".hostprint").join("config.toml"))
}
