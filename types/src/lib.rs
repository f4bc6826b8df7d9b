//! Core domain types for hostprint.
//!
//! This crate contains pure domain types with no IO and minimal dependencies:
//! the raw handshake record as it appears on disk, the extracted feature row,
//! label encoding, resolved training settings, and the emitted prediction.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod encoder;
mod features;
mod prediction;
mod record;
mod settings;

pub use encoder::{EncoderError, LabelEncoder};
pub use features::{FEATURE_NAMES, FeatureRow, FeatureVector, N_FEATURES, UNKNOWN_OS};
pub use prediction::Prediction;
pub use record::HandshakeRecord;
pub use settings::{
    DepthLimit, ForestSettings, MaxFeatures, Sampling, SettingsError, SplitSettings,
    TestFraction, TreeCount,
};
