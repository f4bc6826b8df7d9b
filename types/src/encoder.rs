//! Categorical label encoding.

use std::collections::BTreeSet;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("cannot fit a label encoder on zero values")]
    Empty,
    #[error("label '{0}' was not seen when the encoder was fitted")]
    Unseen(String),
}

/// Maps string labels to dense indices.
///
/// Classes are the sorted unique fitted values, so index assignment does not
/// depend on input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(values: I) -> Result<Self, EncoderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();
        if unique.is_empty() {
            return Err(EncoderError::Empty);
        }
        Ok(Self {
            classes: unique.into_iter().collect(),
        })
    }

    #[must_use]
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .ok()
    }

    pub fn transform<I, S>(&self, labels: I) -> Result<Vec<usize>, EncoderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| {
                let label = label.as_ref();
                self.encode(label)
                    .ok_or_else(|| EncoderError::Unseen(label.to_string()))
            })
            .collect()
    }

    #[must_use]
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always false; a fitted encoder holds at least one class.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
