//! Extracted feature rows.

/// Number of numeric model inputs per host.
pub const N_FEATURES: usize = 5;

/// Column order of [`FeatureVector`].
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "tls_version",
    "num_ciphers",
    "num_extensions",
    "http2_window_size",
    "tcp_ttl",
];

/// Label used when a record carries no OS guess.
pub const UNKNOWN_OS: &str = "Unknown";

pub type FeatureVector = [f64; N_FEATURES];

/// A fully populated row. Existence of a value is the proof that every
/// feature was present in the source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    pub ip: String,
    pub tls_version: String,
    pub num_ciphers: u32,
    pub num_extensions: u32,
    /// Length of the first HTTP/2 frame the client sent.
    pub http2_window_size: u64,
    pub tcp_ttl: u32,
    pub os_label: String,
}

impl FeatureRow {
    /// Numeric vector in [`FEATURE_NAMES`] order, with the TLS version
    /// replaced by its encoded class index.
    #[must_use]
    pub fn to_vector(&self, tls_version_code: usize) -> FeatureVector {
        [
            tls_version_code as f64,
            f64::from(self.num_ciphers),
            f64::from(self.num_extensions),
            self.http2_window_size as f64,
            f64::from(self.tcp_ttl),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{FEATURE_NAMES, FeatureRow};

    #[test]
    fn vector_follows_feature_name_order() {
        let row = FeatureRow {
            ip: "1.2.3.4".to_string(),
            tls_version: "TLS_VERSION_1_3".to_string(),
            num_ciphers: 17,
            num_extensions: 15,
            http2_window_size: 24,
            tcp_ttl: 64,
            os_label: "Linux".to_string(),
        };
        let v = row.to_vector(2);
        assert_eq!(v, [2.0, 17.0, 15.0, 24.0, 64.0]);
        assert_eq!(FEATURE_NAMES[4], "tcp_ttl");
    }
}
