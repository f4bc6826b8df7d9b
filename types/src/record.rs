//! Raw handshake record, one per input line.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single capture as exported by the fingerprinting collector.
///
/// Every section is kept as a raw [`Value`]: collectors disagree on which
/// sub-fields they emit, and a missing or oddly shaped section must never
/// fail parsing. Feature extraction decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandshakeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http2: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcpip: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_prediction: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js_fingerprint: Option<Value>,
    /// Flattened exports put the fingerprint under a dotted top-level key.
    #[serde(
        default,
        rename = "js_fingerprint.fingerprint",
        skip_serializing_if = "Option::is_none"
    )]
    pub flat_fingerprint: Option<Value>,
}

impl HandshakeRecord {
    /// The host address, if present as a string.
    #[must_use]
    pub fn ip_str(&self) -> Option<&str> {
        self.ip.as_ref().and_then(Value::as_str)
    }

    /// The JS fingerprint, preferring the nested form over the flattened key.
    ///
    /// JSON `null` counts as absent.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&Value> {
        self.js_fingerprint
            .as_ref()
            .and_then(|js| js.get("fingerprint"))
            .filter(|v| !v.is_null())
            .or_else(|| self.flat_fingerprint.as_ref().filter(|v| !v.is_null()))
    }
}
