//! Deduplication and feature extraction.
//!
//! Order is fixed: duplicates are removed from the raw records first, then
//! features are extracted, then rows with any missing feature are dropped.
//! A duplicate that happens to be complete therefore never replaces an
//! earlier incomplete record with the same key.

use std::collections::HashSet;

use hostprint_types::{FeatureRow, HandshakeRecord, UNKNOWN_OS};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessStats {
    pub input: usize,
    pub duplicates: usize,
    pub incomplete: usize,
    pub kept: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    pub rows: Vec<FeatureRow>,
    pub stats: PreprocessStats,
}

pub fn preprocess(records: &[HandshakeRecord]) -> Preprocessed {
    let unique = deduplicate(records);
    let duplicates = records.len() - unique.len();

    let rows: Vec<FeatureRow> = unique.iter().filter_map(|r| extract_features(r)).collect();
    let stats = PreprocessStats {
        input: records.len(),
        duplicates,
        incomplete: unique.len() - rows.len(),
        kept: rows.len(),
    };

    info!(
        input = stats.input,
        duplicates = stats.duplicates,
        incomplete = stats.incomplete,
        kept = stats.kept,
        "Preprocessed records"
    );
    Preprocessed { rows, stats }
}

/// Keep the first record for each `(ip, fingerprint)` pair, in input order.
///
/// Absent values are a key of their own, so records lacking both an address
/// and a fingerprint collapse into one.
pub fn deduplicate(records: &[HandshakeRecord]) -> Vec<&HandshakeRecord> {
    let mut seen: HashSet<(Option<String>, Option<String>)> = HashSet::new();
    records
        .iter()
        .filter(|record| {
            let key = (
                record.ip.as_ref().filter(|v| !v.is_null()).map(Value::to_string),
                record.fingerprint().map(Value::to_string),
            );
            seen.insert(key)
        })
        .collect()
}

/// Derive a [`FeatureRow`], or `None` if any feature is missing.
///
/// - `tls_version`: `tls.tls_version_negotiated` (string or number)
/// - `num_ciphers` / `num_extensions`: lengths of `tls.ciphers` / `tls.extensions`, 0 if absent
/// - `http2_window_size`: `http2.sent_frames[0].length`, 0 if there is no such frame or field
/// - `tcp_ttl`: `tcpip.ip.ttl`
/// - `os_label`: `os_prediction.highest`, `"Unknown"` if absent
///
/// A field present with a `null` or unusable value counts as missing, unlike
/// an absent one.
#[must_use]
pub fn extract_features(record: &HandshakeRecord) -> Option<FeatureRow> {
    let tls = record.tls.as_ref();

    Some(FeatureRow {
        ip: record.ip_str()?.to_string(),
        tls_version: tls_version(tls?)?,
        num_ciphers: array_len(tls, "ciphers"),
        num_extensions: array_len(tls, "extensions"),
        http2_window_size: first_frame_length(record.http2.as_ref())?,
        tcp_ttl: ttl(record.tcpip.as_ref()?)?,
        os_label: os_label(record.os_prediction.as_ref())?,
    })
}

fn tls_version(tls: &Value) -> Option<String> {
    match tls.get("tls_version_negotiated")? {
        Value::String(version) => Some(version.clone()),
        Value::Number(version) => Some(version.to_string()),
        _ => None,
    }
}

fn array_len(section: Option<&Value>, key: &str) -> u32 {
    section
        .and_then(|s| s.get(key))
        .and_then(Value::as_array)
        .map_or(0, |items| u32::try_from(items.len()).unwrap_or(u32::MAX))
}

fn first_frame_length(http2: Option<&Value>) -> Option<u64> {
    let frame = http2
        .and_then(|h| h.get("sent_frames"))
        .and_then(Value::as_array)
        .and_then(|frames| frames.first());
    match frame.and_then(|f| f.get("length")) {
        None => Some(0),
        Some(length) => as_count(length),
    }
}

fn ttl(tcpip: &Value) -> Option<u32> {
    let raw = tcpip.get("ip")?.get("ttl")?;
    as_count(raw).and_then(|ttl| u32::try_from(ttl).ok())
}

fn os_label(prediction: Option<&Value>) -> Option<String> {
    match prediction.and_then(|p| p.get("highest")) {
        None => Some(UNKNOWN_OS.to_string()),
        Some(Value::String(label)) => Some(label.clone()),
        Some(_) => None,
    }
}

/// Non-negative integer, accepting integral floats such as `64.0`.
fn as_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}
