//! Shared fixtures: synthetic handshake captures written as JSON lines.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// One complete handshake record with the shape a capture server emits.
pub fn handshake(ip: &str, os: &str, tls_version: &str, ciphers: usize, ttl: u64) -> Value {
    json!({
        "ip": ip,
        "js_fingerprint": { "fingerprint": format!("fp-{ip}") },
        "tls": {
            "tls_version_negotiated": tls_version,
            "ciphers": (0..ciphers).map(|i| format!("cipher-{i}")).collect::<Vec<_>>(),
            "extensions": [{ "name": "server_name" }, { "name": "supported_groups" }]
        },
        "http2": { "sent_frames": [{ "frame_type": "SETTINGS", "length": 18 }] },
        "tcpip": { "ip": { "ttl": ttl } },
        "os_prediction": { "highest": os }
    })
}

/// Two cleanly separable host families, `per_class` hosts each.
pub fn two_family_capture(per_class: usize) -> Vec<Value> {
    let mut records = Vec::with_capacity(per_class * 2);
    for i in 0..per_class {
        records.push(handshake(&format!("10.0.0.{i}"), "Linux", "772", 17, 64));
        records.push(handshake(&format!("10.0.1.{i}"), "Windows", "771", 31, 128));
    }
    records
}

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_jsonl(&self, name: &str, records: &[Value]) -> PathBuf {
        let body: String = records.iter().map(|r| format!("{r}\n")).collect();
        self.write(name, &body)
    }

    pub fn write(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, body).expect("write fixture");
        path
    }
}

pub fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).expect("read output");
    serde_json::from_str(&text).expect("output is JSON")
}
