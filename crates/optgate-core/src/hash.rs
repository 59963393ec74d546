//! Canonical output hashing
//!
//! The output hash is a digest over a canonical JSON rendering of the output
//! records: object keys sorted at every depth, `", "` between items, `": "`
//! between key and value, non-ASCII escaped as `\uXXXX`. Row order is part
//! of the hashed content. Integers are written as-is; floats use the
//! shortest round-trip digits, in exponent form (`1e-05`, `1.5e+16`) when
//! the decimal exponent is below -4 or at least 16, and always carry a
//! fractional part otherwise (`100.0`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::report::Record;

/// Hex length of every supported digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Digest algorithm used for `output_hash`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[default]
    #[serde(rename = "SHA256", alias = "sha256")]
    Sha256,
    #[serde(rename = "BLAKE3", alias = "blake3")]
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "SHA256"),
            HashAlgorithm::Blake3 => write!(f, "BLAKE3"),
        }
    }
}

impl HashAlgorithm {
    /// Lowercase hex digest of `bytes`
    pub fn digest_hex(&self, bytes: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => format!("{:x}", Sha256::digest(bytes)),
            HashAlgorithm::Blake3 => blake3::hash(bytes).to_hex().to_string(),
        }
    }
}

/// Hash an ordered sequence of output records
pub fn output_hash(records: &[Record], algorithm: HashAlgorithm) -> String {
    algorithm.digest_hex(canonical_records(records).as_bytes())
}

/// Canonical rendering of an ordered sequence of records
pub fn canonical_records(records: &[Record]) -> String {
    let mut out = String::with_capacity(records.len() * 64);
    out.push('[');
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_object(&mut out, record);
    }
    out.push(']');
    out
}

/// Canonical rendering of a single JSON value
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// True when `s` looks like a digest produced by [`output_hash`]
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => match n.as_f64().filter(|_| n.is_f64()) {
            Some(f) => write_float(out, f),
            None => out.push_str(&n.to_string()),
        },
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => write_object(out, map),
    }
}

fn write_float(out: &mut String, f: f64) {
    let sci = format!("{:e}", f);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..16).contains(&exp) {
        let fixed = f.to_string();
        out.push_str(&fixed);
        if !fixed.contains('.') {
            out.push_str(".0");
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        out.push_str(&format!("{}e{}{:02}", mantissa, sign, exp.abs()));
    }
}

fn write_object(out: &mut String, map: &serde_json::Map<String, Value>) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_string(out, key);
        out.push_str(": ");
        write_value(out, value);
    }
    out.push('}');
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (' '..='~').contains(&c) => out.push(c),
            c => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out.push('"');
}
