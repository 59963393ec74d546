//! Formatting helpers shared by findings

/// `53000` -> `53,000`
pub(crate) fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// First `len` characters of a hash followed by an ellipsis
pub(crate) fn abbreviate(hash: &str, len: usize) -> String {
    if hash.chars().count() <= len {
        return hash.to_string();
    }
    let prefix: String = hash.chars().take(len).collect();
    format!("{}...", prefix)
}

pub(crate) fn opt_count(n: Option<u64>) -> String {
    n.map(thousands).unwrap_or_else(|| "n/a".to_string())
}
