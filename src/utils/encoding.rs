//! Encoding-tolerant source reading.
//!
//! Repositories accumulate files in odd encodings; indexing must not fall over
//! on them. Strategy: UTF-8 fast path (with BOM stripping), then chardetng
//! detection with an encoding_rs lossy decode.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chardetng::EncodingDetector;

/// Read a source file as text, decoding non-UTF-8 content best-effort.
pub fn read_source_file(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed reading source file: {}", path.display()))?;

    let bytes = match bytes.strip_prefix(&[0xef, 0xbb, 0xbf]) {
        Some(rest) => rest,
        None => &bytes[..],
    };

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(bytes);
    Ok(decoded.into_owned())
}
