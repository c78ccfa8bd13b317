//! Best-effort HTML decoding
//!
//! Pages are served with a variety of encodings and not always with a
//! matching `Content-Type`. The body is sniffed the way browsers do it:
//! byte-order mark, then an in-document charset declaration, then UTF-8,
//! then windows-1252.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::bytes::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// How far into the document a charset declaration is looked for.
const SNIFF_LIMIT: usize = 1024;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).expect("valid regex")
});

/// No candidate encoding decoded the document cleanly.
#[derive(Debug, Error)]
#[error("Failed to detect encoding, tried [{}]", tried.join(", "))]
pub struct DecodeError {
    /// Names of the encodings attempted, in order
    pub tried: Vec<&'static str>,
}

/// Decodes an HTML body to text
///
/// # Errors
///
/// Returns a [`DecodeError`] listing the encodings tried when none of them
/// decodes the body without replacement characters.
pub fn decode_html(bytes: &[u8]) -> Result<String, DecodeError> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_length..]) {
            return Ok(text.into_owned());
        }
    }

    let mut candidates: Vec<&'static Encoding> = Vec::with_capacity(3);
    if let Some(declared) = declared_encoding(bytes) {
        candidates.push(declared);
    }
    for fallback in [UTF_8, WINDOWS_1252] {
        if !candidates.contains(&fallback) {
            candidates.push(fallback);
        }
    }

    for encoding in &candidates {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            return Ok(text.into_owned());
        }
    }

    Err(DecodeError {
        tried: candidates.iter().map(|e| e.name()).collect(),
    })
}

/// Encoding named by a `<meta charset>` or `http-equiv` declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(SNIFF_LIMIT)];
    let label = META_CHARSET.captures(head)?.get(1)?;
    let encoding = Encoding::for_label(label.as_bytes())?;

    // A page can only be decoded with an ASCII-compatible encoding if it
    // declared itself in ASCII, which rules out UTF-16.
    if encoding.is_ascii_compatible() {
        Some(encoding)
    } else {
        Some(UTF_8)
    }
}
