//! The URL-safe base64 token boundary.
//!
//! The packed bit string becomes the externally visible token via URL-safe
//! base64: the standard alphabet with `+` → `-` and `/` → `_`, trailing `=`
//! stripped. The codec consumes the base64 machinery as a black box.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::{Error, Result};

/// Encodes padded record bytes as a web-safe token.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes a web-safe token back into record bytes.
///
/// Akzeptiert großzügig, was kompatible Encoder historisch produziert haben:
/// Tokens mit `=`-Padding und Tokens im Standard-Alphabet (`+`, `/`).
pub fn decode(consent_token: &str) -> Result<Vec<u8>> {
    let normalized = consent_token
        .trim_end_matches('=')
        .replace('+', "-")
        .replace('/', "_");
    URL_SAFE_NO_PAD
        .decode(normalized)
        .map_err(|e| Error::MalformedToken(e.to_string()))
}
