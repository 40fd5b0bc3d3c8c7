//! Two-letter language code encoding (Format v1.1: `consentLanguage`).
//!
//! Each letter maps to its alphabet index (`A` = 0 … `Z` = 25) and occupies
//! half the declared field width (6 bits per letter at the schema's 12-bit
//! width). Encoding is case-insensitive; decoding produces a lower-case code.

use crate::bitstream::{BitReader, BitWriter};
use crate::{integer, Error, Result};

/// Checks that `code` is a two-letter ASCII language code.
///
/// Wird vor dem Encoding aufgerufen (Input-Validierung), bevor irgendein
/// Bit geschrieben wird.
pub fn validate(code: &str) -> Result<()> {
    let bytes = code.as_bytes();
    if bytes.len() == 2 && bytes.iter().all(u8::is_ascii_alphabetic) {
        Ok(())
    } else {
        Err(Error::InvalidLanguage(code.to_string()))
    }
}

/// Encodes a two-letter language code into `width` bits (`width / 2` per
/// letter).
pub fn encode(writer: &mut BitWriter, code: &str, width: usize) -> Result<()> {
    validate(code)?;
    let half = width / 2;
    for byte in code.bytes() {
        let index = u64::from(byte.to_ascii_uppercase() - b'A');
        integer::encode(writer, index, half);
    }
    Ok(())
}

/// Decodes a two-letter language code from `width` bits, splitting the run
/// in half and mapping each half back to a letter.
pub fn decode(reader: &mut BitReader, width: usize) -> Result<String> {
    let half = width / 2;
    let mut code = String::with_capacity(2);
    for _ in 0..2 {
        let index = integer::decode(reader, half)?;
        if index > 25 {
            return Err(Error::InvalidLanguage(format!("letter index {index}")));
        }
        code.push((b'a' + index as u8) as char);
    }
    Ok(code)
}
