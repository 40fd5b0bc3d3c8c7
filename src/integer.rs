//! n-bit unsigned integer encoding (Format v1.1, all int fields).
//!
//! Every integer field of the consent string occupies a fixed declared
//! width. Values are left-padded with zero bits; a value whose natural
//! binary representation exceeds the declared width is truncated from the
//! right (low-order bits dropped). The truncation is silent and part of the
//! wire contract — callers must ensure `value < 2^width` to avoid data loss.

use crate::bitstream::{BitReader, BitWriter};
use crate::Result;

/// Encodes a non-negative integer using exactly `width` bits.
///
/// Überbreite Werte werden auf die obersten `width` Bits gekürzt (ein
/// Kompatibilitäts-Verhalten des Formats, kein Fehler). Der Datenverlust
/// wird als Debug-Meldung protokolliert.
pub fn encode(writer: &mut BitWriter, value: u64, width: usize) {
    if width == 0 {
        return;
    }
    let natural = natural_bit_length(value);
    if natural > width {
        log::debug!(
            "integer {value} needs {natural} bits, truncated to the top {width} bits"
        );
        writer.write_bits(value >> (natural - width), width as u8);
        return;
    }
    // Pad-left: führende Null-Bits bis zur deklarierten Breite.
    if width > 64 {
        for _ in 0..width - 64 {
            writer.write_bit(false);
        }
        writer.write_bits(value, 64);
    } else {
        writer.write_bits(value, width as u8);
    }
}

/// Decodes an unsigned integer from exactly `width` bits.
///
/// # Panics
///
/// Panics if `width > 64`.
pub fn decode(reader: &mut BitReader, width: usize) -> Result<u64> {
    assert!(width <= 64, "bit width must be 0..=64, got {width}");
    reader.read_bits(width as u8)
}

/// Number of bits in the natural binary representation of `value`
/// (1 for the value 0, matching `0 -> "0"`).
fn natural_bit_length(value: u64) -> usize {
    if value == 0 {
        1
    } else {
        64 - value.leading_zeros() as usize
    }
}
