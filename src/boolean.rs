//! Single-bit boolean encoding (Format v1.1: `isRange`, `defaultConsent`).

use crate::bitstream::{BitReader, BitWriter};
use crate::{integer, Result};

/// Encodes a boolean as a single bit. `true` = 1, `false` = 0.
pub fn encode(writer: &mut BitWriter, value: bool) {
    integer::encode(writer, u64::from(value), 1);
}

/// Decodes a boolean from a single bit.
pub fn decode(reader: &mut BitReader) -> Result<bool> {
    let bit = integer::decode(reader, 1)?;
    Ok(bit == 1)
}
