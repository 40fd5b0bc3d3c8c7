//! Timestamp encoding (Format v1.1: `created`, `lastUpdated`).
//!
//! A moment in time is stored as an unsigned count of deciseconds (100 ms
//! ticks) since the Unix epoch, width-limited exactly like an integer field.
//! The 36 bits of schema version 1 cover the years 1970 to roughly 2187.

use chrono::{DateTime, TimeZone, Utc};

use crate::bitstream::{BitReader, BitWriter};
use crate::{integer, Error, Result};

/// Milliseconds per wire tick.
const TICK_MS: i64 = 100;

/// Encodes a timestamp as deciseconds since the epoch in `width` bits.
///
/// Sub-Tick-Präzision (einzelne Millisekunden) wird abgeschnitten;
/// Zeitpunkte vor der Epoche werden auf Tick 0 geklemmt (das Wire-Feld ist
/// ein vorzeichenloser Zähler).
pub fn encode(writer: &mut BitWriter, date: &DateTime<Utc>, width: usize) {
    let ticks = date.timestamp_millis().div_euclid(TICK_MS).max(0) as u64;
    integer::encode(writer, ticks, width);
}

/// Decodes a timestamp from `width` bits of deciseconds since the epoch.
pub fn decode(reader: &mut BitReader, width: usize) -> Result<DateTime<Utc>> {
    let ticks = integer::decode(reader, width)?;
    from_ticks(ticks)
}

/// Converts a decisecond tick count into a `DateTime<Utc>`.
pub fn from_ticks(ticks: u64) -> Result<DateTime<Utc>> {
    let millis = i64::try_from(ticks)
        .ok()
        .and_then(|t| t.checked_mul(TICK_MS))
        .ok_or(Error::TimestampOutOfRange(ticks))?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(Error::TimestampOutOfRange(ticks))
}
