//! Field-schema engine, decode direction.
//!
//! Decoding is a strict left-to-right fold over the field list carrying a
//! growing accumulator record: presence predicates, derived widths and
//! repeat counts of later fields see exactly the fields decoded before them.
//! This ordering dependency is load-bearing — the field list must never be
//! reordered or decoded in parallel.

use crate::bitstream::BitReader;
use crate::field::{Field, FieldKind, FieldMap, Value};
use crate::{boolean, integer, language, timestamp, Result};

/// Decodes one record of `fields` from the reader, advancing its cursor.
///
/// Ein Feld mit falschem Presence-Prädikat fehlt im Ergebnis komplett und
/// bewegt den Cursor nicht (auch kein Null-Breiten-Read).
pub fn decode_fields(reader: &mut BitReader, fields: &[Field]) -> Result<FieldMap> {
    let mut record = FieldMap::new();
    for field in fields {
        decode_field(reader, &mut record, field)?;
    }
    Ok(record)
}

fn decode_field(reader: &mut BitReader, record: &mut FieldMap, field: &Field) -> Result<()> {
    if let Some(presence) = field.presence {
        if !presence(record) {
            return Ok(());
        }
    }

    let value = match &field.kind {
        FieldKind::Int(width) => Value::Int(integer::decode(reader, width.resolve(record))?),
        FieldKind::Bool => Value::Bool(boolean::decode(reader)?),
        FieldKind::Date(width) => Value::Date(timestamp::decode(reader, width.resolve(record))?),
        FieldKind::Bits(width) => Value::Bits(reader.read_bitstring(width.resolve(record))?),
        FieldKind::Language(width) => {
            Value::Language(language::decode(reader, width.resolve(record))?)
        }
        FieldKind::List { count, fields } => {
            // Count gegen den Akkumulator wie bisher dekodiert, dann so viele
            // Elemente hintereinander auf dem gemeinsamen Cursor.
            let n = count(record);
            let mut items = Vec::with_capacity(n);
            for _ in 0..n {
                items.push(decode_fields(reader, fields)?);
            }
            Value::List(items)
        }
    };
    record.set(field.name, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::BitWriter;
    use crate::field::Width;

    fn int_field(name: &'static str, width: usize) -> Field {
        Field {
            name,
            kind: FieldKind::Int(Width::Fixed(width)),
            presence: None,
        }
    }

    #[test]
    fn decodes_fields_in_declared_order() {
        let fields = [int_field("a", 4), int_field("b", 4)];
        let mut r = BitReader::new(&[0xAB]);
        let record = decode_fields(&mut r, &fields).unwrap();
        assert_eq!(record.int("a"), Some(0xA));
        assert_eq!(record.int("b"), Some(0xB));
        assert_eq!(r.bit_position(), 8);
    }

    #[test]
    fn later_fields_see_earlier_decoded_values() {
        fn width_of_n(record: &FieldMap) -> usize {
            record.int("n").unwrap_or(0) as usize
        }
        let fields = [
            int_field("n", 8),
            Field {
                name: "payload",
                kind: FieldKind::Bits(Width::Derived(width_of_n)),
                presence: None,
            },
        ];

        let mut w = BitWriter::new();
        w.write_bits(3, 8);
        w.write_bits(0b101, 3);
        let data = w.into_vec();

        let mut r = BitReader::new(&data);
        let record = decode_fields(&mut r, &fields).unwrap();
        assert_eq!(record.bits("payload").unwrap().to_string(), "101");
        assert_eq!(r.bit_position(), 11);
    }

    #[test]
    fn false_presence_skips_without_moving_cursor() {
        fn gated(record: &FieldMap) -> bool {
            record.bool("flag").unwrap_or(false)
        }
        let fields = [
            Field {
                name: "flag",
                kind: FieldKind::Bool,
                presence: None,
            },
            Field {
                name: "extra",
                kind: FieldKind::Int(Width::Fixed(8)),
                presence: Some(gated),
            },
            int_field("tail", 7),
        ];

        // flag=0 → "extra" fehlt, "tail" folgt direkt auf das Flag-Bit
        let mut w = BitWriter::new();
        w.write_bit(false);
        w.write_bits(0x2A, 7);
        let data = w.into_vec();

        let mut r = BitReader::new(&data);
        let record = decode_fields(&mut r, &fields).unwrap();
        assert_eq!(record.get("extra"), None);
        assert_eq!(record.int("tail"), Some(0x2A));
        assert_eq!(r.bit_position(), 8);
    }

    #[test]
    fn list_count_reads_the_accumulator() {
        static CHILD: &[Field] = &[Field {
            name: "id",
            kind: FieldKind::Int(Width::Fixed(8)),
            presence: None,
        }];
        fn n_items(record: &FieldMap) -> usize {
            record.int("n").unwrap_or(0) as usize
        }
        let fields = [
            int_field("n", 4),
            Field {
                name: "items",
                kind: FieldKind::List {
                    count: n_items,
                    fields: CHILD,
                },
                presence: None,
            },
        ];

        let mut w = BitWriter::new();
        w.write_bits(2, 4);
        w.write_bits(7, 8);
        w.write_bits(9, 8);
        let data = w.into_vec();

        let mut r = BitReader::new(&data);
        let record = decode_fields(&mut r, &fields).unwrap();
        let items = record.list("items").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].int("id"), Some(7));
        assert_eq!(items[1].int("id"), Some(9));
        assert_eq!(r.bit_position(), 20);
    }

    #[test]
    fn nested_presence_reads_the_nested_record() {
        // Entry-Schema wie die Vendor-Ranges: end nur wenn das eigene
        // isRange-Bit gesetzt ist.
        fn entry_is_range(record: &FieldMap) -> bool {
            record.bool("isRange").unwrap_or(false)
        }
        static ENTRY: &[Field] = &[
            Field {
                name: "isRange",
                kind: FieldKind::Bool,
                presence: None,
            },
            Field {
                name: "start",
                kind: FieldKind::Int(Width::Fixed(8)),
                presence: None,
            },
            Field {
                name: "end",
                kind: FieldKind::Int(Width::Fixed(8)),
                presence: Some(entry_is_range),
            },
        ];
        fn two(_: &FieldMap) -> usize {
            2
        }
        let fields = [Field {
            name: "items",
            kind: FieldKind::List {
                count: two,
                fields: ENTRY,
            },
            presence: None,
        }];

        let mut w = BitWriter::new();
        // Entry 1: Range 3..7
        w.write_bit(true);
        w.write_bits(3, 8);
        w.write_bits(7, 8);
        // Entry 2: Singleton 9
        w.write_bit(false);
        w.write_bits(9, 8);
        let data = w.into_vec();

        let mut r = BitReader::new(&data);
        let record = decode_fields(&mut r, &fields).unwrap();
        let items = record.list("items").unwrap();
        assert_eq!(items[0].int("end"), Some(7));
        assert_eq!(items[1].int("end"), None);
        assert_eq!(r.bit_position(), 26);
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let fields = [int_field("a", 16)];
        let mut r = BitReader::new(&[0xFF]);
        assert_eq!(
            decode_fields(&mut r, &fields).unwrap_err(),
            crate::Error::PrematureEndOfStream
        );
    }
}
