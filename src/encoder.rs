//! Field-schema engine, encode direction.
//!
//! Walks a field list in declared order and serializes the input record into
//! the bit writer. A field whose presence predicate evaluates false against
//! the input contributes zero bits; derived widths resolve against the input
//! record. Nested lists encode each element against the child field list in
//! encounter order.

use crate::bitstream::BitWriter;
use crate::field::{Field, FieldKind, FieldMap, Value};
use crate::{boolean, integer, language, timestamp, Error, Result};

/// Encodes `input` against `fields`, appending to `writer`.
pub fn encode_fields(writer: &mut BitWriter, input: &FieldMap, fields: &[Field]) -> Result<()> {
    for field in fields {
        encode_field(writer, input, field)?;
    }
    Ok(())
}

/// Encodes a single field.
///
/// Ein im Input fehlender Skalar wird als Null-Bits der deklarierten Breite
/// encodiert (Metadata-Strings verlassen sich darauf); eine fehlende Liste
/// encodiert als leer. Ein Wert der falschen Art ist ein fataler
/// Schema-Definitionsfehler und bricht den gesamten Aufruf ab.
fn encode_field(writer: &mut BitWriter, input: &FieldMap, field: &Field) -> Result<()> {
    if let Some(presence) = field.presence {
        if !presence(input) {
            return Ok(());
        }
    }

    let value = input.get(field.name);
    match (&field.kind, value) {
        (FieldKind::Int(width), Some(Value::Int(v))) => {
            integer::encode(writer, *v, width.resolve(input));
        }
        (FieldKind::Int(width), None) => zero_fill(writer, width.resolve(input)),

        (FieldKind::Bool, Some(Value::Bool(v))) => boolean::encode(writer, *v),
        (FieldKind::Bool, None) => boolean::encode(writer, false),

        (FieldKind::Date(width), Some(Value::Date(v))) => {
            timestamp::encode(writer, v, width.resolve(input));
        }
        (FieldKind::Date(width), None) => zero_fill(writer, width.resolve(input)),

        (FieldKind::Bits(width), Some(Value::Bits(v))) => {
            writer.write_bitstring(&v.resized(width.resolve(input)));
        }
        (FieldKind::Bits(width), None) => zero_fill(writer, width.resolve(input)),

        (FieldKind::Language(width), Some(Value::Language(v))) => {
            language::encode(writer, v, width.resolve(input))?;
        }
        (FieldKind::Language(width), None) => zero_fill(writer, width.resolve(input)),

        (FieldKind::List { fields, .. }, Some(Value::List(items))) => {
            for item in items {
                encode_fields(writer, item, fields)?;
            }
        }
        (FieldKind::List { .. }, None) => {}

        (kind, Some(_)) => {
            return Err(Error::SchemaMismatch {
                field: field.name,
                expected: kind.expected(),
            });
        }
    }
    Ok(())
}

fn zero_fill(writer: &mut BitWriter, width: usize) {
    for _ in 0..width {
        writer.write_bit(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::{BitReader, BitString};
    use crate::field::Width;

    fn int_field(name: &'static str, width: usize) -> Field {
        Field {
            name,
            kind: FieldKind::Int(Width::Fixed(width)),
            presence: None,
        }
    }

    #[test]
    fn encodes_fields_in_declared_order() {
        let fields = [int_field("a", 4), int_field("b", 4)];
        let mut input = FieldMap::new();
        input.set("a", Value::Int(0xA));
        input.set("b", Value::Int(0xB));

        let mut w = BitWriter::new();
        encode_fields(&mut w, &input, &fields).unwrap();
        assert_eq!(w.into_vec(), vec![0xAB]);
    }

    #[test]
    fn false_presence_contributes_zero_bits() {
        fn never(_: &FieldMap) -> bool {
            false
        }
        let fields = [
            Field {
                name: "skipped",
                kind: FieldKind::Int(Width::Fixed(8)),
                presence: Some(never),
            },
            int_field("kept", 8),
        ];
        let mut input = FieldMap::new();
        input.set("skipped", Value::Int(0xFF));
        input.set("kept", Value::Int(0x5A));

        let mut w = BitWriter::new();
        encode_fields(&mut w, &input, &fields).unwrap();
        assert_eq!(w.into_vec(), vec![0x5A]);
    }

    #[test]
    fn presence_reads_the_input_record() {
        fn gated(input: &FieldMap) -> bool {
            input.bool("flag").unwrap_or(false)
        }
        let fields = [
            Field {
                name: "flag",
                kind: FieldKind::Bool,
                presence: None,
            },
            Field {
                name: "extra",
                kind: FieldKind::Int(Width::Fixed(7)),
                presence: Some(gated),
            },
        ];

        let mut input = FieldMap::new();
        input.set("flag", Value::Bool(true));
        input.set("extra", Value::Int(0x2A));
        let mut w = BitWriter::new();
        encode_fields(&mut w, &input, &fields).unwrap();
        assert_eq!(w.bit_position(), 8);

        let mut input = FieldMap::new();
        input.set("flag", Value::Bool(false));
        input.set("extra", Value::Int(0x2A));
        let mut w = BitWriter::new();
        encode_fields(&mut w, &input, &fields).unwrap();
        assert_eq!(w.bit_position(), 1);
    }

    #[test]
    fn derived_width_resolves_against_input() {
        fn width_of_n(input: &FieldMap) -> usize {
            input.int("n").unwrap_or(0) as usize
        }
        let fields = [
            int_field("n", 8),
            Field {
                name: "payload",
                kind: FieldKind::Bits(Width::Derived(width_of_n)),
                presence: None,
            },
        ];
        let mut input = FieldMap::new();
        input.set("n", Value::Int(3));
        input.set(
            "payload",
            Value::Bits([true, false, true].into_iter().collect()),
        );

        let mut w = BitWriter::new();
        encode_fields(&mut w, &input, &fields).unwrap();
        assert_eq!(w.bit_position(), 11);
    }

    #[test]
    fn absent_scalar_encodes_as_zero_bits() {
        let fields = [int_field("missing", 12)];
        let input = FieldMap::new();

        let mut w = BitWriter::new();
        encode_fields(&mut w, &input, &fields).unwrap();
        assert_eq!(w.bit_position(), 12);
        let data = w.into_vec();
        let mut r = BitReader::new(&data);
        assert_eq!(r.read_bits(12).unwrap(), 0);
    }

    #[test]
    fn absent_bits_field_zero_fills_declared_width() {
        let fields = [Field {
            name: "bitmap",
            kind: FieldKind::Bits(Width::Fixed(24)),
            presence: None,
        }];
        let mut w = BitWriter::new();
        encode_fields(&mut w, &FieldMap::new(), &fields).unwrap();
        assert_eq!(w.bit_position(), 24);
    }

    #[test]
    fn bits_value_is_normalized_to_width() {
        let fields = [Field {
            name: "bitmap",
            kind: FieldKind::Bits(Width::Fixed(4)),
            presence: None,
        }];
        // Zwei Bits geliefert, vier deklariert → rechts mit Nullen aufgefüllt
        let mut input = FieldMap::new();
        input.set("bitmap", Value::Bits([true, true].into_iter().collect()));
        let mut w = BitWriter::new();
        encode_fields(&mut w, &input, &fields).unwrap();
        assert_eq!(w.into_vec(), vec![0b1100_0000]);
    }

    #[test]
    fn list_encodes_elements_in_order() {
        static CHILD: &[Field] = &[Field {
            name: "id",
            kind: FieldKind::Int(Width::Fixed(8)),
            presence: None,
        }];
        fn two(_: &FieldMap) -> usize {
            2
        }
        let fields = [Field {
            name: "items",
            kind: FieldKind::List {
                count: two,
                fields: CHILD,
            },
            presence: None,
        }];

        let mut first = FieldMap::new();
        first.set("id", Value::Int(1));
        let mut second = FieldMap::new();
        second.set("id", Value::Int(2));
        let mut input = FieldMap::new();
        input.set("items", Value::List(vec![first, second]));

        let mut w = BitWriter::new();
        encode_fields(&mut w, &input, &fields).unwrap();
        assert_eq!(w.into_vec(), vec![1, 2]);
    }

    #[test]
    fn absent_list_encodes_nothing() {
        static CHILD: &[Field] = &[Field {
            name: "id",
            kind: FieldKind::Int(Width::Fixed(8)),
            presence: None,
        }];
        fn zero(_: &FieldMap) -> usize {
            0
        }
        let fields = [Field {
            name: "items",
            kind: FieldKind::List {
                count: zero,
                fields: CHILD,
            },
            presence: None,
        }];
        let mut w = BitWriter::new();
        encode_fields(&mut w, &FieldMap::new(), &fields).unwrap();
        assert_eq!(w.bit_position(), 0);
    }

    #[test]
    fn kind_value_mismatch_aborts() {
        let fields = [int_field("a", 4)];
        let mut input = FieldMap::new();
        input.set("a", Value::Bool(true));

        let mut w = BitWriter::new();
        let err = encode_fields(&mut w, &input, &fields).unwrap_err();
        assert_eq!(
            err,
            Error::SchemaMismatch {
                field: "a",
                expected: "integer"
            }
        );
    }
}
