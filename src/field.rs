//! Field-descriptor model: the consent string schema as static data.
//!
//! A schema version is an ordered list of [`Field`]s; the field order is the
//! authoritative bit order on the wire. Widths, presence predicates and
//! repeat counts that depend on earlier fields are plain `fn` pointers over
//! the partially-decoded record, so a whole schema lives in a `static`
//! table (see [`crate::schema`]).

use chrono::{DateTime, Utc};

use crate::bitstream::BitString;

/// Bit width of a field: fixed, or derived from already-decoded fields
/// (e.g. the vendor bitmap is `maxVendorId` bits wide).
#[derive(Clone, Copy)]
pub enum Width {
    Fixed(usize),
    Derived(fn(&FieldMap) -> usize),
}

impl Width {
    /// Resolves the width against the partially-decoded record.
    pub fn resolve(&self, record: &FieldMap) -> usize {
        match self {
            Self::Fixed(width) => *width,
            Self::Derived(f) => f(record),
        }
    }
}

/// The value kind of a field, together with its width information.
pub enum FieldKind {
    /// Unsigned integer, left-padded / right-truncated to width.
    Int(Width),
    /// Single-bit boolean.
    Bool,
    /// Deciseconds-since-epoch timestamp.
    Date(Width),
    /// Raw bit run, right-padded / truncated to width.
    Bits(Width),
    /// Two-letter language code, `width / 2` bits per letter.
    Language(Width),
    /// Repeated nested record; `count` is evaluated against the record as
    /// decoded so far, then `count` elements are coded against `fields`.
    List {
        count: fn(&FieldMap) -> usize,
        fields: &'static [Field],
    },
}

impl FieldKind {
    /// Human-readable kind name used in schema-mismatch errors.
    pub(crate) fn expected(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Bool => "boolean",
            Self::Date(_) => "timestamp",
            Self::Bits(_) => "bit string",
            Self::Language(_) => "language code",
            Self::List { .. } => "list",
        }
    }
}

/// One field of a schema: name, kind, and an optional presence predicate.
///
/// Ein Feld mit Presence-Prädikat belegt genau dann Bits, wenn das Prädikat
/// über dem (teilweise dekodierten) Record wahr ist; andernfalls wird es auf
/// beiden Seiten komplett übersprungen und der Cursor bewegt sich nicht.
/// Decode-seitig darf das Prädikat nur Felder lesen, die in der Liste
/// früher stehen.
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Option<fn(&FieldMap) -> bool>,
}

/// A decoded (or to-be-encoded) field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(u64),
    Bool(bool),
    Date(DateTime<Utc>),
    Bits(BitString),
    Language(String),
    List(Vec<FieldMap>),
}

/// An ordered field-name → [`Value`] map.
///
/// Insertion order entspricht der Feld-Reihenfolge; die Engine baut die Map
/// beim Dekodieren inkrementell auf, damit spätere Prädikate und Breiten
/// die früher dekodierten Werte sehen (strikte Links-nach-rechts-Faltung).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMap {
    entries: Vec<(&'static str, Value)>,
}

impl FieldMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any existing entry of that name.
    pub fn set(&mut self, name: &'static str, value: Value) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Returns the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// `true` when no field has been set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // --- Typed accessors (None when absent or of a different kind) ---

    pub fn int(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(Value::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.get(name) {
            Some(Value::Date(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn bits(&self, name: &str) -> Option<&BitString> {
        match self.get(name) {
            Some(Value::Bits(v)) => Some(v),
            _ => None,
        }
    }

    pub fn language(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Language(v)) => Some(v),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[FieldMap]> {
        match self.get(name) {
            Some(Value::List(v)) => Some(v),
            _ => None,
        }
    }
}
