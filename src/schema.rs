//! The consent string schemas as static field tables (Format v1.1).
//!
//! Version 1 is the only published schema. The field order in [`V1_FIELDS`]
//! is the authoritative wire bit order:
//!
//! version(6) · created(36) · lastUpdated(36) · cmpId(12) · cmpVersion(12) ·
//! consentScreen(6) · consentLanguage(12) · vendorListVersion(12) ·
//! purposeIdBitString(24) · maxVendorId(16) · isRange(1) ·
//! \[!isRange\] vendorIdBitString(maxVendorId) ·
//! \[isRange\] defaultConsent(1) · numEntries(12) ·
//! numEntries × { isRange(1) · startVendorId(16) · \[isRange\] endVendorId(16) }

use crate::field::{Field, FieldKind, FieldMap, Width};

/// Bit width of the leading version field, shared by all schema versions.
pub const VERSION_BITS: usize = 6;

/// Bit length of the fixed (non-vendor) part of a version-1 record:
/// everything up to and including the `isRange` flag.
pub const V1_FIXED_BITS: usize = 173;

// --- Prädikate und abgeleitete Breiten (lesen nur früher dekodierte Felder) ---

fn bitmap_branch(record: &FieldMap) -> bool {
    !record.bool("isRange").unwrap_or(false)
}

fn range_branch(record: &FieldMap) -> bool {
    record.bool("isRange").unwrap_or(false)
}

fn vendor_bitmap_width(record: &FieldMap) -> usize {
    record.int("maxVendorId").unwrap_or(0) as usize
}

fn entry_count(record: &FieldMap) -> usize {
    record.int("numEntries").unwrap_or(0) as usize
}

/// One vendor range entry: a single vendor ID or an inclusive ID block,
/// gated on the entry's own `isRange` flag.
static RANGE_ENTRY_FIELDS: &[Field] = &[
    Field {
        name: "isRange",
        kind: FieldKind::Bool,
        presence: None,
    },
    Field {
        name: "startVendorId",
        kind: FieldKind::Int(Width::Fixed(16)),
        presence: None,
    },
    Field {
        name: "endVendorId",
        kind: FieldKind::Int(Width::Fixed(16)),
        presence: Some(range_branch),
    },
];

/// The version-1 consent record.
pub static V1_FIELDS: &[Field] = &[
    Field {
        name: "version",
        kind: FieldKind::Int(Width::Fixed(VERSION_BITS)),
        presence: None,
    },
    Field {
        name: "created",
        kind: FieldKind::Date(Width::Fixed(36)),
        presence: None,
    },
    Field {
        name: "lastUpdated",
        kind: FieldKind::Date(Width::Fixed(36)),
        presence: None,
    },
    Field {
        name: "cmpId",
        kind: FieldKind::Int(Width::Fixed(12)),
        presence: None,
    },
    Field {
        name: "cmpVersion",
        kind: FieldKind::Int(Width::Fixed(12)),
        presence: None,
    },
    Field {
        name: "consentScreen",
        kind: FieldKind::Int(Width::Fixed(6)),
        presence: None,
    },
    Field {
        name: "consentLanguage",
        kind: FieldKind::Language(Width::Fixed(12)),
        presence: None,
    },
    Field {
        name: "vendorListVersion",
        kind: FieldKind::Int(Width::Fixed(12)),
        presence: None,
    },
    Field {
        name: "purposeIdBitString",
        kind: FieldKind::Bits(Width::Fixed(24)),
        presence: None,
    },
    Field {
        name: "maxVendorId",
        kind: FieldKind::Int(Width::Fixed(16)),
        presence: None,
    },
    Field {
        name: "isRange",
        kind: FieldKind::Bool,
        presence: None,
    },
    // Bitmap-Zweig: ein Bit pro Vendor-ID, Breite = maxVendorId
    Field {
        name: "vendorIdBitString",
        kind: FieldKind::Bits(Width::Derived(vendor_bitmap_width)),
        presence: Some(bitmap_branch),
    },
    // Range-Zweig: Default-Consent-Flag plus Range-Liste
    Field {
        name: "defaultConsent",
        kind: FieldKind::Bool,
        presence: Some(range_branch),
    },
    Field {
        name: "numEntries",
        kind: FieldKind::Int(Width::Fixed(12)),
        presence: Some(range_branch),
    },
    Field {
        name: "vendorRangeList",
        kind: FieldKind::List {
            count: entry_count,
            fields: RANGE_ENTRY_FIELDS,
        },
        presence: Some(range_branch),
    },
];

/// Returns the field list for a schema version, or `None` for versions this
/// crate does not know.
pub fn fields_for_version(version: u8) -> Option<&'static [Field]> {
    match version {
        1 => Some(V1_FIELDS),
        _ => None,
    }
}
