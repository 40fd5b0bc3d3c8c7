//! Consent record assembly, vendor-form selection and the public token API.
//!
//! Encoding builds both wire forms of the vendor consent — the dense bitmap
//! (`isRange = false`) and the range list (`isRange = true`) — with identical
//! shared fields, and keeps the strictly shorter bit string; ties favor the
//! bitmap form. Decoding reads the `isRange` flag (its bit position is fixed
//! by the schema and independent of the chosen form) and expands whichever
//! branch is present back into an explicit allow-list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bitstream::{BitReader, BitWriter};
use crate::field::{FieldMap, Value};
use crate::range::RangeEntry;
use crate::schema::{self, VERSION_BITS};
use crate::vendor_list::VendorList;
use crate::{decoder, encoder, integer, language, range, token, Error, Result};

/// The logical consent record: a pure value type. A token is derived on
/// demand from an immutable snapshot; nothing is cached across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentData {
    pub version: u8,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub cmp_id: u16,
    pub cmp_version: u16,
    pub consent_screen: u8,
    pub consent_language: String,
    pub vendor_list_version: u16,
    /// Highest vendor ID covered by the record. 0 bedeutet: beim Encoden aus
    /// dem Katalog bestimmen.
    pub max_vendor_id: u16,
    pub allowed_purpose_ids: Vec<u8>,
    pub allowed_vendor_ids: Vec<u16>,
}

impl Default for ConsentData {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            version: 1,
            created: now,
            last_updated: now,
            cmp_id: 0,
            cmp_version: 0,
            consent_screen: 0,
            consent_language: "en".to_string(),
            vendor_list_version: 0,
            max_vendor_id: 0,
            allowed_purpose_ids: Vec::new(),
            allowed_vendor_ids: Vec::new(),
        }
    }
}

impl ConsentData {
    /// `true` when the purpose ID is in the allow-list.
    pub fn is_purpose_allowed(&self, purpose_id: u8) -> bool {
        self.allowed_purpose_ids.contains(&purpose_id)
    }

    /// `true` when the vendor ID is in the allow-list.
    pub fn is_vendor_allowed(&self, vendor_id: u16) -> bool {
        self.allowed_vendor_ids.contains(&vendor_id)
    }
}

/// The metadata subset of a record: every field except language, purposes
/// and vendor consent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentMetadata {
    pub version: u8,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub cmp_id: u16,
    pub cmp_version: u16,
    pub consent_screen: u8,
    pub vendor_list_version: u16,
}

/// Encodes a consent record against its vendor catalog into a web-safe
/// token.
///
/// Die Sprachvalidierung läuft vor jeder Bit-Arbeit; ein `maxVendorId` von 0
/// im Record wird durch das Katalog-Maximum ersetzt. Der Range-Zweig wird
/// immer mit `defaultConsent = false` encodiert (die Einträge sind dann die
/// erlaubten IDs selbst).
pub fn encode_consent_string(data: &ConsentData, vendor_list: &VendorList) -> Result<String> {
    language::validate(&data.consent_language)?;
    let fields = schema::fields_for_version(data.version)
        .ok_or(Error::UnsupportedVersion(data.version))?;

    let max_vendor_id = if data.max_vendor_id != 0 {
        data.max_vendor_id
    } else {
        vendor_list.max_vendor_id()
    };

    let mut shared = FieldMap::new();
    shared.set("version", Value::Int(u64::from(data.version)));
    shared.set("created", Value::Date(data.created));
    shared.set("lastUpdated", Value::Date(data.last_updated));
    shared.set("cmpId", Value::Int(u64::from(data.cmp_id)));
    shared.set("cmpVersion", Value::Int(u64::from(data.cmp_version)));
    shared.set("consentScreen", Value::Int(u64::from(data.consent_screen)));
    shared.set(
        "consentLanguage",
        Value::Language(data.consent_language.clone()),
    );
    shared.set(
        "vendorListVersion",
        Value::Int(u64::from(data.vendor_list_version)),
    );
    shared.set(
        "purposeIdBitString",
        Value::Bits(range::purpose_bitmap(
            &vendor_list.purpose_ids(),
            &data.allowed_purpose_ids,
        )),
    );
    shared.set("maxVendorId", Value::Int(u64::from(max_vendor_id)));

    // Kandidat 1: Bitmap-Form
    let mut bitmap_input = shared.clone();
    bitmap_input.set("isRange", Value::Bool(false));
    bitmap_input.set(
        "vendorIdBitString",
        Value::Bits(range::vendor_bitmap(max_vendor_id, &data.allowed_vendor_ids)),
    );
    let mut bitmap_writer = BitWriter::new();
    encoder::encode_fields(&mut bitmap_writer, &bitmap_input, fields)?;

    // Kandidat 2: Range-Form
    let entries = range::to_ranges(&vendor_list.vendor_ids(), &data.allowed_vendor_ids);
    let mut range_input = shared;
    range_input.set("isRange", Value::Bool(true));
    range_input.set("defaultConsent", Value::Bool(false));
    range_input.set("numEntries", Value::Int(entries.len() as u64));
    range_input.set(
        "vendorRangeList",
        Value::List(entries.iter().map(entry_to_map).collect()),
    );
    let mut range_writer = BitWriter::new();
    encoder::encode_fields(&mut range_writer, &range_input, fields)?;

    let writer = if range_writer.bit_position() < bitmap_writer.bit_position() {
        log::debug!(
            "range form selected: {} < {} bits",
            range_writer.bit_position(),
            bitmap_writer.bit_position()
        );
        range_writer
    } else {
        log::debug!(
            "bitmap form selected: {} <= {} bits",
            bitmap_writer.bit_position(),
            range_writer.bit_position()
        );
        bitmap_writer
    };
    Ok(token::encode(&writer.into_vec()))
}

/// Decodes a web-safe token back into a consent record.
///
/// The effective vendor allow-list is reproduced regardless of which wire
/// form the encoder chose.
pub fn decode_consent_string(consent_token: &str) -> Result<ConsentData> {
    let record = decode_record(consent_token)?;

    let max_vendor_id = req_int(&record, "maxVendorId")? as u16;
    let allowed_vendor_ids = if record.bool("isRange").unwrap_or(false) {
        let entries = entries_from_map(&record)?;
        let default_consent = record.bool("defaultConsent").unwrap_or(false);
        range::from_ranges(&entries, max_vendor_id, default_consent)
    } else {
        let bits = record.bits("vendorIdBitString").ok_or(Error::SchemaMismatch {
            field: "vendorIdBitString",
            expected: "bit string",
        })?;
        range::ids_from_bitmap(bits)
    };

    let purpose_bits = record.bits("purposeIdBitString").ok_or(Error::SchemaMismatch {
        field: "purposeIdBitString",
        expected: "bit string",
    })?;
    let allowed_purpose_ids = range::ids_from_bitmap(purpose_bits)
        .into_iter()
        .map(|id| id as u8)
        .collect();

    Ok(ConsentData {
        version: req_int(&record, "version")? as u8,
        created: req_date(&record, "created")?,
        last_updated: req_date(&record, "lastUpdated")?,
        cmp_id: req_int(&record, "cmpId")? as u16,
        cmp_version: req_int(&record, "cmpVersion")? as u16,
        consent_screen: req_int(&record, "consentScreen")? as u8,
        consent_language: req_language(&record, "consentLanguage")?,
        vendor_list_version: req_int(&record, "vendorListVersion")? as u16,
        max_vendor_id,
        allowed_purpose_ids,
        allowed_vendor_ids,
    })
}

/// Encodes only the metadata fields of a record; every other field is
/// zero-filled.
///
/// Byte-kompatibel zu Decodern, die einen vollen v1-Record erwarten: das
/// Sprachfeld sind 12 Null-Bits, die Purpose-Bitmap ist leer, `maxVendorId`
/// ist 0 und der Bitmap-Zweig ist damit 0 Bits breit.
pub fn encode_metadata_string(data: &ConsentData) -> Result<String> {
    let fields = schema::fields_for_version(data.version)
        .ok_or(Error::UnsupportedVersion(data.version))?;

    let mut input = FieldMap::new();
    input.set("version", Value::Int(u64::from(data.version)));
    input.set("created", Value::Date(data.created));
    input.set("lastUpdated", Value::Date(data.last_updated));
    input.set("cmpId", Value::Int(u64::from(data.cmp_id)));
    input.set("cmpVersion", Value::Int(u64::from(data.cmp_version)));
    input.set("consentScreen", Value::Int(u64::from(data.consent_screen)));
    input.set(
        "vendorListVersion",
        Value::Int(u64::from(data.vendor_list_version)),
    );
    input.set("maxVendorId", Value::Int(0));
    input.set("isRange", Value::Bool(false));

    let mut writer = BitWriter::new();
    encoder::encode_fields(&mut writer, &input, fields)?;
    Ok(token::encode(&writer.into_vec()))
}

/// Decodes the metadata fields of any v1 token (full or metadata-only).
pub fn decode_metadata_string(consent_token: &str) -> Result<ConsentMetadata> {
    let record = decode_record(consent_token)?;
    Ok(ConsentMetadata {
        version: req_int(&record, "version")? as u8,
        created: req_date(&record, "created")?,
        last_updated: req_date(&record, "lastUpdated")?,
        cmp_id: req_int(&record, "cmpId")? as u16,
        cmp_version: req_int(&record, "cmpVersion")? as u16,
        consent_screen: req_int(&record, "consentScreen")? as u8,
        vendor_list_version: req_int(&record, "vendorListVersion")? as u16,
    })
}

/// Expands the token and schema-decodes the full record.
///
/// Die Version wird vor jedem Feld-Decode geprüft; eine unbekannte Version
/// bricht ab, ohne dass ein partieller Record entsteht.
fn decode_record(consent_token: &str) -> Result<FieldMap> {
    let bytes = token::decode(consent_token)?;
    let version = integer::decode(&mut BitReader::new(&bytes), VERSION_BITS)? as u8;
    let fields =
        schema::fields_for_version(version).ok_or(Error::UnsupportedVersion(version))?;
    let mut reader = BitReader::new(&bytes);
    decoder::decode_fields(&mut reader, fields)
}

fn entry_to_map(entry: &RangeEntry) -> FieldMap {
    let mut map = FieldMap::new();
    map.set("isRange", Value::Bool(entry.is_range));
    map.set("startVendorId", Value::Int(u64::from(entry.start_vendor_id)));
    if let Some(end) = entry.end_vendor_id {
        map.set("endVendorId", Value::Int(u64::from(end)));
    }
    map
}

fn entries_from_map(record: &FieldMap) -> Result<Vec<RangeEntry>> {
    let items = record.list("vendorRangeList").ok_or(Error::SchemaMismatch {
        field: "vendorRangeList",
        expected: "list",
    })?;
    items
        .iter()
        .map(|item| {
            Ok(RangeEntry {
                is_range: item.bool("isRange").unwrap_or(false),
                start_vendor_id: req_int(item, "startVendorId")? as u16,
                end_vendor_id: item.int("endVendorId").map(|end| end as u16),
            })
        })
        .collect()
}

// Pflichtfelder: ein ungegatetes Feld fehlt nach dem Decode nie; ein Fehlen
// wäre ein Schema-Definitionsfehler.

fn req_int(record: &FieldMap, name: &'static str) -> Result<u64> {
    record.int(name).ok_or(Error::SchemaMismatch {
        field: name,
        expected: "integer",
    })
}

fn req_date(record: &FieldMap, name: &'static str) -> Result<DateTime<Utc>> {
    record.date(name).ok_or(Error::SchemaMismatch {
        field: name,
        expected: "timestamp",
    })
}

fn req_language(record: &FieldMap, name: &'static str) -> Result<String> {
    record
        .language(name)
        .map(str::to_string)
        .ok_or(Error::SchemaMismatch {
            field: name,
            expected: "language code",
        })
}
