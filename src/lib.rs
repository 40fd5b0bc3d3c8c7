//! ercs – IAB consent string (format v1) encoder/decoder
//!
//! Packs consent-preference records into the compact bit-string format of
//! the IAB "Consent string and vendor list format" v1.1 and frames them as
//! URL-safe base64 tokens. Vendor consent is encoded in whichever of the two
//! wire forms (dense bitmap or range list) is smaller; both decode back to
//! the same allow-list.
//!
//! # Beispiel
//!
//! ```
//! use ercs::{ConsentData, Purpose, Vendor, VendorList};
//!
//! let vendor_list = VendorList::new(
//!     8,
//!     vec![Purpose { id: 1 }, Purpose { id: 2 }],
//!     vec![Vendor { id: 1 }, Vendor { id: 2 }, Vendor { id: 3 }],
//! );
//! let data = ConsentData {
//!     cmp_id: 7,
//!     consent_language: "fr".into(),
//!     vendor_list_version: 8,
//!     allowed_purpose_ids: vec![1, 2],
//!     allowed_vendor_ids: vec![1, 2, 3],
//!     ..ConsentData::default()
//! };
//!
//! let token = ercs::encode_consent_string(&data, &vendor_list).unwrap();
//! let decoded = ercs::decode_consent_string(&token).unwrap();
//! assert_eq!(decoded.allowed_vendor_ids, vec![1, 2, 3]);
//! assert_eq!(decoded.consent_language, "fr");
//! ```

pub mod bitstream;
pub mod boolean;
pub mod consent;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod field;
pub mod integer;
pub mod language;
pub mod range;
pub mod schema;
pub mod timestamp;
pub mod token;
pub mod vendor_list;

pub use error::{Error, Result};

/// HashSet mit ahash (schneller, nicht DoS-resistent — für interne
/// ID-Mengen).
pub(crate) type FastHashSet<K> = hashbrown::HashSet<K, ahash::RandomState>;

// Public API: Records und Token-Funktionen
pub use consent::{
    decode_consent_string, decode_metadata_string, encode_consent_string,
    encode_metadata_string, ConsentData, ConsentMetadata,
};

// Public API: Vendor-Katalog und Ranges
pub use range::RangeEntry;
pub use vendor_list::{Purpose, Vendor, VendorList};
