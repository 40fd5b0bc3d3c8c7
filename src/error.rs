//! Central error types for the consent string codec.
//!
//! Each variant references the relevant part of the consent string format
//! (IAB "Consent string and vendor list format" v1.1).

use core::fmt;

/// All error conditions surfaced by the codec.
///
/// Alle Fehler werden eager und synchron ausgelöst; es gibt keine
/// Retries und keine partiellen Ergebnisse — ein Aufruf liefert entweder
/// einen vollständigen Token/Record oder einen dieser Fehler.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The version field of the string names a schema this crate does not know.
    /// Raised before any further field is decoded.
    UnsupportedVersion(u8),
    /// The token fails base64 alphabet or length validation at the boundary.
    MalformedToken(String),
    /// Encoding was requested without a vendor list, but the consent fields
    /// require per-vendor data.
    MissingVendorList,
    /// The supplied vendor list does not respect the vendor list schema
    /// (missing version, malformed purposes/vendors arrays).
    InvalidVendorList(String),
    /// The consent language is not a two-letter ISO 639-1 code, or a decoded
    /// letter index is outside `A..=Z`.
    InvalidLanguage(String),
    /// The bit stream ended before all declared fields were read.
    PrematureEndOfStream,
    /// A field definition and the supplied value disagree (e.g. an integer
    /// field given a boolean value). The schema itself is malformed, not the
    /// input data; the whole encode/decode call is aborted.
    SchemaMismatch {
        field: &'static str,
        expected: &'static str,
    },
    /// A decoded tick count lies outside the representable date range.
    ///
    /// Kann bei den 36-Bit-Feldern des v1-Schemas nicht auftreten; nur bei
    /// absurd breiten Custom-Feldern erreichbar.
    TimestampOutOfRange(u64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported consent string version {version}")
            }
            Self::MalformedToken(msg) => write!(f, "malformed consent string token: {msg}"),
            Self::MissingVendorList => {
                write!(f, "a vendor list is required to encode a consent string")
            }
            Self::InvalidVendorList(msg) => write!(
                f,
                "vendor list does not respect the vendor list schema: {msg}"
            ),
            Self::InvalidLanguage(lang) => write!(
                f,
                "consent language must be a two-letter ISO 639-1 code, got '{lang}'"
            ),
            Self::PrematureEndOfStream => write!(f, "premature end of consent bit stream"),
            Self::SchemaMismatch { field, expected } => {
                write!(f, "field '{field}' expects a {expected} value")
            }
            Self::TimestampOutOfRange(ticks) => {
                write!(f, "timestamp of {ticks} deciseconds is out of range")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Every variant must produce a non-empty Display string that names
    /// the offending element.

    #[test]
    fn unsupported_version_display() {
        let msg = Error::UnsupportedVersion(7).to_string();
        assert!(msg.contains("version"), "{msg}");
        assert!(msg.contains('7'), "{msg}");
    }

    #[test]
    fn malformed_token_display() {
        let msg = Error::MalformedToken("invalid symbol".into()).to_string();
        assert!(msg.contains("token"), "{msg}");
        assert!(msg.contains("invalid symbol"), "{msg}");
    }

    #[test]
    fn missing_vendor_list_display() {
        let msg = Error::MissingVendorList.to_string();
        assert!(msg.contains("vendor list"), "{msg}");
    }

    #[test]
    fn invalid_vendor_list_display() {
        let msg = Error::InvalidVendorList("missing field `vendors`".into()).to_string();
        assert!(msg.contains("vendor list schema"), "{msg}");
        assert!(msg.contains("vendors"), "{msg}");
    }

    #[test]
    fn invalid_language_display() {
        let msg = Error::InvalidLanguage("engl".into()).to_string();
        assert!(msg.contains("two-letter"), "{msg}");
        assert!(msg.contains("engl"), "{msg}");
    }

    #[test]
    fn premature_end_of_stream_display() {
        let msg = Error::PrematureEndOfStream.to_string();
        assert!(msg.contains("premature"), "{msg}");
    }

    #[test]
    fn schema_mismatch_display() {
        let msg = Error::SchemaMismatch {
            field: "cmpId",
            expected: "integer",
        }
        .to_string();
        assert!(msg.contains("cmpId"), "{msg}");
        assert!(msg.contains("integer"), "{msg}");
    }

    #[test]
    fn timestamp_out_of_range_display() {
        let msg = Error::TimestampOutOfRange(u64::MAX).to_string();
        assert!(msg.contains("deciseconds"), "{msg}");
    }

    #[test]
    fn error_implements_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(Error::PrematureEndOfStream);
        assert!(!e.to_string().is_empty());
    }

    #[test]
    fn error_is_clone_and_eq() {
        let e1 = Error::MissingVendorList;
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }

    #[test]
    fn result_type_alias_works() {
        let ok: Result<u32> = Ok(42);
        assert_eq!(ok.unwrap(), 42);

        let err: Result<u32> = Err(Error::PrematureEndOfStream);
        assert!(err.is_err());
    }
}
