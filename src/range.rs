//! Vendor range compaction and dense ID bitmaps (Format v1.1,
//! VendorConsent section).
//!
//! The vendor consent of a record has two wire forms: a dense bitmap (one
//! bit per vendor ID up to `maxVendorId`) and a list of range entries. This
//! module converts between explicit allow-lists and both forms.

use serde::{Deserialize, Serialize};

use crate::bitstream::BitString;
use crate::FastHashSet;

/// One entry of the range form: a single allowed vendor
/// (`is_range == false`, `end_vendor_id` absent) or an inclusive contiguous
/// block of allowed vendors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeEntry {
    pub is_range: bool,
    pub start_vendor_id: u16,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_vendor_id: Option<u16>,
}

impl RangeEntry {
    /// A single-vendor entry.
    pub fn single(id: u16) -> Self {
        Self {
            is_range: false,
            start_vendor_id: id,
            end_vendor_id: None,
        }
    }

    /// An inclusive block entry.
    pub fn span(start: u16, end: u16) -> Self {
        Self {
            is_range: true,
            start_vendor_id: start,
            end_vendor_id: Some(end),
        }
    }

    /// Last vendor ID covered by this entry.
    fn last_vendor_id(&self) -> u16 {
        self.end_vendor_id.unwrap_or(self.start_vendor_id)
    }
}

/// Compacts an allow-list into range entries against the vendor catalog.
///
/// `sorted_vendor_ids` muss aufsteigend sortiert sein (die Vendor-Liste wird
/// bei der Konstruktion sortiert). Ein offener Lauf erlaubter IDs wird
/// geschlossen, sobald der nächste Katalog-Eintrag nicht erlaubt ist, der
/// Katalog endet, oder die nächste ID im Katalog fehlt (Lücke) — über
/// Katalog-Lücken wird nie hinweg verschmolzen. Läufe der Länge 1 ergeben
/// Einzel-Einträge, längere Läufe inklusive Blöcke; die Einträge sind
/// aufsteigend und überlappungsfrei.
pub fn to_ranges(sorted_vendor_ids: &[u16], allowed_vendor_ids: &[u16]) -> Vec<RangeEntry> {
    let allowed: FastHashSet<u16> = allowed_vendor_ids.iter().copied().collect();
    let in_catalog: FastHashSet<u16> = sorted_vendor_ids.iter().copied().collect();

    let mut entries = Vec::new();
    let mut run: Vec<u16> = Vec::new();

    for (index, &id) in sorted_vendor_ids.iter().enumerate() {
        if allowed.contains(&id) {
            run.push(id);
        }

        let close = !allowed.contains(&id)
            || index == sorted_vendor_ids.len() - 1
            || !in_catalog.contains(&(id + 1));
        if close && !run.is_empty() {
            let start = run[0];
            let end = run[run.len() - 1];
            entries.push(if run.len() == 1 {
                RangeEntry::single(start)
            } else {
                RangeEntry::span(start, end)
            });
            run.clear();
        }
    }

    entries
}

/// Expands range entries back into an explicit allow-list.
///
/// The entries form the *exception set* relative to `default_consent`, not
/// an absolute allow-list: an ID in `1..=max_vendor_id` is allowed when it
/// is covered and the default is deny, or when it is NOT covered and the
/// default is allow.
pub fn from_ranges(
    ranges: &[RangeEntry],
    max_vendor_id: u16,
    default_consent: bool,
) -> Vec<u16> {
    let mut covered: FastHashSet<u16> = FastHashSet::default();
    for entry in ranges {
        for id in entry.start_vendor_id..=entry.last_vendor_id() {
            covered.insert(id);
        }
    }

    (1..=max_vendor_id)
        .filter(|id| covered.contains(id) != default_consent)
        .collect()
}

/// Builds the dense vendor bitmap: bit `i - 1` is set iff vendor ID `i` is
/// allowed, for `i` in `1..=max_vendor_id`.
pub fn vendor_bitmap(max_vendor_id: u16, allowed_vendor_ids: &[u16]) -> BitString {
    let allowed: FastHashSet<u16> = allowed_vendor_ids.iter().copied().collect();
    (1..=max_vendor_id).map(|id| allowed.contains(&id)).collect()
}

/// Builds the purpose bitmap over `1..=max(catalog ∪ allowed)`.
///
/// Die feste 24-Bit-Feldbreite des Schemas normalisiert das Ergebnis
/// anschließend per Pad/Truncate — exakt das Verhalten des Formats.
pub fn purpose_bitmap(purpose_ids: &[u8], allowed_purpose_ids: &[u8]) -> BitString {
    let max_purpose_id = purpose_ids
        .iter()
        .chain(allowed_purpose_ids)
        .copied()
        .max()
        .unwrap_or(0);
    let allowed: FastHashSet<u8> = allowed_purpose_ids.iter().copied().collect();
    (1..=max_purpose_id).map(|id| allowed.contains(&id)).collect()
}

/// Reads a dense bitmap back into the ascending list of set 1-based IDs.
pub fn ids_from_bitmap(bits: &BitString) -> Vec<u16> {
    bits.iter()
        .enumerate()
        .filter(|(_, bit)| *bit)
        .map(|(index, _)| (index + 1) as u16)
        .collect()
}
