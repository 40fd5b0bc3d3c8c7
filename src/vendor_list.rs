//! Vendor catalog model (the IAB global vendor list, GVL).
//!
//! The codec consumes only the `{id}` lists of the catalog: purposes for the
//! purpose bitmap, vendors for the vendor bitmap and the range compaction.
//! Vendors are sorted ascending by ID on construction — the range algorithm
//! requires a sorted catalog.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One purpose entry of the vendor list. Only the ID is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purpose {
    pub id: u8,
}

/// One vendor entry of the vendor list. Only the ID is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: u16,
}

/// A vendor catalog: version plus purpose and vendor ID lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorList {
    pub vendor_list_version: u16,
    pub purposes: Vec<Purpose>,
    pub vendors: Vec<Vendor>,
}

impl VendorList {
    /// Creates a catalog, sorting the vendors ascending by ID.
    pub fn new(vendor_list_version: u16, purposes: Vec<Purpose>, vendors: Vec<Vendor>) -> Self {
        let mut list = Self {
            vendor_list_version,
            purposes,
            vendors,
        };
        list.vendors.sort_unstable_by_key(|vendor| vendor.id);
        list
    }

    /// Parses a catalog from GVL-shaped JSON and validates it.
    ///
    /// Abgelehnt werden Listen ohne `vendorListVersion`, mit Version 0 oder
    /// mit fehlenden/falsch getypten `purposes`/`vendors`-Arrays.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidVendorList(e.to_string()))?;
        if parsed.vendor_list_version == 0 {
            return Err(Error::InvalidVendorList(
                "vendorListVersion must be at least 1".into(),
            ));
        }
        Ok(Self::new(
            parsed.vendor_list_version,
            parsed.purposes,
            parsed.vendors,
        ))
    }

    /// The highest vendor ID in the catalog, 0 for an empty catalog.
    pub fn max_vendor_id(&self) -> u16 {
        // Vendors sind sortiert; das Maximum steht am Ende.
        self.vendors.last().map_or(0, |vendor| vendor.id)
    }

    /// The vendor IDs in ascending order.
    pub fn vendor_ids(&self) -> Vec<u16> {
        self.vendors.iter().map(|vendor| vendor.id).collect()
    }

    /// The purpose IDs in catalog order.
    pub fn purpose_ids(&self) -> Vec<u8> {
        self.purposes.iter().map(|purpose| purpose.id).collect()
    }
}
