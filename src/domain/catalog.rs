use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Amount, ValidationError, default_active_status, require_non_negative, require_text};

pub type MaterialTypeId = i64;
pub type VendorId = i64;
pub type MaterialId = i64;

/// Categories seeded into a fresh database.
pub const SEED_MATERIAL_TYPES: [&str; 6] = [
    "Metal Tubing",
    "Metal Sheets",
    "Rebar",
    "Powder Coating",
    "Hardware",
    "Consumables",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialType {
    pub type_id: MaterialTypeId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialTypeInput {
    pub name: String,
}

impl MaterialTypeInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub vendor_id: VendorId,
    pub name: String,
    pub status: String,
    pub notes: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorInput {
    pub name: String,
    #[serde(default = "default_active_status")]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl VendorInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: default_active_status(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

/// A vendor-priced catalog row. Distinct from shop-floor inventory and from
/// estimate line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: MaterialId,
    pub type_id: MaterialTypeId,
    pub vendor_id: Option<VendorId>,
    pub price_paid_per_unit: Amount,
    pub units_held: Amount,
    pub client_price_per_unit: Amount,
    pub reorder_threshold: Amount,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialInput {
    pub type_id: MaterialTypeId,
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub price_paid_per_unit: Amount,
    #[serde(default)]
    pub units_held: Amount,
    #[serde(default)]
    pub client_price_per_unit: Amount,
    #[serde(default)]
    pub reorder_threshold: Amount,
    #[serde(default)]
    pub description: Option<String>,
}

impl MaterialInput {
    pub fn new(type_id: MaterialTypeId) -> Self {
        Self {
            type_id,
            vendor_id: None,
            price_paid_per_unit: Decimal::ZERO,
            units_held: Decimal::ZERO,
            client_price_per_unit: Decimal::ZERO,
            reorder_threshold: Decimal::ZERO,
            description: None,
        }
    }

    pub fn from_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative("price_paid_per_unit", self.price_paid_per_unit)?;
        require_non_negative("units_held", self.units_held)?;
        require_non_negative("client_price_per_unit", self.client_price_per_unit)?;
        require_non_negative("reorder_threshold", self.reorder_threshold)?;
        Ok(())
    }
}
