use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use carlot_core::{DomainError, DomainResult, Entity};
use carlot_inventory::CarRecord;

/// Column names of the persisted sales log, in order.
pub const SALE_HEADERS: [&str; 6] = [
    "Date",
    "SaleID",
    "Brand",
    "CustomerName",
    "PriceSold",
    "Salesperson",
];

/// Sale identifier: `S<YYYYMMDDHHMMSS>`, with a `-N` suffix when several
/// sales land in the same second.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

impl SaleId {
    /// The timestamp-derived identifier without any collision suffix.
    pub fn base(at: NaiveDateTime) -> Self {
        Self(at.format("S%Y%m%d%H%M%S").to_string())
    }

    /// First identifier for `at` not already present in `taken`.
    pub fn next_unique<'a>(at: NaiveDateTime, taken: impl IntoIterator<Item = &'a SaleId>) -> Self {
        let base = Self::base(at);
        let prefix = format!("{}-", base.0);

        let mut same_second = 0usize;
        let mut highest_suffix = 1usize;
        for id in taken {
            if *id == base {
                same_second += 1;
            } else if let Some(n) = id.0.strip_prefix(&prefix).and_then(|s| s.parse::<usize>().ok()) {
                same_second += 1;
                highest_suffix = highest_suffix.max(n);
            }
        }

        if same_second == 0 {
            base
        } else {
            Self(format!("{prefix}{}", highest_suffix + 1))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SaleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SaleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The two names a purchase needs, both required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buyer {
    customer_name: String,
    salesperson: String,
}

impl Buyer {
    pub fn new(customer_name: impl Into<String>, salesperson: impl Into<String>) -> DomainResult<Self> {
        let customer_name = customer_name.into();
        let salesperson = salesperson.into();
        if customer_name.trim().is_empty() || salesperson.trim().is_empty() {
            return Err(DomainError::validation(
                "both customer and salesperson names are required",
            ));
        }
        Ok(Self {
            customer_name,
            salesperson,
        })
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn salesperson(&self) -> &str {
        &self.salesperson
    }
}

/// Immutable sales log entry.
///
/// Brand and price are copied from the car at the moment of sale; later edits
/// to the car do not touch this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "SaleID")]
    pub sale_id: SaleId,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "CustomerName")]
    pub customer_name: String,
    #[serde(rename = "PriceSold")]
    pub price_sold: String,
    #[serde(rename = "Salesperson")]
    pub salesperson: String,
}

impl SaleRecord {
    /// Build the log entry for selling `car` to `buyer`.
    pub fn for_purchase(car: &CarRecord, buyer: &Buyer, sale_id: SaleId, sold_at: NaiveDateTime) -> Self {
        Self {
            date: sold_at.date(),
            sale_id,
            brand: car.brand.clone(),
            customer_name: buyer.customer_name.clone(),
            price_sold: car.cost.clone(),
            salesperson: buyer.salesperson.clone(),
        }
    }

    /// All six columns as text, in [`SALE_HEADERS`] order.
    pub fn columns(&self) -> [String; 6] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.sale_id.to_string(),
            self.brand.clone(),
            self.customer_name.clone(),
            self.price_sold.clone(),
            self.salesperson.clone(),
        ]
    }
}

impl Entity for SaleRecord {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.sale_id
    }
}
