use core::str::FromStr;

use serde::{Deserialize, Serialize};

use carlot_core::{DomainError, DomainResult};

/// Column names of the persisted car collection, in order.
pub const CAR_HEADERS: [&str; 6] = ["Brand", "Model", "Year", "Cost", "Shade", "Status"];

/// Availability lifecycle of a car: `Available --purchase--> Sold`.
///
/// `Sold` is terminal; nothing moves a car back to `Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum CarStatus {
    Available,
    Sold,
}

impl CarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "Available",
            CarStatus::Sold => "Sold",
        }
    }

    pub fn is_sold(&self) -> bool {
        matches!(self, CarStatus::Sold)
    }
}

impl core::fmt::Display for CarStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(CarStatus::Available),
            "sold" => Ok(CarStatus::Sold),
            "" => Err(DomainError::validation("Status cannot be empty")),
            other => Err(DomainError::validation(format!(
                "unknown status '{other}' (expected Available or Sold)"
            ))),
        }
    }
}

impl TryFrom<String> for CarStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Searchable/sortable car columns. `Status` is intentionally not one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarField {
    Brand,
    Model,
    Year,
    Cost,
    Shade,
}

impl CarField {
    pub const ALL: [CarField; 5] = [
        CarField::Brand,
        CarField::Model,
        CarField::Year,
        CarField::Cost,
        CarField::Shade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarField::Brand => "Brand",
            CarField::Model => "Model",
            CarField::Year => "Year",
            CarField::Cost => "Cost",
            CarField::Shade => "Shade",
        }
    }
}

impl core::fmt::Display for CarField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CarField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown search criterion '{wanted}' (expected one of Brand, Model, Year, Cost, Shade)"
                ))
            })
    }
}

/// One inventory item.
///
/// Year and Cost are kept as text exactly as entered; they are compared and
/// sorted as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CarRecord {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub cost: String,
    pub shade: String,
    pub status: CarStatus,
}

impl CarRecord {
    /// Value of a searchable column.
    pub fn field(&self, field: CarField) -> &str {
        match field {
            CarField::Brand => &self.brand,
            CarField::Model => &self.model,
            CarField::Year => &self.year,
            CarField::Cost => &self.cost,
            CarField::Shade => &self.shade,
        }
    }

    /// All six columns as text, in [`CAR_HEADERS`] order.
    pub fn columns(&self) -> [&str; 6] {
        [
            &self.brand,
            &self.model,
            &self.year,
            &self.cost,
            &self.shade,
            self.status.as_str(),
        ]
    }

    pub fn is_available(&self) -> bool {
        !self.status.is_sold()
    }

    /// Flip the record to `Sold`, rejecting a second sale.
    pub fn mark_sold(&mut self) -> DomainResult<()> {
        if self.status.is_sold() {
            return Err(DomainError::already_sold(format!(
                "{} {} ({}) is already sold",
                self.brand, self.model, self.year
            )));
        }
        self.status = CarStatus::Sold;
        Ok(())
    }

    /// Overwrite every field with `next`. A sold record stays sold.
    pub fn revise(&mut self, next: CarRecord) -> DomainResult<()> {
        if self.status.is_sold() && !next.status.is_sold() {
            return Err(DomainError::already_sold(format!(
                "{} {} ({}) is sold and cannot be listed as available again",
                self.brand, self.model, self.year
            )));
        }
        *self = next;
        Ok(())
    }
}

/// Unvalidated car fields as entered by an operator.
///
/// Every field, including the status text, must be non-blank before it becomes
/// a [`CarRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarDraft {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub cost: String,
    pub shade: String,
    pub status: String,
}

impl CarDraft {
    /// Draft for a new listing with status `Available`.
    pub fn available(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: impl Into<String>,
        cost: impl Into<String>,
        shade: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            year: year.into(),
            cost: cost.into(),
            shade: shade.into(),
            status: CarStatus::Available.as_str().to_string(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Check the all-fields-present invariant and produce a record.
    pub fn validate(self) -> DomainResult<CarRecord> {
        DomainError::require_non_blank("Brand", &self.brand)?;
        DomainError::require_non_blank("Model", &self.model)?;
        DomainError::require_non_blank("Year", &self.year)?;
        DomainError::require_non_blank("Cost", &self.cost)?;
        DomainError::require_non_blank("Shade", &self.shade)?;
        let status = self.status.parse::<CarStatus>()?;

        Ok(CarRecord {
            brand: self.brand,
            model: self.model,
            year: self.year,
            cost: self.cost,
            shade: self.shade,
            status,
        })
    }
}

impl From<&CarRecord> for CarDraft {
    fn from(record: &CarRecord) -> Self {
        Self {
            brand: record.brand.clone(),
            model: record.model.clone(),
            year: record.year.clone(),
            cost: record.cost.clone(),
            shade: record.shade.clone(),
            status: record.status.as_str().to_string(),
        }
    }
}

/// Resolve a list position against the current collection.
pub fn locate(cars: &[CarRecord], position: usize) -> DomainResult<&CarRecord> {
    cars.get(position).ok_or_else(|| out_of_range(position, cars.len()))
}

/// Mutable variant of [`locate`].
pub fn locate_mut(cars: &mut [CarRecord], position: usize) -> DomainResult<&mut CarRecord> {
    let len = cars.len();
    cars.get_mut(position)
        .ok_or_else(|| out_of_range(position, len))
}

fn out_of_range(position: usize, len: usize) -> DomainError {
    DomainError::not_found(format!("position {position} (inventory has {len} cars)"))
}
