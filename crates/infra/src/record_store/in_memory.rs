use std::sync::RwLock;

use carlot_inventory::CarRecord;
use carlot_sales::SaleRecord;

use super::r#trait::{RecordStore, StoreError};

/// In-memory record store.
///
/// Intended for tests/dev. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    cars: RwLock<Vec<CarRecord>>,
    sales: RwLock<Vec<SaleRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a car collection and an empty sales log.
    pub fn with_cars(cars: Vec<CarRecord>) -> Self {
        Self {
            cars: RwLock::new(cars),
            sales: RwLock::new(Vec::new()),
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

impl RecordStore for InMemoryRecordStore {
    fn load_cars(&self) -> Result<Vec<CarRecord>, StoreError> {
        let cars = self.cars.read().map_err(|_| poisoned())?;
        Ok(cars.clone())
    }

    fn replace_cars(&self, records: &[CarRecord]) -> Result<(), StoreError> {
        let mut cars = self.cars.write().map_err(|_| poisoned())?;
        *cars = records.to_vec();
        Ok(())
    }

    fn load_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
        let sales = self.sales.read().map_err(|_| poisoned())?;
        Ok(sales.clone())
    }

    fn append_sale(&self, record: &SaleRecord) -> Result<(), StoreError> {
        let mut sales = self.sales.write().map_err(|_| poisoned())?;
        sales.push(record.clone());
        Ok(())
    }
}
