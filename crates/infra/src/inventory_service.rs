//! Inventory operations over a [`RecordStore`].
//!
//! `InventoryService` is the single entry point the panels call. Each operation
//! loads what it needs from the store, applies the pure domain rules from
//! `carlot-inventory` / `carlot-sales`, and persists the result before
//! returning:
//!
//! ```text
//! add / update / delete:  load_cars → validate → mutate → replace_cars
//! purchase:               load_cars + load_sales → mark_sold → replace_cars → append_sale
//!                                                              (undo replace_cars if append fails
//!                                                               and the sale is not in the log)
//! ```
//!
//! Cars are addressed by their position in the collection as last displayed.
//! The service trusts that position; a position past the end is `NotFound`.

use thiserror::Error;

use carlot_core::{Clock, DomainError, Entity, SystemClock};
use carlot_inventory::{CarDraft, CarField, CarRecord, locate, locate_mut};
use carlot_sales::{Buyer, SaleId, SaleRecord};

use crate::record_store::{RecordStore, StoreError};

/// Failure of an inventory operation.
///
/// `Validation`, `NotFound` and `AlreadySold` are expected outcomes the caller
/// shows as a notice. `StoreUnavailable` aborts the current operation.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already sold: {0}")]
    AlreadySold(String),

    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

impl InventoryError {
    /// Whether the user can correct the input and try again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, InventoryError::StoreUnavailable(_))
    }
}

impl From<DomainError> for InventoryError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => InventoryError::Validation(msg),
            DomainError::NotFound(msg) => InventoryError::NotFound(msg),
            DomainError::AlreadySold(msg) => InventoryError::AlreadySold(msg),
        }
    }
}

/// Business rules for the car collection and the sales log.
///
/// The store and clock are injected; the service holds no other state.
#[derive(Debug)]
pub struct InventoryService<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S> InventoryService<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S, C> InventoryService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (S, C) {
        (self.store, self.clock)
    }
}

impl<S, C> InventoryService<S, C>
where
    S: RecordStore,
    C: Clock,
{
    /// All cars in stored order.
    pub fn cars(&self) -> Result<Vec<CarRecord>, InventoryError> {
        Ok(self.store.load_cars()?)
    }

    /// All sales in append order.
    pub fn sales(&self) -> Result<Vec<SaleRecord>, InventoryError> {
        Ok(self.store.load_sales()?)
    }

    /// The car currently at `position`.
    pub fn car_at(&self, position: usize) -> Result<CarRecord, InventoryError> {
        let cars = self.store.load_cars()?;
        Ok(locate(&cars, position)?.clone())
    }

    /// Filter by substring, or sort when `query` is empty.
    ///
    /// An empty result is returned as-is; it is not an error.
    pub fn search(&self, criterion: CarField, query: &str) -> Result<Vec<CarRecord>, InventoryError> {
        let cars = self.store.load_cars()?;
        let results = carlot_inventory::search(&cars, criterion, query);
        tracing::debug!(%criterion, query, hits = results.len(), "inventory search");
        Ok(results)
    }

    /// Like [`search`](Self::search), but each record is paired with its
    /// current position so a displayed row can be acted on later.
    pub fn listing(
        &self,
        criterion: CarField,
        query: &str,
    ) -> Result<Vec<(usize, CarRecord)>, InventoryError> {
        let cars = self.store.load_cars()?;
        Ok(carlot_inventory::search_positions(&cars, criterion, query)
            .into_iter()
            .map(|position| (position, cars[position].clone()))
            .collect())
    }

    /// Validate `draft` and append it to the end of the collection.
    pub fn add_car(&self, draft: CarDraft) -> Result<CarRecord, InventoryError> {
        let car = draft.validate().inspect_err(|e| {
            tracing::warn!("add rejected: {e}");
        })?;

        let mut cars = self.store.load_cars()?;
        cars.push(car.clone());
        self.store.replace_cars(&cars)?;

        tracing::info!(
            position = cars.len() - 1,
            brand = %car.brand,
            model = %car.model,
            "car added"
        );
        Ok(car)
    }

    /// Replace the car at `position` in place.
    ///
    /// A sold car may still be edited, but only with a `Sold` status.
    pub fn update_car(&self, position: usize, draft: CarDraft) -> Result<CarRecord, InventoryError> {
        let car = draft.validate().inspect_err(|e| {
            tracing::warn!(position, "update rejected: {e}");
        })?;

        let mut cars = self.store.load_cars()?;
        let slot = locate_mut(&mut cars, position)?;
        slot.revise(car.clone()).inspect_err(|e| {
            tracing::warn!(position, "update rejected: {e}");
        })?;
        self.store.replace_cars(&cars)?;

        tracing::info!(position, brand = %car.brand, model = %car.model, "car updated");
        Ok(car)
    }

    /// Remove the car at `position`; later cars shift down by one.
    pub fn delete_car(&self, position: usize) -> Result<CarRecord, InventoryError> {
        let mut cars = self.store.load_cars()?;
        locate(&cars, position)?;
        let removed = cars.remove(position);
        self.store.replace_cars(&cars)?;

        tracing::info!(position, brand = %removed.brand, model = %removed.model, "car deleted");
        Ok(removed)
    }

    /// Sell the car at `position` and record the sale.
    ///
    /// Checks run in this order: both names present, position exists, car not
    /// yet sold. On success the car is `Sold` and exactly one sale has been
    /// appended. If the sale cannot be appended the previous car collection is
    /// written back, so neither effect remains. When the append reports an
    /// error but the sale is in the log anyway, the car is left `Sold` so the
    /// collection agrees with the log.
    pub fn purchase(
        &self,
        position: usize,
        customer: &str,
        salesperson: &str,
    ) -> Result<SaleRecord, InventoryError> {
        let buyer = Buyer::new(customer, salesperson).inspect_err(|e| {
            tracing::warn!(position, "purchase rejected: {e}");
        })?;

        let mut cars = self.store.load_cars()?;
        let before = cars.clone();
        let car = locate_mut(&mut cars, position)?;
        car.mark_sold().inspect_err(|e| {
            tracing::warn!(position, "purchase rejected: {e}");
        })?;

        let sold_at = self.clock.now();
        let existing = self.store.load_sales()?;
        let sale_id = SaleId::next_unique(sold_at, existing.iter().map(|s| s.id()));
        let sale = SaleRecord::for_purchase(car, &buyer, sale_id, sold_at);

        self.store.replace_cars(&cars)?;
        if let Err(err) = self.store.append_sale(&sale) {
            if self.sale_recorded(&sale) {
                // The log holds the sale despite the error; the car stays sold to match it.
                tracing::error!(position, sale_id = %sale.sale_id, "sale append reported failure after writing: {err}");
                return Err(err.into());
            }
            tracing::error!(position, sale_id = %sale.sale_id, "sale append failed, restoring inventory: {err}");
            if let Err(restore_err) = self.store.replace_cars(&before) {
                tracing::error!(position, "inventory restore failed: {restore_err}");
            }
            return Err(err.into());
        }

        tracing::info!(
            position,
            sale_id = %sale.sale_id,
            brand = %sale.brand,
            price = %sale.price_sold,
            "car sold"
        );
        Ok(sale)
    }

    fn sale_recorded(&self, sale: &SaleRecord) -> bool {
        self.store
            .load_sales()
            .map(|sales| sales.iter().any(|s| s.id() == sale.id()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::{NaiveDate, NaiveDateTime};

    use carlot_core::FixedClock;
    use carlot_inventory::CarStatus;

    use super::*;
    use crate::record_store::InMemoryRecordStore;

    fn test_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn draft(brand: &str, model: &str, cost: &str, shade: &str) -> CarDraft {
        CarDraft::available(brand, model, "2020", cost, shade)
    }

    fn car(brand: &str, model: &str, cost: &str, shade: &str) -> CarRecord {
        draft(brand, model, cost, shade).validate().unwrap()
    }

    fn setup(cars: Vec<CarRecord>) -> InventoryService<Arc<InMemoryRecordStore>, FixedClock> {
        let store = Arc::new(InMemoryRecordStore::with_cars(cars));
        InventoryService::with_clock(store, FixedClock::new(test_time()))
    }

    /// Store whose sale appends can be made to fail, before or after the
    /// entry lands in the log.
    #[derive(Default)]
    struct FlakySalesStore {
        inner: InMemoryRecordStore,
        fail_appends: AtomicBool,
        fail_after_write: AtomicBool,
    }

    impl RecordStore for FlakySalesStore {
        fn load_cars(&self) -> Result<Vec<CarRecord>, StoreError> {
            self.inner.load_cars()
        }

        fn replace_cars(&self, records: &[CarRecord]) -> Result<(), StoreError> {
            self.inner.replace_cars(records)
        }

        fn load_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
            self.inner.load_sales()
        }

        fn append_sale(&self, record: &SaleRecord) -> Result<(), StoreError> {
            if self.fail_appends.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("disk full".to_string()));
            }
            self.inner.append_sale(record)?;
            if self.fail_after_write.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("sync failed".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn add_appends_to_end() {
        let service = setup(vec![car("Toyota", "Corolla", "20000", "Blue")]);

        let added = service.add_car(draft("Honda", "Civic", "15000", "Red")).unwrap();

        let cars = service.cars().unwrap();
        assert_eq!(cars.len(), 2);
        assert_eq!(cars[1], added);
        assert_eq!(added.status, CarStatus::Available);
    }

    #[test]
    fn add_with_blank_field_leaves_store_unchanged() {
        let initial = vec![car("Toyota", "Corolla", "20000", "Blue")];
        let service = setup(initial.clone());

        let err = service.add_car(draft("Honda", "", "15000", "Red")).unwrap_err();

        assert!(matches!(err, InventoryError::Validation(_)));
        assert!(err.is_recoverable());
        assert_eq!(service.cars().unwrap(), initial);
    }

    #[test]
    fn update_replaces_in_place() {
        let service = setup(vec![
            car("Toyota", "Corolla", "20000", "Blue"),
            car("Honda", "Civic", "15000", "Red"),
            car("Ford", "Focus", "9000", "Grey"),
        ]);

        service
            .update_car(1, draft("Honda", "Civic", "14000", "Black"))
            .unwrap();

        let cars = service.cars().unwrap();
        assert_eq!(cars[0], car("Toyota", "Corolla", "20000", "Blue"));
        assert_eq!(cars[1], car("Honda", "Civic", "14000", "Black"));
        assert_eq!(cars[2], car("Ford", "Focus", "9000", "Grey"));
    }

    #[test]
    fn update_with_blank_shade_fails_and_store_unchanged() {
        let initial = vec![car("Toyota", "Corolla", "20000", "Blue")];
        let service = setup(initial.clone());

        let err = service
            .update_car(0, draft("Toyota", "Corolla", "20000", ""))
            .unwrap_err();

        assert!(matches!(err, InventoryError::Validation(_)));
        assert_eq!(service.cars().unwrap(), initial);
    }

    #[test]
    fn update_stale_position_is_not_found() {
        let service = setup(vec![car("Toyota", "Corolla", "20000", "Blue")]);

        let err = service
            .update_car(3, draft("Honda", "Civic", "15000", "Red"))
            .unwrap_err();

        assert!(matches!(err, InventoryError::NotFound(_)));
    }

    #[test]
    fn delete_shifts_following_positions() {
        let service = setup(vec![
            car("Toyota", "Corolla", "20000", "Blue"),
            car("Honda", "Civic", "15000", "Red"),
        ]);

        let removed = service.delete_car(0).unwrap();

        assert_eq!(removed.brand, "Toyota");
        assert_eq!(service.car_at(0).unwrap().brand, "Honda");
        assert!(matches!(service.car_at(1), Err(InventoryError::NotFound(_))));
    }

    #[test]
    fn delete_out_of_range_is_not_found() {
        let service = setup(Vec::new());
        assert!(matches!(service.delete_car(0), Err(InventoryError::NotFound(_))));
    }

    #[test]
    fn purchase_scenario() {
        let service = setup(vec![car("Toyota", "Corolla", "20000", "Blue")]);

        let sale = service.purchase(0, "Alice", "Bob").unwrap();

        assert_eq!(sale.brand, "Toyota");
        assert_eq!(sale.price_sold, "20000");
        assert_eq!(sale.customer_name, "Alice");
        assert_eq!(sale.salesperson, "Bob");
        assert_eq!(sale.sale_id.as_str(), "S20240601120000");
        assert_eq!(sale.date, test_time().date());

        let cars = service.cars().unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(
            cars[0].columns(),
            ["Toyota", "Corolla", "2020", "20000", "Blue", "Sold"]
        );
        assert_eq!(service.sales().unwrap(), vec![sale]);
    }

    #[test]
    fn purchase_touches_only_the_target() {
        let initial = vec![
            car("Toyota", "Corolla", "20000", "Blue"),
            car("Honda", "Civic", "15000", "Red"),
            car("Ford", "Focus", "9000", "Grey"),
        ];
        let service = setup(initial.clone());

        service.purchase(1, "Alice", "Bob").unwrap();

        let cars = service.cars().unwrap();
        assert_eq!(cars[0], initial[0]);
        assert_eq!(cars[1].status, CarStatus::Sold);
        assert_eq!(cars[2], initial[2]);
        assert_eq!(service.sales().unwrap().len(), 1);
    }

    #[test]
    fn second_purchase_is_already_sold() {
        let service = setup(vec![car("Toyota", "Corolla", "20000", "Blue")]);
        service.purchase(0, "Alice", "Bob").unwrap();

        let err = service.purchase(0, "Carol", "Dan").unwrap_err();

        assert!(matches!(err, InventoryError::AlreadySold(_)));
        assert_eq!(service.sales().unwrap().len(), 1);
    }

    #[test]
    fn purchase_checks_names_before_position() {
        let service = setup(Vec::new());

        let err = service.purchase(5, "", "Bob").unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));

        let err = service.purchase(5, "Alice", "Bob").unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(_)));
        assert!(service.sales().unwrap().is_empty());
    }

    #[test]
    fn same_second_purchases_get_distinct_ids() {
        let service = setup(vec![
            car("Toyota", "Corolla", "20000", "Blue"),
            car("Honda", "Civic", "15000", "Red"),
        ]);

        let first = service.purchase(0, "Alice", "Bob").unwrap();
        let second = service.purchase(1, "Carol", "Bob").unwrap();

        assert_eq!(first.sale_id.as_str(), "S20240601120000");
        assert_eq!(second.sale_id.as_str(), "S20240601120000-2");
    }

    #[test]
    fn failed_sale_append_restores_inventory() {
        let store = Arc::new(FlakySalesStore::default());
        store
            .replace_cars(&[car("Toyota", "Corolla", "20000", "Blue")])
            .unwrap();
        store.fail_appends.store(true, Ordering::SeqCst);
        let service = InventoryService::with_clock(store.clone(), FixedClock::new(test_time()));

        let err = service.purchase(0, "Alice", "Bob").unwrap_err();

        assert!(matches!(err, InventoryError::StoreUnavailable(_)));
        assert!(!err.is_recoverable());
        assert_eq!(service.cars().unwrap()[0].status, CarStatus::Available);
        assert!(service.sales().unwrap().is_empty());

        store.fail_appends.store(false, Ordering::SeqCst);
        service.purchase(0, "Alice", "Bob").unwrap();
        assert_eq!(service.cars().unwrap()[0].status, CarStatus::Sold);
    }

    #[test]
    fn append_error_after_write_keeps_car_sold_to_match_log() {
        let store = Arc::new(FlakySalesStore::default());
        store
            .replace_cars(&[car("Toyota", "Corolla", "20000", "Blue")])
            .unwrap();
        store.fail_after_write.store(true, Ordering::SeqCst);
        let service = InventoryService::with_clock(store.clone(), FixedClock::new(test_time()));

        let err = service.purchase(0, "Alice", "Bob").unwrap_err();

        assert!(matches!(err, InventoryError::StoreUnavailable(_)));
        let sales = service.sales().unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(service.cars().unwrap()[0].status, CarStatus::Sold);

        let err = service.purchase(0, "Carol", "Dan").unwrap_err();
        assert!(matches!(err, InventoryError::AlreadySold(_)));
        assert_eq!(service.sales().unwrap(), sales);
    }

    #[test]
    fn update_cannot_relist_a_sold_car() {
        let service = setup(vec![car("Toyota", "Corolla", "20000", "Blue")]);
        service.purchase(0, "Alice", "Bob").unwrap();

        let err = service
            .update_car(0, draft("Toyota", "Corolla", "18000", "Blue"))
            .unwrap_err();

        assert!(matches!(err, InventoryError::AlreadySold(_)));
        assert!(err.is_recoverable());
        let stored = service.car_at(0).unwrap();
        assert_eq!(stored.status, CarStatus::Sold);
        assert_eq!(stored.cost, "20000");

        assert!(matches!(
            service.purchase(0, "Carol", "Dan"),
            Err(InventoryError::AlreadySold(_))
        ));
        assert_eq!(service.sales().unwrap().len(), 1);
    }

    #[test]
    fn update_of_sold_car_keeps_it_sold() {
        let service = setup(vec![car("Toyota", "Corolla", "20000", "Blue")]);
        service.purchase(0, "Alice", "Bob").unwrap();

        let updated = service
            .update_car(0, draft("Toyota", "Corolla", "18000", "Silver").with_status("Sold"))
            .unwrap();

        assert_eq!(updated.status, CarStatus::Sold);
        assert_eq!(service.car_at(0).unwrap(), updated);
        assert_eq!(service.sales().unwrap()[0].price_sold, "20000");
    }

    #[test]
    fn search_delegates_to_filter_and_sort() {
        let service = setup(vec![
            car("Toyota", "Corolla", "20000", "Blue"),
            car("Honda", "Civic", "100", "Red"),
        ]);

        let hits = service.search(CarField::Brand, "hon").unwrap();
        assert_eq!(hits, vec![car("Honda", "Civic", "100", "Red")]);

        let sorted = service.search(CarField::Cost, "").unwrap();
        assert_eq!(sorted[0].cost, "100");

        assert!(service.search(CarField::Shade, "green").unwrap().is_empty());
    }

    #[test]
    fn listing_keeps_store_positions() {
        let service = setup(vec![
            car("Toyota", "Corolla", "20000", "Blue"),
            car("Honda", "Civic", "100", "Red"),
            car("Toyota", "Yaris", "18000", "Blue"),
        ]);

        let rows = service.listing(CarField::Brand, "toyota").unwrap();
        let positions: Vec<usize> = rows.iter().map(|(p, _)| *p).collect();
        assert_eq!(positions, [0, 2]);

        let (position, row) = &rows[1];
        service.purchase(*position, "Alice", "Bob").unwrap();
        assert_eq!(service.car_at(2).unwrap().model, row.model);
        assert_eq!(service.car_at(2).unwrap().status, CarStatus::Sold);
    }
}
