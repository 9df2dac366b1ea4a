//! Search / sort contract over the car collection.
//!
//! - A non-empty query keeps every record whose column contains the query,
//!   compared case-insensitively, in store order.
//! - An empty query returns every record sorted ascending by the column as
//!   plain text ("100" sorts before "20"). The sort is stable.
//!
//! An empty result is a normal outcome, not an error.

use crate::car::{CarField, CarRecord};

/// Filter or sort `cars` by `criterion` depending on whether `query` is empty.
pub fn search(cars: &[CarRecord], criterion: CarField, query: &str) -> Vec<CarRecord> {
    if query.is_empty() {
        sort_by_field(cars, criterion)
    } else {
        filter_matching(cars, criterion, query)
    }
}

/// Same selection and order as [`search`], as positions into `cars`.
///
/// Panels that display a filtered or sorted list use this to map a displayed
/// row back to the car's position in the store.
pub fn search_positions(cars: &[CarRecord], criterion: CarField, query: &str) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..cars.len()).collect();
    if query.is_empty() {
        positions.sort_by(|&a, &b| cars[a].field(criterion).cmp(cars[b].field(criterion)));
    } else {
        let needle = query.to_lowercase();
        positions.retain(|&i| cars[i].field(criterion).to_lowercase().contains(&needle));
    }
    positions
}

/// Case-insensitive substring filter preserving input order.
pub fn filter_matching(cars: &[CarRecord], criterion: CarField, query: &str) -> Vec<CarRecord> {
    let needle = query.to_lowercase();
    cars.iter()
        .filter(|car| car.field(criterion).to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Stable lexicographic sort on one column.
pub fn sort_by_field(cars: &[CarRecord], criterion: CarField) -> Vec<CarRecord> {
    let mut sorted = cars.to_vec();
    sorted.sort_by(|a, b| a.field(criterion).cmp(b.field(criterion)));
    sorted
}
