//! File-backed record store using JSON Lines.
//!
//! Each collection lives in its own file:
//!
//! ```text
//! ["Brand","Model","Year","Cost","Shade","Status"]          <- header line
//! {"Brand":"Toyota","Model":"Corolla",...,"Status":"Available"}
//! ...
//! ```
//!
//! A missing file is created with its header and no records. A header that
//! does not match the schema, or a line that does not parse, is reported as
//! corrupt and the file is left untouched.
//!
//! The car file is rewritten through a sibling `.tmp` file that is fsynced and
//! renamed over the previous file. The sales file is only ever opened in append mode.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use carlot_inventory::{CAR_HEADERS, CarRecord};
use carlot_sales::{SALE_HEADERS, SaleRecord};

use super::r#trait::{RecordStore, StoreError};
use crate::config::StoreConfig;

/// JSON Lines record store rooted in a data directory.
#[derive(Debug, Clone)]
pub struct JsonLinesStore {
    cars_path: PathBuf,
    sales_path: PathBuf,
}

impl JsonLinesStore {
    /// Open (and initialize, if needed) the store described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.data_dir)
            .map_err(|e| StoreError::unavailable(&config.data_dir, e))?;

        let store = Self {
            cars_path: config.cars_path(),
            sales_path: config.sales_path(),
        };
        ensure_initialized(&store.cars_path, &CAR_HEADERS)?;
        ensure_initialized(&store.sales_path, &SALE_HEADERS)?;

        tracing::debug!(
            cars = %store.cars_path.display(),
            sales = %store.sales_path.display(),
            "record store opened"
        );
        Ok(store)
    }

    pub fn cars_path(&self) -> &Path {
        &self.cars_path
    }

    pub fn sales_path(&self) -> &Path {
        &self.sales_path
    }
}

impl RecordStore for JsonLinesStore {
    fn load_cars(&self) -> Result<Vec<CarRecord>, StoreError> {
        read_collection(&self.cars_path, &CAR_HEADERS)
    }

    fn replace_cars(&self, records: &[CarRecord]) -> Result<(), StoreError> {
        write_atomic(&self.cars_path, &CAR_HEADERS, records)
    }

    fn load_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
        read_collection(&self.sales_path, &SALE_HEADERS)
    }

    fn append_sale(&self, record: &SaleRecord) -> Result<(), StoreError> {
        ensure_initialized(&self.sales_path, &SALE_HEADERS)?;

        let mut line = serde_json::to_string(record)
            .map_err(|e| StoreError::corrupt(&self.sales_path, e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.sales_path)
            .map_err(|e| StoreError::unavailable(&self.sales_path, e))?;
        append_synced(&mut file, line.as_bytes(), File::sync_data)
            .map_err(|e| StoreError::unavailable(&self.sales_path, e))
    }
}

/// Append `bytes` and sync. On failure the file is cut back to its prior
/// length so a half-reported entry never stays in the log.
fn append_synced(
    file: &mut File,
    bytes: &[u8],
    sync: impl FnOnce(&File) -> io::Result<()>,
) -> io::Result<()> {
    let len = file.metadata()?.len();
    let result = file.write_all(bytes).and_then(|()| sync(&*file));
    if result.is_err() {
        file.set_len(len).unwrap_or_else(|e| {
            tracing::error!("failed to truncate sales log after append error: {e}");
        });
    }
    result
}

fn header_line(headers: &[&str]) -> String {
    // A list of plain strings always serializes.
    serde_json::Value::from(headers.to_vec()).to_string()
}

fn ensure_initialized(path: &Path, headers: &[&str]) -> Result<(), StoreError> {
    if path.exists() {
        return Ok(());
    }
    tracing::info!(path = %path.display(), "creating empty record file");
    write_atomic::<CarRecord>(path, headers, &[])
}

fn read_collection<T: DeserializeOwned>(path: &Path, headers: &[&str]) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        ensure_initialized(path, headers)?;
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| StoreError::unavailable(path, e))?;
    let mut lines = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    let found: Vec<String> = serde_json::from_str(header)
        .map_err(|e| StoreError::corrupt(path, format!("unreadable header: {e}")))?;
    if found != headers {
        return Err(StoreError::corrupt(
            path,
            format!("header {found:?} does not match schema {headers:?}"),
        ));
    }

    lines
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .map_err(|e| StoreError::corrupt(path, format!("line {}: {e}", idx + 1)))
        })
        .collect()
}

fn write_atomic<T: Serialize>(path: &Path, headers: &[&str], records: &[T]) -> Result<(), StoreError> {
    let tmp_path = tmp_path_for(path);

    let result = write_file(&tmp_path, headers, records)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(|e| StoreError::unavailable(path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_file<T: Serialize>(path: &Path, headers: &[&str], records: &[T]) -> Result<(), StoreError> {
    let io_err = |e| StoreError::unavailable(path, e);

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", header_line(headers)).map_err(io_err)?;
    for record in records {
        serde_json::to_writer(&mut writer, record)
            .map_err(|e| StoreError::corrupt(path, e.to_string()))?;
        writer.write_all(b"\n").map_err(io_err)?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| StoreError::unavailable(path, e.into_error()))?;
    file.sync_all().map_err(io_err)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carlot_inventory::{CarDraft, CarStatus};
    use carlot_sales::{Buyer, SaleId};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, JsonLinesStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonLinesStore::open(&StoreConfig::in_dir(dir.path())).unwrap();
        (dir, store)
    }

    fn car(brand: &str, model: &str, cost: &str) -> CarRecord {
        CarDraft::available(brand, model, "2020", cost, "Blue")
            .validate()
            .unwrap()
    }

    fn sale(second: u32, customer: &str) -> SaleRecord {
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, second)
            .unwrap();
        let buyer = Buyer::new(customer, "Bob").unwrap();
        SaleRecord::for_purchase(&car("Toyota", "Corolla", "20000"), &buyer, SaleId::base(at), at)
    }

    #[test]
    fn open_creates_files_with_headers() {
        let (_dir, store) = setup();

        let cars = fs::read_to_string(store.cars_path()).unwrap();
        assert_eq!(cars, "[\"Brand\",\"Model\",\"Year\",\"Cost\",\"Shade\",\"Status\"]\n");

        let sales = fs::read_to_string(store.sales_path()).unwrap();
        assert!(sales.starts_with("[\"Date\",\"SaleID\""));

        assert!(store.load_cars().unwrap().is_empty());
        assert!(store.load_sales().unwrap().is_empty());
    }

    #[test]
    fn replace_round_trips_in_order() {
        let (_dir, store) = setup();
        let mut cars = vec![
            car("Toyota", "Corolla", "20000"),
            car("Honda", "Civic", "100"),
            car("Ford", "Focus", "9000"),
        ];
        cars[1].status = CarStatus::Sold;

        store.replace_cars(&cars).unwrap();
        assert_eq!(store.load_cars().unwrap(), cars);

        // Reopening sees the same data and keeps it.
        let reopened = JsonLinesStore::open(&StoreConfig::in_dir(store.cars_path().parent().unwrap())).unwrap();
        assert_eq!(reopened.load_cars().unwrap(), cars);
        assert!(!tmp_path_for(store.cars_path()).exists());
    }

    #[test]
    fn append_keeps_prior_entries() {
        let (_dir, store) = setup();
        let first = sale(1, "Alice");
        let second = sale(2, "Carol");

        store.append_sale(&first).unwrap();
        let before = fs::read_to_string(store.sales_path()).unwrap();
        store.append_sale(&second).unwrap();
        let after = fs::read_to_string(store.sales_path()).unwrap();

        assert!(after.starts_with(&before));
        assert_eq!(store.load_sales().unwrap(), vec![first, second]);
    }

    #[test]
    fn failed_sync_removes_the_appended_entry() {
        let (_dir, store) = setup();
        store.append_sale(&sale(1, "Alice")).unwrap();
        let before = fs::read_to_string(store.sales_path()).unwrap();

        let mut file = OpenOptions::new().append(true).open(store.sales_path()).unwrap();
        let err = append_synced(&mut file, b"{\"half\":true}\n", |_| {
            Err(io::Error::other("sync failed"))
        })
        .unwrap_err();
        drop(file);

        assert_eq!(err.to_string(), "sync failed");
        assert_eq!(fs::read_to_string(store.sales_path()).unwrap(), before);
        assert_eq!(store.load_sales().unwrap().len(), 1);
    }

    #[test]
    fn missing_file_is_recreated_on_load() {
        let (_dir, store) = setup();
        fs::remove_file(store.cars_path()).unwrap();

        assert!(store.load_cars().unwrap().is_empty());
        assert!(store.cars_path().exists());
    }

    #[test]
    fn wrong_header_is_corrupt() {
        let (_dir, store) = setup();
        fs::write(store.cars_path(), "[\"Make\",\"Model\"]\n").unwrap();

        match store.load_cars() {
            Err(StoreError::Corrupt { .. }) => {}
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_line_is_corrupt_and_names_the_line() {
        let (_dir, store) = setup();
        store.replace_cars(&[car("Toyota", "Corolla", "20000")]).unwrap();
        let mut contents = fs::read_to_string(store.cars_path()).unwrap();
        contents.push_str("{not json}\n");
        fs::write(store.cars_path(), contents).unwrap();

        let err = store.load_cars().unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn unwritable_directory_is_unavailable() {
        let (dir, store) = setup();
        let broken = JsonLinesStore {
            cars_path: dir.path().join("missing-dir").join("cars.jsonl"),
            sales_path: store.sales_path().to_path_buf(),
        };

        match broken.replace_cars(&[car("Toyota", "Corolla", "20000")]) {
            Err(StoreError::Unavailable { .. }) => {}
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
