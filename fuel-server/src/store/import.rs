//! Bulk import of stations from the OPIS price feed CSV.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::domain::NewStation;

use super::error::StoreError;

/// One row of the price feed, keyed by its header names.
#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "OPIS Truckstop ID")]
    truckstop_id: i64,
    #[serde(rename = "Truckstop Name")]
    name: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Rack ID")]
    rack_id: i64,
    #[serde(rename = "Retail Price")]
    price: f64,
}

impl From<PriceRow> for NewStation {
    fn from(row: PriceRow) -> Self {
        NewStation {
            truckstop_id: row.truckstop_id,
            name: row.name,
            address: row.address,
            city: row.city,
            state: row.state,
            rack_id: row.rack_id,
            price: row.price,
        }
    }
}

fn csv_error(e: csv::Error) -> StoreError {
    StoreError::Csv {
        line: e.position().map(|p| p.line()),
        message: e.to_string(),
    }
}

/// Read all rows of a price feed. Fails on the first malformed row.
///
/// A retail price must be a finite, non-negative number.
pub fn read_price_rows<R: Read>(reader: R) -> Result<Vec<NewStation>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let row: PriceRow = record.deserialize(Some(&headers)).map_err(csv_error)?;
        if !row.price.is_finite() || row.price < 0.0 {
            return Err(StoreError::Csv {
                line: record.position().map(|p| p.line()),
                message: format!("invalid retail price {}", row.price),
            });
        }
        rows.push(NewStation::from(row));
    }
    Ok(rows)
}

/// Read a price feed file.
pub fn read_price_file(path: impl AsRef<Path>) -> Result<Vec<NewStation>, StoreError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    read_price_rows(file)
}
