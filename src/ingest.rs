// File: ./src/ingest.rs
//! CSV ingest: resolves the three required columns and yields raw rows.
//! Date cells are left as text here; interpretation belongs to the classifier.
use crate::error::{Result, ShelfLifeError};
use crate::model::{RawRecord, RecordId};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct InputOptions {
    pub item_column: String,
    pub manufacturing_column: String,
    pub expiry_column: String,
    pub delimiter: u8,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            item_column: "Item Name".to_string(),
            manufacturing_column: "Date of Manufacturing".to_string(),
            expiry_column: "Date of Expiry".to_string(),
            delimiter: b',',
        }
    }
}

struct ColumnIndex {
    item: usize,
    manufacturing: usize,
    expiry: usize,
}

pub fn read_csv_path(path: &Path, options: &InputOptions) -> Result<Vec<RawRecord>> {
    let file = File::open(path)?;
    log::debug!("Reading {}", path.display());
    read_csv(file, options)
}

pub fn read_csv<R: Read>(input: R, options: &InputOptions) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers, options)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // Short rows read as empty cells, which then fail date parsing
        let cell = |i: usize| record.get(i).unwrap_or("").to_string();
        rows.push(RawRecord {
            id: RecordId(idx as u64 + 1),
            item_name: cell(columns.item),
            manufacturing_date: cell(columns.manufacturing),
            expiry_date: cell(columns.expiry),
        });
    }

    log::debug!("Read {} data rows", rows.len());
    Ok(rows)
}

fn resolve_columns(headers: &StringRecord, options: &InputOptions) -> Result<ColumnIndex> {
    let mut map: HashMap<String, usize> = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins on duplicate headers
        map.entry(normalize_header(name)).or_insert(idx);
    }

    let lookup = |name: &str| {
        map.get(&normalize_header(name))
            .copied()
            .ok_or_else(|| ShelfLifeError::MissingColumn(name.to_string()))
    };

    Ok(ColumnIndex {
        item: lookup(&options.item_column)?,
        manufacturing: lookup(&options.manufacturing_column)?,
        expiry: lookup(&options.expiry_column)?,
    })
}

fn normalize_header(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a BOM
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case_bom_and_padding() {
        let csv = "\u{feff}item name , DATE OF MANUFACTURING,Date of Expiry\nMilk,2024-01-01,2024-02-01\n";
        let rows = read_csv(csv.as_bytes(), &InputOptions::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_name, "Milk");
        assert_eq!(rows[0].expiry_date, "2024-02-01");
    }

    #[test]
    fn duplicate_headers_use_the_first() {
        let csv = "Item Name,Date of Manufacturing,Date of Expiry,Item Name\nA,2024-01-01,2024-02-01,B\n";
        let rows = read_csv(csv.as_bytes(), &InputOptions::default()).unwrap();
        assert_eq!(rows[0].item_name, "A");
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "Item Name,Date of Expiry\nMilk,2024-02-01\n";
        let err = read_csv(csv.as_bytes(), &InputOptions::default()).unwrap_err();
        assert!(matches!(err, ShelfLifeError::MissingColumn(ref c) if c == "Date of Manufacturing"));
    }
}
