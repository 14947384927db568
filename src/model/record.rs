// File: ./src/model/record.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Stable handle for a row: its 1-based position among the data rows of the
/// input file, assigned before any filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(RecordId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Status {
    Consumable,
    NotConsumable,
}

impl Status {
    pub fn is_consumable(&self) -> bool {
        matches!(self, Self::Consumable)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Consumable => "Consumable",
            Status::NotConsumable => "Not Consumable",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A row as read from the input, before its date cells are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub id: RecordId,
    pub item_name: String,
    pub manufacturing_date: String,
    pub expiry_date: String,
}

/// A row whose dates parsed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: RecordId,
    pub item_name: String,
    pub manufacturing_date: NaiveDateTime,
    pub expiry_date: NaiveDateTime,
}

/// Feature names in the order returned by [`ClassifiedRecord::features`].
pub const FEATURE_NAMES: [&str; 4] = [
    "Manufacturing Days",
    "Expiry Days",
    "Days Since Manufacturing",
    "Remaining Shelf Life",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub id: RecordId,
    pub item_name: String,
    pub manufacturing_date: NaiveDateTime,
    pub expiry_date: NaiveDateTime,
    pub manufacturing_days: i64,
    pub expiry_days: i64,
    pub days_since_manufacturing: i64,
    pub remaining_shelf_life: i64,
    pub status: Status,
}

impl ClassifiedRecord {
    pub fn features(&self) -> [i64; 4] {
        [
            self.manufacturing_days,
            self.expiry_days,
            self.days_since_manufacturing,
            self.remaining_shelf_life,
        ]
    }

    pub fn manufactured_on(&self) -> NaiveDate {
        self.manufacturing_date.date()
    }

    pub fn expires_on(&self) -> NaiveDate {
        self.expiry_date.date()
    }

    pub fn is_consumable(&self) -> bool {
        self.status.is_consumable()
    }
}
