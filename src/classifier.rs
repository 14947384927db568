// File: ./src/classifier.rs
//! Shelf-life classification.
//!
//! Every derived value is computed against a single evaluation date that the
//! caller captures once and passes in. Nothing in here reads the clock.
use crate::error::{Result, ShelfLifeError};
use crate::model::dates::{DateParser, days_between, days_since_epoch};
use crate::model::{ClassifiedRecord, ProductRecord, RawRecord, RecordId, Status};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;

/// What to do with a row whose date cells cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InvalidDatePolicy {
    /// Leave the row out and report it in [`ClassificationReport::excluded`].
    #[default]
    Drop,
    /// Fail the whole run on the first bad row.
    Reject,
}

impl fmt::Display for InvalidDatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidDatePolicy::Drop => write!(f, "drop"),
            InvalidDatePolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Why a date cell was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    EmptyValue,
    UnrecognisedDate,
}

impl ExclusionReason {
    fn for_value(value: &str) -> Self {
        if value.trim().is_empty() {
            ExclusionReason::EmptyValue
        } else {
            ExclusionReason::UnrecognisedDate
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::EmptyValue => write!(f, "empty value"),
            ExclusionReason::UnrecognisedDate => write!(f, "unrecognised date"),
        }
    }
}

/// A row left out of the classified output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRow {
    pub id: RecordId,
    pub item_name: String,
    pub column: String,
    pub value: String,
    pub reason: ExclusionReason,
}

impl fmt::Display for ExcludedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}: {} in {} '{}'",
            self.id, self.item_name, self.reason, self.column, self.value
        )
    }
}

/// Status rule.
///
/// Manufacturing after expiry is never consumable. Otherwise the product is
/// consumable only while its expiry day lies strictly after the evaluation day.
pub fn status_for(
    manufacturing: NaiveDateTime,
    expiry: NaiveDateTime,
    evaluation_date: NaiveDate,
) -> Status {
    if manufacturing > expiry {
        return Status::NotConsumable;
    }
    if expiry.date() > evaluation_date {
        Status::Consumable
    } else {
        Status::NotConsumable
    }
}

pub fn classify_record(record: &ProductRecord, evaluation_date: NaiveDate) -> ClassifiedRecord {
    let manufactured = record.manufacturing_date.date();
    let expires = record.expiry_date.date();

    ClassifiedRecord {
        id: record.id,
        item_name: record.item_name.clone(),
        manufacturing_date: record.manufacturing_date,
        expiry_date: record.expiry_date,
        manufacturing_days: days_since_epoch(manufactured),
        expiry_days: days_since_epoch(expires),
        days_since_manufacturing: days_between(manufactured, evaluation_date),
        remaining_shelf_life: days_between(evaluation_date, expires),
        status: status_for(record.manufacturing_date, record.expiry_date, evaluation_date),
    }
}

/// Classifies already-parsed records, one output per input, order preserved.
pub fn classify(records: &[ProductRecord], evaluation_date: NaiveDate) -> Vec<ClassifiedRecord> {
    records
        .iter()
        .map(|r| classify_record(r, evaluation_date))
        .collect()
}

/// Column labels used when reporting a bad cell.
#[derive(Debug, Clone)]
pub struct ColumnLabels {
    pub manufacturing: String,
    pub expiry: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            manufacturing: "Date of Manufacturing".to_string(),
            expiry: "Date of Expiry".to_string(),
        }
    }
}

/// Parses raw rows and classifies the ones that survive.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    pub parser: DateParser,
    pub policy: InvalidDatePolicy,
    pub columns: ColumnLabels,
}

impl Classifier {
    pub fn new(parser: DateParser, policy: InvalidDatePolicy) -> Self {
        Self {
            parser,
            policy,
            columns: ColumnLabels::default(),
        }
    }

    pub fn with_columns(mut self, columns: ColumnLabels) -> Self {
        self.columns = columns;
        self
    }

    /// Interprets the date cells of one row. The manufacturing column is
    /// checked first, so a row with two bad cells reports that one.
    pub fn parse_record(
        &self,
        raw: &RawRecord,
    ) -> std::result::Result<ProductRecord, ExcludedRow> {
        let exclude = |column: &str, value: &str| ExcludedRow {
            id: raw.id,
            item_name: raw.item_name.clone(),
            column: column.to_string(),
            value: value.to_string(),
            reason: ExclusionReason::for_value(value),
        };

        let manufacturing_date = self
            .parser
            .parse(&raw.manufacturing_date)
            .ok_or_else(|| exclude(&self.columns.manufacturing, &raw.manufacturing_date))?;
        let expiry_date = self
            .parser
            .parse(&raw.expiry_date)
            .ok_or_else(|| exclude(&self.columns.expiry, &raw.expiry_date))?;

        Ok(ProductRecord {
            id: raw.id,
            item_name: raw.item_name.clone(),
            manufacturing_date,
            expiry_date,
        })
    }

    pub fn run(&self, rows: &[RawRecord], evaluation_date: NaiveDate) -> Result<ClassificationReport> {
        let mut products = Vec::with_capacity(rows.len());
        let mut excluded = Vec::new();

        for raw in rows {
            match self.parse_record(raw) {
                Ok(p) => products.push(p),
                Err(row) => match self.policy {
                    InvalidDatePolicy::Reject => {
                        return Err(ShelfLifeError::InvalidDate {
                            id: row.id,
                            column: row.column,
                            value: row.value,
                        });
                    }
                    InvalidDatePolicy::Drop => {
                        log::warn!("Excluding row {}", row);
                        excluded.push(row);
                    }
                },
            }
        }

        let records = classify(&products, evaluation_date);
        log::info!(
            "Classified {} records against {} ({} excluded)",
            records.len(),
            evaluation_date,
            excluded.len()
        );

        Ok(ClassificationReport {
            evaluation_date,
            records,
            excluded,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub evaluation_date: NaiveDate,
    pub records: Vec<ClassifiedRecord>,
    pub excluded: Vec<ExcludedRow>,
}

impl ClassificationReport {
    pub fn summary(&self) -> Summary {
        Summary::from_records(&self.records)
    }

    pub fn get(&self, id: RecordId) -> Option<&ClassifiedRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Case-insensitive exact match on the item name. Names are not unique, so
    /// every match is returned in input order.
    pub fn find_by_name(&self, name: &str) -> Vec<&ClassifiedRecord> {
        let needle = name.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.item_name.trim().to_lowercase() == needle)
            .collect()
    }

    /// Whether `id` was present in the input but left out.
    pub fn excluded_row(&self, id: RecordId) -> Option<&ExcludedRow> {
        self.excluded.iter().find(|r| r.id == id)
    }

    /// Largest absolute remaining shelf life, used to scale bars.
    pub fn shelf_life_scale(&self) -> i64 {
        self.records
            .iter()
            .map(|r| r.remaining_shelf_life.abs())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub consumable: usize,
    pub not_consumable: usize,
    pub total: usize,
}

impl Summary {
    pub fn from_records(records: &[ClassifiedRecord]) -> Self {
        let consumable = records.iter().filter(|r| r.is_consumable()).count();
        Self {
            consumable,
            not_consumable: records.len() - consumable,
            total: records.len(),
        }
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Consumable => self.consumable,
            Status::NotConsumable => self.not_consumable,
        }
    }

    /// Percentage of records with `status`; 0.0 when there are none at all.
    pub fn share(&self, status: Status) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(status) as f64 * 100.0 / self.total as f64
    }

    pub fn breakdown(&self) -> Vec<(Status, usize, f64)> {
        Status::iter()
            .map(|s| (s, self.count(s), self.share(s)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn expiry_on_evaluation_day_is_not_consumable() {
        assert_eq!(
            status_for(at("2024-01-01"), at("2024-06-01"), day("2024-06-01")),
            Status::NotConsumable
        );
        assert_eq!(
            status_for(at("2024-01-01"), at("2024-06-01"), day("2024-05-31")),
            Status::Consumable
        );
    }

    #[test]
    fn time_of_day_on_expiry_is_ignored_for_status() {
        let late_expiry = day("2024-06-01").and_hms_opt(23, 59, 0).unwrap();
        assert_eq!(
            status_for(at("2024-01-01"), late_expiry, day("2024-06-01")),
            Status::NotConsumable
        );
    }

    #[test]
    fn same_day_manufacture_later_in_the_day_is_not_consumable() {
        // Timestamps, not dates, decide the ordering check
        let mfg = day("2024-06-01").and_hms_opt(12, 0, 0).unwrap();
        let exp = day("2024-06-01").and_hms_opt(8, 0, 0).unwrap();
        assert_eq!(status_for(mfg, exp, day("2024-01-01")), Status::NotConsumable);
    }

    #[test]
    fn empty_summary_has_zero_shares() {
        let s = Summary::from_records(&[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.share(Status::Consumable), 0.0);
        assert_eq!(s.share(Status::NotConsumable), 0.0);
    }
}
