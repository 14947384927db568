// File: ./src/report.rs
//! Text and JSON rendering of a classification run, plus file export.
use crate::classifier::{ClassificationReport, ExcludedRow, Summary};
use crate::error::{Result, ShelfLifeError};
use crate::model::{ClassifiedRecord, RecordDisplay, Status};
use serde::Serialize;
use std::fmt::Write as _;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// Aggregate view: one proportional bar per status plus its share.
pub fn render_summary(report: &ClassificationReport, bar_width: usize) -> String {
    let summary = report.summary();
    let mut out = String::new();
    let _ = writeln!(out, "Overall Shelf Life Status (Consumable vs Not Consumable)");
    let _ = writeln!(out, "Evaluated on {}", report.evaluation_date.format("%Y-%m-%d"));
    let _ = writeln!(out);

    for (status, count, share) in summary.breakdown() {
        let cells = (share / 100.0 * bar_width as f64).round() as usize;
        let glyph = if status.is_consumable() { "█" } else { "▒" };
        let _ = writeln!(
            out,
            "{:<15} {}{} {:>5.1}% ({})",
            status.label(),
            glyph.repeat(cells),
            " ".repeat(bar_width.saturating_sub(cells)),
            share,
            count
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total: {}", summary.total);
    out.push_str(&render_excluded(&report.excluded));
    out
}

pub fn render_excluded(excluded: &[ExcludedRow]) -> String {
    if excluded.is_empty() {
        return String::new();
    }
    let mut out = format!("Excluded {} row(s) with invalid dates:\n", excluded.len());
    for row in excluded {
        let _ = writeln!(out, "  {}", row);
    }
    out
}

/// One line per record, in input order.
pub fn render_list(report: &ClassificationReport) -> String {
    let name_width = report
        .records
        .iter()
        .map(|r| r.item_name.width())
        .max()
        .unwrap_or(0)
        .max("Item Name".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {}  {:<10}  {:<10}  {:>6}  {:>9}  Status",
        "#",
        pad("Item Name", name_width),
        "Made",
        "Expires",
        "Age",
        "Remaining"
    );
    for r in &report.records {
        let _ = writeln!(
            out,
            "{:>5}  {}  {}  {}  {:>6}  {:>9}  {} {}",
            r.id,
            pad(&r.item_name, name_width),
            r.manufactured_on().format("%Y-%m-%d"),
            r.expires_on().format("%Y-%m-%d"),
            r.days_since_manufacturing,
            r.remaining_shelf_life,
            r.status_symbol(),
            r.status
        );
    }
    out.push_str(&render_excluded(&report.excluded));
    out
}

/// Detail block and shelf-life bar for one record.
pub fn render_detail(record: &ClassifiedRecord, bar_width: usize, scale_days: i64) -> String {
    let mut out = record.detail_lines().join("\n");
    let _ = write!(
        out,
        "\n\nRemaining Shelf Life for {}\n{}\n",
        record.item_name,
        record.shelf_life_bar(bar_width, scale_days)
    );
    out
}

// Pads by display width so names with wide characters still line up
fn pad(s: &str, width: usize) -> String {
    let w = s.width();
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

#[derive(Serialize)]
struct SummaryJson<'a> {
    evaluation_date: String,
    #[serde(flatten)]
    summary: Summary,
    consumable_share: f64,
    not_consumable_share: f64,
    excluded: &'a [ExcludedRow],
}

pub fn summary_json(report: &ClassificationReport) -> Result<String> {
    let summary = report.summary();
    to_json(&SummaryJson {
        evaluation_date: report.evaluation_date.format("%Y-%m-%d").to_string(),
        summary,
        consumable_share: summary.share(Status::Consumable),
        not_consumable_share: summary.share(Status::NotConsumable),
        excluded: &report.excluded,
    })
}

pub fn report_json(report: &ClassificationReport) -> Result<String> {
    to_json(report)
}

pub fn records_json(records: &[&ClassifiedRecord]) -> Result<String> {
    to_json(&records)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| ShelfLifeError::Serialization(e.to_string()))
}

/// Classified table as CSV: the input columns plus the derived features and
/// status, one row per surviving record.
pub fn records_csv(records: &[ClassifiedRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Id",
        "Item Name",
        "Date of Manufacturing",
        "Date of Expiry",
        "Manufacturing Days",
        "Expiry Days",
        "Days Since Manufacturing",
        "Remaining Shelf Life",
        "Status",
    ])?;
    for r in records {
        let [mfg_days, exp_days, age, remaining] = r.features();
        writer.write_record([
            r.id.to_string(),
            r.item_name.clone(),
            r.manufacturing_date.format("%Y-%m-%d %H:%M:%S").to_string(),
            r.expiry_date.format("%Y-%m-%d %H:%M:%S").to_string(),
            mfg_days.to_string(),
            exp_days.to_string(),
            age.to_string(),
            remaining.to_string(),
            // Numeric flag, 1 = consumable
            u8::from(r.is_consumable()).to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ShelfLifeError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ShelfLifeError::Serialization(e.to_string()))
}

pub fn export(report: &ClassificationReport, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => records_csv(&report.records),
        ExportFormat::Json => report_json(report),
    }
}
