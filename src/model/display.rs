// File: ./src/model/display.rs
use crate::model::record::{ClassifiedRecord, Status};

pub trait RecordDisplay {
    fn status_symbol(&self) -> &'static str;
    fn detail_lines(&self) -> Vec<String>;
    fn shelf_life_bar(&self, width: usize, scale_days: i64) -> String;
}

impl RecordDisplay for ClassifiedRecord {
    fn status_symbol(&self) -> &'static str {
        match self.status {
            Status::Consumable => "✔",
            Status::NotConsumable => "❌",
        }
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("Product Name:             {}", self.item_name),
            format!("Record:                   #{}", self.id),
            format!(
                "Manufacturing Date:       {}",
                self.manufactured_on().format("%Y-%m-%d")
            ),
            format!(
                "Expiry Date:              {}",
                self.expires_on().format("%Y-%m-%d")
            ),
            format!(
                "Days Since Manufacturing: {} days",
                self.days_since_manufacturing
            ),
            format!("Remaining Shelf Life:     {} days", self.remaining_shelf_life),
            format!("Status:                   {}", self.status),
        ]
    }

    /// Horizontal bar for the remaining shelf life, scaled so that
    /// `scale_days` fills `width` cells. Expired stock is drawn with a
    /// lighter shade to the same scale.
    fn shelf_life_bar(&self, width: usize, scale_days: i64) -> String {
        let days = self.remaining_shelf_life;
        let scale = scale_days.max(days.abs()).max(1);
        let cells = ((days.unsigned_abs() as f64 / scale as f64) * width as f64).round() as usize;
        // Non-zero values always get at least one cell, unless bars are off
        let cells = if days != 0 && width > 0 { cells.max(1) } else { cells };
        let glyph = if days >= 0 { "█" } else { "░" };
        format!(
            "{}{} {} {} days",
            glyph.repeat(cells),
            " ".repeat(width.saturating_sub(cells)),
            self.status_symbol(),
            days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::RecordId;
    use chrono::NaiveDate;

    fn record(remaining: i64, status: Status) -> ClassifiedRecord {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        ClassifiedRecord {
            id: RecordId(3),
            item_name: "Milk".to_string(),
            manufacturing_date: d,
            expiry_date: d,
            manufacturing_days: 0,
            expiry_days: 0,
            days_since_manufacturing: 0,
            remaining_shelf_life: remaining,
            status,
        }
    }

    #[test]
    fn bar_scales_to_width() {
        let r = record(50, Status::Consumable);
        assert_eq!(r.shelf_life_bar(10, 100), format!("{}{} ✔ 50 days", "█".repeat(5), " ".repeat(5)));
        // Value larger than the scale saturates the bar
        assert_eq!(r.shelf_life_bar(4, 10), "████ ✔ 50 days");
    }

    #[test]
    fn expired_bar_uses_light_shade() {
        let r = record(-30, Status::NotConsumable);
        assert_eq!(r.shelf_life_bar(3, 30), "░░░ ❌ -30 days");
        let zero = record(0, Status::NotConsumable);
        assert_eq!(zero.shelf_life_bar(2, 30), "   ❌ 0 days");
    }

    #[test]
    fn zero_width_draws_no_cells() {
        let r = record(5, Status::Consumable);
        assert_eq!(r.shelf_life_bar(0, 100), " ✔ 5 days");
        let expired = record(-400, Status::NotConsumable);
        assert_eq!(expired.shelf_life_bar(0, 10), " ❌ -400 days");
    }

    #[test]
    fn detail_mentions_every_field() {
        let lines = record(12, Status::Consumable).detail_lines();
        assert!(lines[0].ends_with("Milk"));
        assert!(lines[1].ends_with("#3"));
        assert!(lines[2].ends_with("2024-01-01"));
        assert!(lines[5].ends_with("12 days"));
        assert!(lines[6].ends_with("Consumable"));
    }
}
