// File: ./src/model/mod.rs
pub mod dates;
pub mod display;
pub mod record;

pub use dates::{DateParser, EPOCH};
pub use display::RecordDisplay;
pub use record::{ClassifiedRecord, FEATURE_NAMES, ProductRecord, RawRecord, RecordId, Status};
