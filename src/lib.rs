// Crate root library declaration and module exports.
pub mod classifier;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
pub mod storage;

pub use classifier::{
    ClassificationReport, Classifier, ExcludedRow, ExclusionReason, InvalidDatePolicy, Summary,
    classify,
};
pub use error::ShelfLifeError;
pub use model::{ClassifiedRecord, ProductRecord, RawRecord, RecordId, Status};
