//! Import orchestration for catalogsync.
//!
//! This crate ties together catalog retrieval, category registration,
//! product registration, and image attachment into one run (`run_import`).

pub mod categories;
pub mod observer;
pub mod pipeline;
pub mod products;

#[cfg(test)]
mod testutil;

pub use categories::{CategoryMap, CategoryOutcome, register_categories};
pub use observer::{ImportEvent, ImportObserver, ImportStage, RecordingObserver, SilentObserver};
pub use pipeline::{ImportReport, preview_categories, run_import};
pub use products::{ProductOutcome, register_products};
