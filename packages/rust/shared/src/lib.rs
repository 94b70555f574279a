//! Shared types, error model, and configuration for catalogsync.
//!
//! This crate is the foundation depended on by all other catalogsync crates.
//! It provides:
//! - [`CatalogError`]: the unified error type
//! - Domain types ([`SourceProduct`], [`StoreId`], [`CategoryRef`], [`RelationDescriptor`])
//! - Configuration ([`AppConfig`], [`ImportConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ImportConfig, SourceConfig, StoreConfig, config_dir, config_file_path,
    init_config, init_config_at, load_config, load_config_from,
};
pub use error::{CatalogError, Result};
pub use types::{
    CategoryName, CategoryRef, ProductPayload, Rating, RelationDescriptor, RunId, SourceProduct,
    StoreId,
};
