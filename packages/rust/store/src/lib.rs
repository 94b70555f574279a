//! Typed client for the target content store.
//!
//! This crate provides:
//! - [`StoreClient`]: create categories and products, upload media
//! - [`extract`]: ordered strategies that normalize the store's record shapes
//! - [`MediaUploader`]: download a remote image and attach it to a record
//! - [`slugify`]: URL-safe tokens for category slugs

pub mod client;
pub mod extract;
pub mod media;
mod slug;

pub use client::StoreClient;
pub use extract::{DataDocumentId, DataId, ExtractorRegistry, FlatId, IdStrategy, record_name};
pub use media::{MediaFile, MediaUploader, filename_from_url};
pub use slug::slugify;
