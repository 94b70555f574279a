//! Core domain types for catalog imports.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A category name as it appears in the source catalog.
pub type CategoryName = String;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one import run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Source catalog
// ---------------------------------------------------------------------------

/// One product record from the external catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceProduct {
    /// Catalog-side identifier.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: f64,
    /// Long-form description.
    pub description: String,
    /// Category name (free text, shared across products).
    pub category: CategoryName,
    /// Absolute URL of the product image.
    pub image: String,
    /// Aggregated customer rating.
    pub rating: Rating,
}

/// Aggregated rating attached to a [`SourceProduct`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score.
    pub rate: f64,
    /// Number of ratings.
    pub count: u32,
}

// ---------------------------------------------------------------------------
// StoreId
// ---------------------------------------------------------------------------

/// Identifier assigned by the target store.
///
/// Depending on the store version this is a numeric `id` or an opaque
/// `documentId` string. It is sent back in the same form it was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreId {
    Numeric(i64),
    Document(String),
}

impl std::fmt::Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Document(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StoreId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<&str> for StoreId {
    fn from(s: &str) -> Self {
        Self::Document(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Target records
// ---------------------------------------------------------------------------

/// A category as registered in the target store, normalized from whatever
/// response shape the store returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    /// Name the category was created under.
    pub name: CategoryName,
    /// Store-assigned identifier.
    pub id: StoreId,
}

/// Body of a "create product" request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub title: String,
    pub price: f64,
    pub description: String,
    /// Flattened `rating.rate` of the source product.
    pub rating: f64,
    /// Identifier of the owning category.
    pub category: StoreId,
}

impl ProductPayload {
    /// Build the store payload for `product` under the resolved category.
    pub fn from_source(product: &SourceProduct, category: StoreId) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            rating: product.rating.rate,
            category,
        }
    }
}

/// Identifies which record and field a media upload binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescriptor {
    /// Content type of the owning record (e.g. `product`).
    pub reference_type: String,
    /// Identifier of the owning record.
    pub reference_id: StoreId,
    /// Media field on the owning record.
    pub field_name: String,
}

impl RelationDescriptor {
    /// Descriptor for the `image` field of a product.
    pub fn product_image(product_id: StoreId) -> Self {
        Self {
            reference_type: "product".into(),
            reference_id: product_id,
            field_name: "image".into(),
        }
    }

    /// Fully qualified content-type UID used by the store's upload API
    /// (`api::<type>.<type>`).
    pub fn reference_uid(&self) -> String {
        format!("api::{0}.{0}", self.reference_type)
    }
}
