//! Flat record shape: identifier at the top level.

use catalogsync_shared::StoreId;
use serde_json::Value;

use super::{IdStrategy, id_from_value};

/// Matches `{"id": 7, ...}`, including `{"id": 7, "attributes": {...}}`.
pub struct FlatId;

impl IdStrategy for FlatId {
    fn extract(&self, record: &Value) -> Option<StoreId> {
        record.get("id").and_then(id_from_value)
    }

    fn name(&self) -> &str {
        "id"
    }
}
