//! Identifier extraction from version-variable store records.
//!
//! Depending on its version and configuration the store answers a create
//! request with the identifier at the top level (`{"id": 7}`), wrapped in a
//! data envelope (`{"data": {"id": 7}}`), or only as a document id
//! (`{"data": {"documentId": "x7k2"}}`). Each shape is one [`IdStrategy`];
//! the registry tries them in priority order and the first match wins.

mod flat;
mod wrapped;

use catalogsync_shared::{CatalogError, Result, StoreId};
use serde_json::Value;

pub use flat::FlatId;
pub use wrapped::{DataDocumentId, DataId};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// One way of locating the identifier inside a store record.
pub trait IdStrategy: Send + Sync {
    /// Return the identifier if the record has this strategy's shape.
    fn extract(&self, record: &Value) -> Option<StoreId>;

    /// Human-readable strategy name for tracing.
    fn name(&self) -> &str;
}

/// Interpret a JSON scalar as a store identifier.
///
/// Integers become [`StoreId::Numeric`], non-empty strings
/// [`StoreId::Document`]. Anything else (null, floats, objects) is
/// not an identifier.
pub(crate) fn id_from_value(value: &Value) -> Option<StoreId> {
    match value {
        Value::Number(n) => n.as_i64().map(StoreId::Numeric),
        Value::String(s) if !s.is_empty() => Some(StoreId::Document(s.clone())),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Holds identifier strategies in priority order.
pub struct ExtractorRegistry {
    strategies: Vec<Box<dyn IdStrategy>>,
}

impl ExtractorRegistry {
    /// Create a registry with the built-in strategies:
    /// flat `id`, then `data.id`, then `data.documentId`.
    pub fn new() -> Self {
        Self {
            strategies: vec![Box::new(FlatId), Box::new(DataId), Box::new(DataDocumentId)],
        }
    }

    /// Append a strategy with the lowest priority.
    pub fn with_strategy(mut self, strategy: Box<dyn IdStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Extract the identifier from `record`.
    ///
    /// A record that matches no strategy is an error rather than a missing
    /// identifier, so callers never proceed with an unknown id.
    pub fn extract_id(&self, record: &Value) -> Result<StoreId> {
        for strategy in &self.strategies {
            if let Some(id) = strategy.extract(record) {
                tracing::trace!(strategy = strategy.name(), %id, "identifier extracted");
                return Ok(id);
            }
        }

        Err(CatalogError::shape(format!(
            "no identifier found in record {}",
            truncate(&record.to_string(), 200)
        )))
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Name reported by a category record, wherever the shape puts it.
///
/// Checks `data.name`, `data.attributes.name`, `attributes.name`, then `name`.
pub fn record_name(record: &Value) -> Option<&str> {
    const POINTERS: [&str; 4] = ["/data/name", "/data/attributes/name", "/attributes/name", "/name"];

    POINTERS
        .iter()
        .find_map(|p| record.pointer(p).and_then(Value::as_str))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_wrapped_and_attributes_wrapped_agree() {
        let registry = ExtractorRegistry::new();

        let wrapped = json!({"data": {"id": 7}});
        let attributed = json!({"id": 7, "attributes": {"name": "A"}});

        assert_eq!(registry.extract_id(&wrapped).unwrap(), StoreId::Numeric(7));
        assert_eq!(registry.extract_id(&attributed).unwrap(), StoreId::Numeric(7));
    }

    #[test]
    fn flat_id_takes_priority_over_data() {
        let registry = ExtractorRegistry::new();
        let record = json!({"id": 3, "data": {"id": 9}});
        assert_eq!(registry.extract_id(&record).unwrap(), StoreId::Numeric(3));
    }

    #[test]
    fn numeric_id_preferred_over_document_id() {
        let registry = ExtractorRegistry::new();
        let record = json!({"data": {"id": 12, "documentId": "k2p9x"}});
        assert_eq!(registry.extract_id(&record).unwrap(), StoreId::Numeric(12));
    }

    #[test]
    fn document_id_fallback() {
        let registry = ExtractorRegistry::new();
        let record = json!({"data": {"documentId": "k2p9x", "name": "A"}});
        assert_eq!(
            registry.extract_id(&record).unwrap(),
            StoreId::Document("k2p9x".into())
        );
    }

    #[test]
    fn unrecognized_shape_is_error() {
        let registry = ExtractorRegistry::new();

        for record in [
            json!({}),
            json!({"data": null}),
            json!({"data": {"id": null}}),
            json!({"result": {"id": 4}}),
        ] {
            let err = registry.extract_id(&record).unwrap_err();
            assert!(matches!(err, CatalogError::Shape { .. }), "{record}");
        }
    }

    struct ResultId;

    impl IdStrategy for ResultId {
        fn extract(&self, record: &Value) -> Option<StoreId> {
            record.pointer("/result/id").and_then(id_from_value)
        }

        fn name(&self) -> &str {
            "result.id"
        }
    }

    #[test]
    fn registry_is_extensible() {
        let registry = ExtractorRegistry::new().with_strategy(Box::new(ResultId));
        let record = json!({"result": {"id": 4}});
        assert_eq!(registry.extract_id(&record).unwrap(), StoreId::Numeric(4));
    }

    #[test]
    fn record_name_across_shapes() {
        assert_eq!(record_name(&json!({"data": {"name": "A"}})), Some("A"));
        assert_eq!(
            record_name(&json!({"data": {"id": 1, "attributes": {"name": "B"}}})),
            Some("B")
        );
        assert_eq!(record_name(&json!({"id": 7, "attributes": {"name": "C"}})), Some("C"));
        assert_eq!(record_name(&json!({"id": 7, "name": "D"})), Some("D"));
        assert_eq!(record_name(&json!({"id": 7})), None);
    }
}
