//! Data-envelope record shapes.

use catalogsync_shared::StoreId;
use serde_json::Value;

use super::{IdStrategy, id_from_value};

/// Matches `{"data": {"id": 7, ...}}`.
pub struct DataId;

impl IdStrategy for DataId {
    fn extract(&self, record: &Value) -> Option<StoreId> {
        record.pointer("/data/id").and_then(id_from_value)
    }

    fn name(&self) -> &str {
        "data.id"
    }
}

/// Matches `{"data": {"documentId": "x7k2", ...}}`.
pub struct DataDocumentId;

impl IdStrategy for DataDocumentId {
    fn extract(&self, record: &Value) -> Option<StoreId> {
        record.pointer("/data/documentId").and_then(id_from_value)
    }

    fn name(&self) -> &str {
        "data.documentId"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_id() {
        assert_eq!(DataId.extract(&json!({"data": {"id": 7}})), Some(StoreId::Numeric(7)));
        assert_eq!(DataId.extract(&json!({"data": {"documentId": "x"}})), None);
        assert_eq!(DataId.extract(&json!({"data": [{"id": 7}]})), None);
    }

    #[test]
    fn data_document_id() {
        assert_eq!(
            DataDocumentId.extract(&json!({"data": {"id": 1, "documentId": "x7k2"}})),
            Some(StoreId::Document("x7k2".into()))
        );
        assert_eq!(DataDocumentId.extract(&json!({"id": 7})), None);
    }
}
