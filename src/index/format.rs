//! On-disk layout of the index file
//!
//! ```text
//! {
//!     "tamano": 100,
//!     "datos": [
//!         { "indice": 14, "elementos": [ { "id_juego": "...", "posicion_inventario": 0 } ] }
//!     ]
//! }
//! ```
//!
//! Only non-empty buckets are written. `elementos` keeps chain order.

use serde::{Deserialize, Serialize};

/// Whole index file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFile {
    /// Number of buckets the table was written with
    #[serde(rename = "tamano")]
    pub table_size: usize,
    /// Non-empty buckets in ascending bucket order
    #[serde(rename = "datos")]
    pub buckets: Vec<BucketRecord>,
}

/// One non-empty bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRecord {
    #[serde(rename = "indice")]
    pub bucket: usize,
    #[serde(rename = "elementos")]
    pub entries: Vec<EntryRecord>,
}

/// One chained entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(rename = "id_juego")]
    pub key: String,
    #[serde(rename = "posicion_inventario")]
    pub position: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_names() {
        let file = IndexFile {
            table_size: 10,
            buckets: vec![BucketRecord {
                bucket: 3,
                entries: vec![EntryRecord {
                    key: "b11".to_string(),
                    position: 1,
                }],
            }],
        };

        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(
            value,
            json!({
                "tamano": 10,
                "datos": [
                    { "indice": 3, "elementos": [ { "id_juego": "b11", "posicion_inventario": 1 } ] }
                ]
            })
        );
    }

    #[test]
    fn test_missing_field_rejected() {
        let result: Result<IndexFile, _> =
            serde_json::from_value(json!({ "tamano": 10, "datos": [ { "indice": 1 } ] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_position_rejected() {
        let result: Result<IndexFile, _> = serde_json::from_value(json!({
            "tamano": 10,
            "datos": [ { "indice": 1, "elementos": [ { "id_juego": "a1", "posicion_inventario": -1 } ] } ]
        }));
        assert!(result.is_err());
    }
}
