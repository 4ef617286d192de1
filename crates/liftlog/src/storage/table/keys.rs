//! Table key generation functions.
//!
//! Pure functions for building the stored keys and expressions of the shared
//! table. All functions are sync and have no side effects.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use liftlog_core::storage::CompoundKey;

use super::client::TableKey;

// ============================================================================
// Attribute names
// ============================================================================

pub const PK: &str = "PK";
pub const SK: &str = "SK";
pub const ENTITY_TYPE: &str = "entityType";

// ============================================================================
// Key prefixes
// ============================================================================

pub const WORKOUT_PREFIX: &str = "WORKOUT#";
pub const COMMENT_PREFIX: &str = "COMMENT#";

// ============================================================================
// Expressions
// ============================================================================

/// Point lookup synthesized from both key components.
pub const KEY_CONDITION: &str = "PK = :pk AND SK = :sk";

/// Scan filter restricting a listing to one record type.
pub const ENTITY_TYPE_FILTER: &str = "#entityType = :entityType";

/// Condition for a create that must not overwrite.
pub const MUST_NOT_EXIST: &str = "attribute_not_exists(PK)";

/// Condition for an update or delete of a present item.
pub const MUST_EXIST: &str = "attribute_exists(PK)";

/// Stored partition key.
///
/// Pattern: `<PREFIX><partition>`, e.g. `WORKOUT#Fake`
pub fn partition_key(prefix: &str, partition: &str) -> String {
    format!("{prefix}{partition}")
}

/// Recovers the caller's partition from a stored partition key.
pub fn strip_partition_prefix<'a>(prefix: &str, stored: &'a str) -> Option<&'a str> {
    stored.strip_prefix(prefix)
}

/// Physical table key for a record key. The row is stored verbatim.
pub fn table_key(prefix: &str, key: &CompoundKey) -> TableKey {
    TableKey {
        pk: partition_key(prefix, &key.partition),
        sk: key.row.clone(),
    }
}

/// Expression values bound by [`KEY_CONDITION`].
pub fn key_condition_values(key: &TableKey) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (":pk".to_string(), AttributeValue::S(key.pk.clone())),
        (":sk".to_string(), AttributeValue::S(key.sk.clone())),
    ])
}

/// Expression names and values bound by [`ENTITY_TYPE_FILTER`].
pub fn entity_type_filter(
    entity_type: &str,
) -> (HashMap<String, String>, HashMap<String, AttributeValue>) {
    (
        HashMap::from([("#entityType".to_string(), ENTITY_TYPE.to_string())]),
        HashMap::from([(
            ":entityType".to_string(),
            AttributeValue::S(entity_type.to_string()),
        )]),
    )
}
