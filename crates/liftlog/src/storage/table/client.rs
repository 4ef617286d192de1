//! Backend-neutral access to a partitioned table.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use liftlog_core::storage::Result;

/// A stored item: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

/// Physical hash and range key of a stored item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableKey {
    pub pk: String,
    pub sk: String,
}

/// Precondition attached to a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCondition {
    /// The key must be absent (create).
    MustNotExist,
    /// The key must be present (replace, delete).
    MustExist,
}

/// Whether a conditional write was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    ConditionFailed,
}

/// One page of a scan.
#[derive(Debug, Default)]
pub struct ScanPage {
    pub items: Vec<Item>,
    /// Continuation key; `None` on the last page.
    pub next: Option<Item>,
}

/// Operations the table store needs from a backend.
#[async_trait]
pub trait TableClient: Send + Sync {
    /// Returns the items matching both key components (zero or one).
    async fn query(&self, key: &TableKey) -> Result<Vec<Item>>;

    /// Returns one page of items whose `entityType` equals `entity_type`,
    /// starting after `start`.
    async fn scan_page(&self, entity_type: &str, start: Option<Item>) -> Result<ScanPage>;

    /// Writes a whole item if `condition` holds.
    async fn put(&self, item: Item, condition: WriteCondition) -> Result<WriteOutcome>;

    /// Deletes an item if `condition` holds.
    async fn delete(&self, key: &TableKey, condition: WriteCondition) -> Result<WriteOutcome>;
}
