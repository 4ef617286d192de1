//! In-process table used for development and tests.

use std::{collections::BTreeMap, ops::Bound};

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use liftlog_core::storage::{RepositoryError, Result};
use tokio::sync::RwLock;

use super::client::{Item, ScanPage, TableClient, TableKey, WriteCondition, WriteOutcome};
use super::keys::{ENTITY_TYPE, PK, SK};

/// Default number of items evaluated per scan page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A sorted, paged table held in memory.
///
/// Scans evaluate at most `page_size` items per call before filtering, like
/// a DynamoDB scan with a `Limit`, so a page may come back empty while a
/// continuation key is still returned.
pub struct InMemoryTable {
    items: RwLock<BTreeMap<TableKey, Item>>,
    page_size: usize,
}

impl InMemoryTable {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates a table returning at most `page_size` evaluated items per scan.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }

    /// Number of stored items across every record type.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Stores an item with no condition and no decoding.
    #[cfg(test)]
    pub async fn insert_raw(&self, item: Item) -> Result<()> {
        let key = key_of(&item)?;
        self.items.write().await.insert(key, item);
        Ok(())
    }
}

impl Default for InMemoryTable {
    fn default() -> Self {
        Self::new()
    }
}

fn key_of(item: &Item) -> Result<TableKey> {
    let attr = |name: &str| {
        item.get(name)
            .and_then(|v| v.as_s().ok())
            .cloned()
            .ok_or_else(|| RepositoryError::InvalidData(format!("Item is missing key attribute {name}")))
    };

    Ok(TableKey {
        pk: attr(PK)?,
        sk: attr(SK)?,
    })
}

fn condition_holds(exists: bool, condition: WriteCondition) -> bool {
    match condition {
        WriteCondition::MustNotExist => !exists,
        WriteCondition::MustExist => exists,
    }
}

#[async_trait]
impl TableClient for InMemoryTable {
    async fn query(&self, key: &TableKey) -> Result<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned().into_iter().collect())
    }

    async fn scan_page(&self, entity_type: &str, start: Option<Item>) -> Result<ScanPage> {
        let lower = match start {
            Some(start) => Bound::Excluded(key_of(&start)?),
            None => Bound::Unbounded,
        };

        let items = self.items.read().await;
        let mut evaluated = items.range((lower, Bound::Unbounded));
        let wanted = AttributeValue::S(entity_type.to_string());

        let mut page = ScanPage::default();
        let mut last = None;
        for (key, item) in evaluated.by_ref().take(self.page_size) {
            if item.get(ENTITY_TYPE) == Some(&wanted) {
                page.items.push(item.clone());
            }
            last = Some(key);
        }

        if evaluated.next().is_some() {
            page.next = last.map(|key| {
                Item::from([
                    (PK.to_string(), AttributeValue::S(key.pk.clone())),
                    (SK.to_string(), AttributeValue::S(key.sk.clone())),
                ])
            });
        }

        Ok(page)
    }

    async fn put(&self, item: Item, condition: WriteCondition) -> Result<WriteOutcome> {
        let key = key_of(&item)?;
        let mut items = self.items.write().await;

        if !condition_holds(items.contains_key(&key), condition) {
            return Ok(WriteOutcome::ConditionFailed);
        }
        items.insert(key, item);
        Ok(WriteOutcome::Applied)
    }

    async fn delete(&self, key: &TableKey, condition: WriteCondition) -> Result<WriteOutcome> {
        let mut items = self.items.write().await;

        if !condition_holds(items.contains_key(key), condition) {
            return Ok(WriteOutcome::ConditionFailed);
        }
        items.remove(key);
        Ok(WriteOutcome::Applied)
    }
}
