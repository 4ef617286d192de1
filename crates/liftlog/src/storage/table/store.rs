//! Uniform CRUD contract over a partitioned table.

use std::sync::Arc;

use async_trait::async_trait;
use liftlog_core::storage::{
    CompoundKey, DecodeMode, RepositoryError, ResourceStore, Result,
};

use super::client::{TableClient, WriteCondition, WriteOutcome};
use super::conversions::TableRecord;
use super::keys;

/// Table-backed store for any [`TableRecord`].
///
/// Every mutation reads the key first, then issues a conditional write so a
/// concurrent writer between the read and the write is still detected.
pub struct TableStore<C> {
    client: Arc<C>,
    decode_mode: DecodeMode,
}

impl<C: TableClient> TableStore<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            decode_mode: DecodeMode::default(),
        }
    }

    /// Sets how `get_all` treats items that fail to decode.
    pub fn with_decode_mode(mut self, decode_mode: DecodeMode) -> Self {
        self.decode_mode = decode_mode;
        self
    }

    async fn find<R: TableRecord>(&self, key: &CompoundKey) -> Result<Option<R>> {
        let table_key = keys::table_key(R::KEY_PREFIX, key);

        match self.client.query(&table_key).await?.first() {
            Some(item) => R::from_item(item).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<C, R> ResourceStore<R> for TableStore<C>
where
    C: TableClient + 'static,
    R: TableRecord,
{
    async fn get(&self, key: &CompoundKey) -> Result<R> {
        self.find::<R>(key)
            .await?
            .ok_or_else(|| RepositoryError::not_found(R::ENTITY_TYPE, key))
    }

    async fn add(&self, record: R) -> Result<R> {
        let key = record.key();
        if !key.is_complete() {
            return Err(RepositoryError::InvalidData(format!(
                "{} requires both partitionKey and rowKey",
                R::ENTITY_TYPE
            )));
        }

        if self.find::<R>(&key).await?.is_some() {
            return Err(RepositoryError::already_exists(R::ENTITY_TYPE, &key));
        }

        match self
            .client
            .put(record.to_item(), WriteCondition::MustNotExist)
            .await?
        {
            WriteOutcome::Applied => {
                tracing::debug!(entity = R::ENTITY_TYPE, key = %key, "Created item");
                Ok(record)
            }
            WriteOutcome::ConditionFailed => {
                tracing::warn!(entity = R::ENTITY_TYPE, key = %key, "Lost create race");
                Err(RepositoryError::already_exists(R::ENTITY_TYPE, &key))
            }
        }
    }

    async fn update(&self, key: &CompoundKey, record: R) -> Result<R> {
        ResourceStore::<R>::get(self, key).await?;

        // Keys are immutable: the addressed key wins over the body
        let record = record.with_key(key.clone());
        match self
            .client
            .put(record.to_item(), WriteCondition::MustExist)
            .await?
        {
            WriteOutcome::Applied => {
                tracing::debug!(entity = R::ENTITY_TYPE, key = %key, "Replaced item");
                Ok(record)
            }
            WriteOutcome::ConditionFailed => {
                tracing::warn!(entity = R::ENTITY_TYPE, key = %key, "Item deleted during update");
                Err(RepositoryError::not_found(R::ENTITY_TYPE, key))
            }
        }
    }

    async fn delete(&self, key: &CompoundKey) -> Result<()> {
        ResourceStore::<R>::get(self, key).await?;

        let table_key = keys::table_key(R::KEY_PREFIX, key);
        match self
            .client
            .delete(&table_key, WriteCondition::MustExist)
            .await?
        {
            WriteOutcome::Applied => {
                tracing::debug!(entity = R::ENTITY_TYPE, key = %key, "Deleted item");
                Ok(())
            }
            WriteOutcome::ConditionFailed => {
                tracing::warn!(entity = R::ENTITY_TYPE, key = %key, "Item deleted during delete");
                Err(RepositoryError::not_found(R::ENTITY_TYPE, key))
            }
        }
    }

    async fn get_all(&self) -> Result<Vec<R>> {
        let mut records = Vec::new();
        let mut start = None;
        let mut pages = 0usize;

        loop {
            let page = self.client.scan_page(R::ENTITY_TYPE, start).await?;
            pages += 1;

            for item in &page.items {
                match R::from_item(item) {
                    Ok(record) => records.push(record),
                    Err(e) if self.decode_mode == DecodeMode::Lenient => {
                        tracing::warn!(
                            entity = R::ENTITY_TYPE,
                            error = %e,
                            "Skipping undecodable item"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }

            match page.next {
                Some(next) => start = Some(next),
                None => break,
            }
        }

        tracing::debug!(
            entity = R::ENTITY_TYPE,
            pages,
            count = records.len(),
            "Drained table scan"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::types::AttributeValue;
    use liftlog_core::workout::{CommentEntity, WorkoutEntity};

    use super::*;
    use crate::storage::table::{InMemoryTable, Item, ScanPage, TableKey};

    fn store(page_size: usize) -> (Arc<InMemoryTable>, TableStore<InMemoryTable>) {
        let table = Arc::new(InMemoryTable::with_page_size(page_size));
        (table.clone(), TableStore::new(table))
    }

    fn fake_1999(weight: f64) -> WorkoutEntity {
        WorkoutEntity {
            date: "1999-12-31".to_string(),
            ..WorkoutEntity::new("Fake", "1999")
                .with_exercise("bench", weight)
                .with_volume(5, 5)
        }
    }

    #[tokio::test]
    async fn test_compound_key_lifecycle() {
        let (_, store) = store(100);
        let workouts: &dyn ResourceStore<WorkoutEntity> = &store;
        let key = CompoundKey::new("Fake", "1999");

        let added = workouts.add(fake_1999(185.0)).await.unwrap();
        assert_eq!(workouts.get(&key).await.unwrap(), added);

        let duplicate = workouts.add(fake_1999(225.0)).await;
        assert!(matches!(duplicate, Err(RepositoryError::AlreadyExists { .. })));
        assert_eq!(workouts.get(&key).await.unwrap().weight, 185.0);

        let body = WorkoutEntity {
            weight: 195.0,
            ..WorkoutEntity::default()
        };
        let updated = workouts.update(&key, body).await.unwrap();
        assert_eq!(updated.key(), key);
        assert_eq!(workouts.get(&key).await.unwrap().weight, 195.0);

        workouts.delete(&key).await.unwrap();
        assert!(matches!(
            workouts.get(&key).await,
            Err(RepositoryError::NotFound { entity_type: "WorkoutEntity", .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_key_leaves_table_untouched() {
        let (table, store) = store(100);
        let workouts: &dyn ResourceStore<WorkoutEntity> = &store;
        workouts.add(fake_1999(185.0)).await.unwrap();
        let missing = CompoundKey::new("Fake", "2000");

        assert!(matches!(
            workouts.update(&missing, fake_1999(1.0)).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            workouts.delete(&missing).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert_eq!(table.len().await, 1);
        assert_eq!(workouts.get_all().await.unwrap(), vec![fake_1999(185.0)]);
    }

    #[tokio::test]
    async fn test_incomplete_key_is_invalid() {
        let (table, store) = store(100);
        let workouts: &dyn ResourceStore<WorkoutEntity> = &store;

        let result = workouts.add(WorkoutEntity::new("Fake", "")).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert_eq!(table.len().await, 0);
    }

    #[tokio::test]
    async fn test_record_types_share_table_without_collisions() {
        let (table, store) = store(100);
        let workouts: &dyn ResourceStore<WorkoutEntity> = &store;
        let comments: &dyn ResourceStore<CommentEntity> = &store;

        workouts.add(fake_1999(185.0)).await.unwrap();
        comments.add(CommentEntity::new("Fake", "1999")).await.unwrap();

        assert_eq!(table.len().await, 2);
        assert_eq!(workouts.get_all().await.unwrap().len(), 1);
        assert_eq!(comments.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_all_drains_every_page() {
        let (_, store) = store(3);
        let workouts: &dyn ResourceStore<WorkoutEntity> = &store;
        let comments: &dyn ResourceStore<CommentEntity> = &store;

        for row in 0..10 {
            workouts
                .add(WorkoutEntity::new("Fake", format!("{row:02}")))
                .await
                .unwrap();
            comments
                .add(CommentEntity::new("Fake", format!("{row:02}")))
                .await
                .unwrap();
        }

        let mut rows: Vec<String> = workouts
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.row_key)
            .collect();
        rows.sort();

        let expected: Vec<String> = (0..10).map(|row| format!("{row:02}")).collect();
        assert_eq!(rows, expected);
    }

    async fn with_corrupt_item(mode: DecodeMode) -> Result<Vec<WorkoutEntity>> {
        let (table, store) = store(2);
        let store = store.with_decode_mode(mode);
        let workouts: &dyn ResourceStore<WorkoutEntity> = &store;

        for row in ["a", "b", "c", "d"] {
            workouts.add(WorkoutEntity::new("Fake", row)).await.unwrap();
        }
        let mut corrupt = WorkoutEntity::new("Fake", "bb").to_item();
        corrupt.insert("weight".to_string(), AttributeValue::S("heavy".to_string()));
        table.insert_raw(corrupt).await.unwrap();

        workouts.get_all().await
    }

    #[tokio::test]
    async fn test_lenient_mode_skips_corrupt_items() {
        let records = with_corrupt_item(DecodeMode::Lenient).await.unwrap();

        let rows: Vec<&str> = records.iter().map(|w| w.row_key.as_str()).collect();
        assert_eq!(rows, ["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_strict_mode_fails_listing() {
        let result = with_corrupt_item(DecodeMode::Strict).await;

        assert!(matches!(result, Err(RepositoryError::Serialization(_))));
    }

    /// Serves every lookup from a stale snapshot, as if another writer acted
    /// between the read and the write.
    struct StaleReads {
        table: InMemoryTable,
        snapshot: Vec<Item>,
    }

    #[async_trait]
    impl TableClient for StaleReads {
        async fn query(&self, _key: &TableKey) -> Result<Vec<Item>> {
            Ok(self.snapshot.clone())
        }

        async fn scan_page(&self, entity_type: &str, start: Option<Item>) -> Result<ScanPage> {
            self.table.scan_page(entity_type, start).await
        }

        async fn put(&self, item: Item, condition: WriteCondition) -> Result<WriteOutcome> {
            self.table.put(item, condition).await
        }

        async fn delete(&self, key: &TableKey, condition: WriteCondition) -> Result<WriteOutcome> {
            self.table.delete(key, condition).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_create_is_conflict() {
        let table = InMemoryTable::new();
        table.insert_raw(fake_1999(185.0).to_item()).await.unwrap();
        let store = TableStore::new(Arc::new(StaleReads {
            table,
            snapshot: Vec::new(),
        }));
        let workouts: &dyn ResourceStore<WorkoutEntity> = &store;

        let result = workouts.add(fake_1999(225.0)).await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_delete_is_not_found() {
        let store = TableStore::new(Arc::new(StaleReads {
            table: InMemoryTable::new(),
            snapshot: vec![fake_1999(185.0).to_item()],
        }));
        let workouts: &dyn ResourceStore<WorkoutEntity> = &store;
        let key = CompoundKey::new("Fake", "1999");

        assert!(matches!(
            workouts.update(&key, fake_1999(195.0)).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            workouts.delete(&key).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert_eq!(store.client.table.len().await, 0);
    }
}
