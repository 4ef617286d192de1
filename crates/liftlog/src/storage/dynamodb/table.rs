//! `TableClient` over a DynamoDB table.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder;
use aws_sdk_dynamodb::Client;
use liftlog_core::storage::{RepositoryError, Result};

use super::error::{
    map_create_table_error, map_delete_item_error, map_describe_table_error, map_put_item_error,
    map_query_error, map_scan_error,
};
use crate::storage::table::{
    keys, Item, ScanPage, TableClient, TableKey, WriteCondition, WriteOutcome,
};

const ACTIVATION_ATTEMPTS: usize = 60;
const ACTIVATION_DELAY: Duration = Duration::from_secs(2);

/// A single shared DynamoDB table.
pub struct DynamoDbTable {
    client: Client,
    table_name: String,
    page_size: i32,
}

impl DynamoDbTable {
    /// Creates a table client. `page_size` is the scan `Limit`.
    pub fn new(client: Client, table_name: impl Into<String>, page_size: i32) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            page_size,
        }
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Lookup of one item by its full key. Mutations are checked against this
    /// read, so it must observe every acknowledged write.
    fn point_query(&self, key: &TableKey) -> QueryFluentBuilder {
        self.client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression(keys::KEY_CONDITION)
            .set_expression_attribute_values(Some(keys::key_condition_values(key)))
            .consistent_read(true)
    }

    /// Creates the table (pay-per-request, `PK` hash, `SK` range) if it does
    /// not exist yet and waits until it is active.
    pub async fn ensure_table(&self) -> Result<()> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => {
                tracing::debug!(table = %self.table_name, "Table already exists");
                return Ok(());
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) => {}
            Err(err) => return Err(map_describe_table_error(err)),
        }

        tracing::info!(table = %self.table_name, "Creating table");
        self.client
            .create_table()
            .table_name(&self.table_name)
            .set_key_schema(Some(vec![
                key_schema(keys::PK, KeyType::Hash)?,
                key_schema(keys::SK, KeyType::Range)?,
            ]))
            .set_attribute_definitions(Some(vec![
                string_attribute(keys::PK)?,
                string_attribute(keys::SK)?,
            ]))
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .map_err(map_create_table_error)?;

        self.wait_for_table_active().await
    }

    async fn wait_for_table_active(&self) -> Result<()> {
        for _ in 0..ACTIVATION_ATTEMPTS {
            let status = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await
                .map_err(map_describe_table_error)?
                .table
                .and_then(|t| t.table_status);

            if status == Some(TableStatus::Active) {
                tracing::info!(table = %self.table_name, "Table is active");
                return Ok(());
            }
            tokio::time::sleep(ACTIVATION_DELAY).await;
        }

        Err(RepositoryError::ConnectionFailed(format!(
            "Table {} did not become active",
            self.table_name
        )))
    }
}

fn key_schema(name: &str, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(|e| RepositoryError::InvalidData(e.to_string()))
}

fn string_attribute(name: &str) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| RepositoryError::InvalidData(e.to_string()))
}

fn condition_expression(condition: WriteCondition) -> &'static str {
    match condition {
        WriteCondition::MustNotExist => keys::MUST_NOT_EXIST,
        WriteCondition::MustExist => keys::MUST_EXIST,
    }
}

#[async_trait]
impl TableClient for DynamoDbTable {
    async fn query(&self, key: &TableKey) -> Result<Vec<Item>> {
        let output = self
            .point_query(key)
            .send()
            .await
            .map_err(map_query_error)?;

        Ok(output.items.unwrap_or_default())
    }

    async fn scan_page(&self, entity_type: &str, start: Option<Item>) -> Result<ScanPage> {
        let (names, values) = keys::entity_type_filter(entity_type);

        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression(keys::ENTITY_TYPE_FILTER)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .limit(self.page_size)
            .set_exclusive_start_key(start)
            .send()
            .await
            .map_err(map_scan_error)?;

        Ok(ScanPage {
            items: output.items.unwrap_or_default(),
            next: output.last_evaluated_key.filter(|key| !key.is_empty()),
        })
    }

    async fn put(&self, item: Item, condition: WriteCondition) -> Result<WriteOutcome> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression(condition_expression(condition))
            .send()
            .await;

        match result {
            Ok(_) => Ok(WriteOutcome::Applied),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Ok(WriteOutcome::ConditionFailed)
            }
            Err(err) => Err(map_put_item_error(err)),
        }
    }

    async fn delete(&self, key: &TableKey, condition: WriteCondition) -> Result<WriteOutcome> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(keys::PK, AttributeValue::S(key.pk.clone()))
            .key(keys::SK, AttributeValue::S(key.sk.clone()))
            .condition_expression(condition_expression(condition))
            .send()
            .await;

        match result {
            Ok(_) => Ok(WriteOutcome::Applied),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Ok(WriteOutcome::ConditionFailed)
            }
            Err(err) => Err(map_delete_item_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditions_map_to_expressions() {
        assert_eq!(
            condition_expression(WriteCondition::MustNotExist),
            "attribute_not_exists(PK)"
        );
        assert_eq!(
            condition_expression(WriteCondition::MustExist),
            "attribute_exists(PK)"
        );
    }

    fn table() -> DynamoDbTable {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(aws_sdk_dynamodb::config::BehaviorVersion::latest())
            .region(aws_sdk_dynamodb::config::Region::new("us-east-1"))
            .build();

        DynamoDbTable::new(Client::from_conf(config), "liftlog", 100)
    }

    #[test]
    fn test_point_query_reads_consistently() {
        let table = table();
        let key = TableKey {
            pk: "WORKOUT#leg-day".to_string(),
            sk: "2024-01-01".to_string(),
        };

        let query = table.point_query(&key);
        let input = query.as_input();

        assert_eq!(input.get_consistent_read(), &Some(true));
        assert_eq!(input.get_table_name().as_deref(), Some("liftlog"));
        assert_eq!(
            input.get_key_condition_expression().as_deref(),
            Some("PK = :pk AND SK = :sk")
        );
        assert_eq!(
            input.get_expression_attribute_values().as_ref(),
            Some(&keys::key_condition_values(&key))
        );
    }

    #[test]
    fn test_key_schema_elements_build() {
        let hash = key_schema(keys::PK, KeyType::Hash).unwrap();
        let attribute = string_attribute(keys::SK).unwrap();

        assert_eq!(hash.attribute_name(), "PK");
        assert_eq!(hash.key_type(), &KeyType::Hash);
        assert_eq!(attribute.attribute_name(), "SK");
        assert_eq!(attribute.attribute_type(), &ScalarAttributeType::S);
    }
}
