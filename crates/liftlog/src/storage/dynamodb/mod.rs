//! DynamoDB backend for the table store.
//!
//! [`DynamoDbTable`] speaks the [`TableClient`](super::table::TableClient)
//! operations against one shared table with a `PK` hash key and an `SK`
//! range key.

mod client;
mod error;
mod table;

pub use client::{create_client, AwsConfig};
pub use table::DynamoDbTable;
