use std::sync::Arc;

use anyhow::Context;
use liftlog_auth::AuthState;
use liftlog_core::storage::ResourceStore;
#[cfg(feature = "dynamodb")]
use liftlog_core::storage::DecodeMode;
use liftlog_core::workout::{Comment, CommentEntity, Workout, WorkoutEntity};

use crate::config::{Config, StorageBackend};
#[cfg(feature = "dynamodb")]
use crate::storage::{
    dynamodb::{create_client, DynamoDbTable},
    table::{InMemoryTable, TableClient, TableStore},
};
#[cfg(feature = "sqlite")]
use crate::storage::sqlite::SqliteRepository;

/// Shared handle to the store of one record type.
pub type Store<R> = Arc<dyn ResourceStore<R>>;

/// The record stores behind the resource routes. The shape decides the key
/// segments of the routes.
#[derive(Clone)]
pub enum Resources {
    /// `/{id}` routes over store-assigned numeric ids.
    SingleKey {
        workouts: Store<Workout>,
        comments: Store<Comment>,
    },
    /// `/{partition}/{row}` routes over caller-supplied compound keys.
    CompoundKey {
        workouts: Store<WorkoutEntity>,
        comments: Store<CommentEntity>,
    },
}

impl Resources {
    /// Serves both record types from one SQLite repository.
    #[cfg(feature = "sqlite")]
    pub fn sqlite(repository: SqliteRepository) -> Self {
        let repository = Arc::new(repository);
        Self::SingleKey {
            workouts: repository.clone(),
            comments: repository,
        }
    }

    /// Serves both record types from one shared table.
    #[cfg(feature = "dynamodb")]
    pub fn table<C: TableClient + 'static>(client: Arc<C>, decode_mode: DecodeMode) -> Self {
        Self::CompoundKey {
            workouts: Arc::new(TableStore::new(client.clone()).with_decode_mode(decode_mode)),
            comments: Arc::new(TableStore::new(client).with_decode_mode(decode_mode)),
        }
    }

    /// Opens the configured backend, bootstrapping its schema.
    pub async fn connect(backend: StorageBackend, config: &Config) -> anyhow::Result<Self> {
        match backend {
            #[cfg(feature = "sqlite")]
            StorageBackend::Sqlite => {
                let repository = SqliteRepository::new(&config.sqlite_path)
                    .await
                    .with_context(|| format!("Failed to open SQLite database {}", config.sqlite_path))?;
                Ok(Self::sqlite(repository))
            }
            #[cfg(feature = "dynamodb")]
            StorageBackend::DynamoDb => {
                let aws = config.aws();
                tracing::info!(
                    target_env = %aws.target_display(),
                    table = %config.table_name,
                    "Connecting to DynamoDB"
                );

                let client = create_client(&aws).await;
                let table = DynamoDbTable::new(client, &config.table_name, config.table_page_size);
                table
                    .ensure_table()
                    .await
                    .with_context(|| format!("Failed to prepare table {}", table.table_name()))?;
                Ok(Self::table(Arc::new(table), config.table_decode_mode))
            }
            #[cfg(feature = "dynamodb")]
            StorageBackend::Memory => {
                let table = InMemoryTable::with_page_size(config.table_page_size.max(1) as usize);
                Ok(Self::table(Arc::new(table), config.table_decode_mode))
            }
            #[allow(unreachable_patterns)]
            other => anyhow::bail!("Storage backend {other:?} is not compiled into this build"),
        }
    }

    /// Name of the key shape, for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::SingleKey { .. } => "single-key",
            Self::CompoundKey { .. } => "compound-key",
        }
    }
}

/// Application state: the auth guard and the record stores.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub resources: Resources,
}

impl AppState {
    pub fn new(auth: AuthState, resources: Resources) -> Self {
        Self { auth, resources }
    }
}
