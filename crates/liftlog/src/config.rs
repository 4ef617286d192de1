use std::env;

use clap::ValueEnum;
use liftlog_core::storage::DecodeMode;

/// Which backend serves the resource routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StorageBackend {
    /// Single-key records in SQLite.
    #[default]
    Sqlite,
    /// Compound-key records in DynamoDB.
    #[value(name = "dynamodb")]
    DynamoDb,
    /// Compound-key records in an in-process table. Data is lost on exit.
    Memory,
}

/// Storage configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to SQLite database file (default: "liftlog.db")
    pub sqlite_path: String,
    /// Shared table name (default: "liftlog")
    pub table_name: String,
    /// Items evaluated per table scan page (default: 100)
    pub table_page_size: i32,
    /// Treatment of undecodable items when listing (default: lenient)
    pub table_decode_mode: DecodeMode,
    /// Custom DynamoDB endpoint, e.g. DynamoDB Local
    pub aws_endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    pub aws_region: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "liftlog.db")
    /// - `TABLE_NAME` - Table name (default: "liftlog")
    /// - `TABLE_PAGE_SIZE` - Scan page size (default: 100)
    /// - `TABLE_DECODE_MODE` - `lenient` or `strict` (default: lenient)
    /// - `AWS_ENDPOINT_URL` - Custom DynamoDB endpoint (optional)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Unparsable values fall back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let table_page_size = lookup("TABLE_PAGE_SIZE")
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(100);

        let table_decode_mode = match lookup("TABLE_DECODE_MODE") {
            Some(value) => value.parse::<DecodeMode>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring TABLE_DECODE_MODE");
                DecodeMode::default()
            }),
            None => DecodeMode::default(),
        };

        Self {
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "liftlog.db".to_string()),
            table_name: lookup("TABLE_NAME").unwrap_or_else(|| "liftlog".to_string()),
            table_page_size,
            table_decode_mode,
            aws_endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|v| !v.is_empty()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        }
    }

    /// AWS client settings for the DynamoDB backend.
    #[cfg(feature = "dynamodb")]
    pub fn aws(&self) -> crate::storage::dynamodb::AwsConfig {
        crate::storage::dynamodb::AwsConfig {
            endpoint_url: self.aws_endpoint_url.clone(),
            region: self.aws_region.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.sqlite_path, "liftlog.db");
        assert_eq!(config.table_name, "liftlog");
        assert_eq!(config.table_page_size, 100);
        assert_eq!(config.table_decode_mode, DecodeMode::Lenient);
        assert_eq!(config.aws_endpoint_url, None);
        assert_eq!(config.aws_region, "us-east-1");
    }

    #[test]
    fn test_values_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("SQLITE_PATH", "/tmp/lifts.db"),
            ("TABLE_NAME", "lifts"),
            ("TABLE_PAGE_SIZE", "25"),
            ("TABLE_DECODE_MODE", "Strict"),
            ("AWS_ENDPOINT_URL", "http://localhost:8000"),
            ("AWS_REGION", "eu-west-1"),
        ]));

        assert_eq!(config.sqlite_path, "/tmp/lifts.db");
        assert_eq!(config.table_name, "lifts");
        assert_eq!(config.table_page_size, 25);
        assert_eq!(config.table_decode_mode, DecodeMode::Strict);
        assert_eq!(config.aws_endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.aws_region, "eu-west-1");
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("TABLE_PAGE_SIZE", "0"),
            ("TABLE_DECODE_MODE", "paranoid"),
            ("AWS_ENDPOINT_URL", ""),
        ]));

        assert_eq!(config.table_page_size, 100);
        assert_eq!(config.table_decode_mode, DecodeMode::Lenient);
        assert_eq!(config.aws_endpoint_url, None);
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(
            StorageBackend::from_str("dynamodb", true).unwrap(),
            StorageBackend::DynamoDb
        );
        assert_eq!(
            StorageBackend::from_str("memory", true).unwrap(),
            StorageBackend::Memory
        );
        assert!(StorageBackend::from_str("postgres", true).is_err());
    }
}
