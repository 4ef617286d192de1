use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Two-part key addressing a record in the table store.
///
/// Both parts are supplied by the caller when the record is created and
/// never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompoundKey {
    pub partition: String,
    pub row: String,
}

impl CompoundKey {
    pub fn new(partition: impl Into<String>, row: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            row: row.into(),
        }
    }

    /// A key is usable only when both components are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.partition.is_empty() && !self.row.is_empty()
    }
}

impl fmt::Display for CompoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition, self.row)
    }
}

/// How a paginated listing treats an item that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Log the item and leave it out of the result.
    #[default]
    Lenient,
    /// Fail the whole listing.
    Strict,
}

impl FromStr for DecodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown decode mode: {other}")),
        }
    }
}

impl fmt::Display for DecodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => f.write_str("lenient"),
            Self::Strict => f.write_str("strict"),
        }
    }
}
