// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Core storage types: record identifiers, records and storage errors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::value::Value;

/// Physical address of a record: `#<cluster>:<position>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    pub cluster: i32,
    pub position: i64,
}

impl RecordId {
    pub fn new(cluster: i32, position: i64) -> Self {
        Self { cluster, position }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.cluster, self.position)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim().strip_prefix('#').unwrap_or(s.trim());
        let (cluster, position) = body
            .split_once(':')
            .ok_or_else(|| format!("Invalid record id '{}': expected #<cluster>:<position>", s))?;
        let cluster = cluster
            .parse::<i32>()
            .map_err(|_| format!("Invalid cluster id in record id '{}'", s))?;
        let position = position
            .parse::<i64>()
            .map_err(|_| format!("Invalid position in record id '{}'", s))?;
        if cluster < 0 || position < 0 {
            return Err(format!("Record id '{}' must not be negative", s));
        }
        Ok(RecordId::new(cluster, position))
    }
}

/// A document stored in a cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub rid: RecordId,
    /// Owning class, if the record was created through a class
    pub class_name: Option<String>,
    pub fields: BTreeMap<String, Value>,
    pub version: u32,
    pub created_at: DateTime<Utc>,
}

impl Record {
    pub fn new(rid: RecordId, class_name: Option<String>, fields: BTreeMap<String, Value>) -> Self {
        Self {
            rid,
            class_name,
            fields,
            version: 1,
            created_at: Utc::now(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Check whether any field links to `target`
    pub fn references(&self, target: &RecordId) -> bool {
        self.fields.values().any(|v| v.references(target))
    }
}

/// Errors raised by the storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Stored snapshot is corrupted: {0}")]
    Corrupted(String),

    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Storage driver error: {0}")]
    BackendSpecific(String),
}

impl From<bincode::Error> for StorageError {
    fn from(e: bincode::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        let rid: RecordId = "#12:34".parse().unwrap();
        assert_eq!(rid, RecordId::new(12, 34));
        assert_eq!(rid.to_string(), "#12:34");

        let bare: RecordId = "5:0".parse().unwrap();
        assert_eq!(bare, RecordId::new(5, 0));
    }

    #[test]
    fn test_parse_record_id_rejects_garbage() {
        assert!("#12".parse::<RecordId>().is_err());
        assert!("#a:b".parse::<RecordId>().is_err());
        assert!("#-1:3".parse::<RecordId>().is_err());
    }
}
