// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver traits
//!
//! A driver owns a set of named trees; each tree is an ordered byte-keyed map.

use super::types::StorageType;
use crate::storage::types::StorageResult;

/// Key-value tree inside a storage driver
pub trait StorageTree: Send + Sync {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()>;

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    fn remove(&self, key: &[u8]) -> StorageResult<()>;

    fn contains_key(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn clear(&self) -> StorageResult<()>;

    /// All entries in key order
    fn entries(&self) -> StorageResult<Vec<(Vec<u8>, Vec<u8>)>>;

    fn flush(&self) -> StorageResult<()>;
}

/// A storage backend able to open named trees
pub trait StorageDriver: Send + Sync {
    fn open_tree(&self, name: &str) -> StorageResult<Box<dyn StorageTree>>;

    fn list_trees(&self) -> StorageResult<Vec<String>>;

    fn flush(&self) -> StorageResult<()>;

    fn storage_type(&self) -> StorageType;
}
