// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory storage driver

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::traits::{StorageDriver, StorageTree};
use super::types::StorageType;
use crate::storage::types::StorageResult;

type TreeData = Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>;

/// Memory driver: trees live for as long as the driver does
#[derive(Default)]
pub struct MemoryDriver {
    trees: RwLock<HashMap<String, TreeData>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryTree {
    data: TreeData,
}

impl StorageTree for MemoryTree {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn remove(&self, key: &[u8]) -> StorageResult<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.data.write().clear();
        Ok(())
    }

    fn entries(&self) -> StorageResult<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self
            .data
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }
}

impl StorageDriver for MemoryDriver {
    fn open_tree(&self, name: &str) -> StorageResult<Box<dyn StorageTree>> {
        let data = self
            .trees
            .write()
            .entry(name.to_string())
            .or_default()
            .clone();
        Ok(Box::new(MemoryTree { data }))
    }

    fn list_trees(&self) -> StorageResult<Vec<String>> {
        let mut names: Vec<String> = self.trees.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trees_share_data_by_name() {
        let driver = MemoryDriver::new();
        let first = driver.open_tree("metadata").unwrap();
        first.insert(b"k", b"v").unwrap();

        let second = driver.open_tree("metadata").unwrap();
        assert_eq!(second.get(b"k").unwrap(), Some(b"v".to_vec()));
        assert!(second.contains_key(b"k").unwrap());

        second.clear().unwrap();
        assert!(first.entries().unwrap().is_empty());
        assert_eq!(driver.list_trees().unwrap(), vec!["metadata".to_string()]);
    }
}
