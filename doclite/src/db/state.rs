// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Engine state and its persisted snapshot form
//!
//! The snapshot is framed as a little-endian crc32 of the payload followed by
//! the bincode payload.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{
    CatalogError, CatalogResult, ClusterManager, ClusterStatus, FunctionLibrary, IndexManager,
    Schema, SecurityManager, SequenceLibrary, EDGE_CLASS, VERTEX_CLASS,
};
use crate::config::DatabaseConfig;
use crate::storage::{Record, RecordId, StorageError, StorageResult, Value};

const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineState {
    pub clusters: ClusterManager,
    pub schema: Schema,
    pub indexes: IndexManager,
    pub sequences: SequenceLibrary,
    pub functions: FunctionLibrary,
    pub security: SecurityManager,
}

impl EngineState {
    /// Fresh state with the built-in classes, roles and admin user
    pub fn bootstrap(config: &DatabaseConfig) -> CatalogResult<Self> {
        let mut state = Self {
            clusters: ClusterManager::new(),
            schema: Schema::new(),
            indexes: IndexManager::new(),
            sequences: SequenceLibrary::new(),
            functions: FunctionLibrary::new(),
            security: SecurityManager::bootstrap(&config.admin_password, config.bcrypt_cost)?,
        };
        state.create_class(VERTEX_CLASS, &[], false)?;
        state.create_class(EDGE_CLASS, &[], false)?;
        Ok(state)
    }

    /// Create a class together with a cluster named after it
    pub fn create_class(&mut self, name: &str, super_classes: &[&str], is_abstract: bool) -> CatalogResult<i32> {
        if self.schema.exists(name) {
            return Err(CatalogError::already_exists("Class", name));
        }
        let cluster_id = self.clusters.add_cluster(name, None, false)?;
        self.schema
            .create_class(name, super_classes, vec![cluster_id], is_abstract)?;
        Ok(cluster_id)
    }

    /// Insert a record into the default cluster of a class
    pub fn insert(&mut self, class_name: &str, fields: BTreeMap<String, Value>) -> CatalogResult<Record> {
        let class = self
            .schema
            .get_class(class_name)
            .ok_or_else(|| CatalogError::not_found("Class", class_name))?;
        if class.is_abstract {
            return Err(CatalogError::InvalidArgument(format!(
                "Cannot create records of abstract class '{}'",
                class.name
            )));
        }
        let cluster_id = class.default_cluster().ok_or_else(|| {
            CatalogError::InvalidArgument(format!("Class '{}' has no cluster", class.name))
        })?;
        let class_name = class.name.clone();

        let rid = self
            .clusters
            .insert_record(cluster_id, Some(class_name), fields)?;
        let record = self
            .clusters
            .load(&rid)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Record", rid.to_string()))?;
        self.indexes.on_record_created(&record, &self.schema)?;
        Ok(record)
    }

    /// Delete one record and drop it from every index
    pub fn delete_record(&mut self, rid: &RecordId) -> CatalogResult<Option<Record>> {
        let removed = self.clusters.delete_record(rid)?;
        if let Some(record) = &removed {
            self.indexes.on_record_deleted(record, &self.schema);
        }
        Ok(removed)
    }

    /// Delete every record of a cluster and drop them from every index
    pub fn truncate_cluster(&mut self, cluster_id: i32) -> CatalogResult<Vec<Record>> {
        let cluster = self
            .clusters
            .get(cluster_id)
            .ok_or_else(|| CatalogError::not_found("Cluster", cluster_id.to_string()))?;
        if cluster.status == ClusterStatus::Offline {
            return Err(CatalogError::ClusterOffline(cluster.name.clone()));
        }
        let removed = self.clusters.truncate(cluster_id)?;
        for record in &removed {
            self.indexes.on_record_deleted(record, &self.schema);
        }
        Ok(removed)
    }

    pub fn to_snapshot(&self) -> StorageResult<Vec<u8>> {
        let payload = bincode::serialize(self)?;
        let checksum = crc32fast::hash(&payload);
        let mut bytes = Vec::with_capacity(CHECKSUM_LEN + payload.len());
        bytes.extend_from_slice(&checksum.to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    pub fn from_snapshot(bytes: &[u8]) -> StorageResult<Self> {
        if bytes.len() < CHECKSUM_LEN {
            return Err(StorageError::Corrupted(format!(
                "snapshot is {} bytes, shorter than its checksum",
                bytes.len()
            )));
        }
        let (checksum, payload) = bytes.split_at(CHECKSUM_LEN);
        let mut expected = [0u8; CHECKSUM_LEN];
        expected.copy_from_slice(checksum);
        let expected = u32::from_le_bytes(expected);
        let actual = crc32fast::hash(payload);
        if expected != actual {
            return Err(StorageError::Corrupted(format!(
                "checksum mismatch: stored {:08x}, computed {:08x}",
                expected, actual
            )));
        }

        let mut state: EngineState = bincode::deserialize(payload)?;
        state.sequences.on_load();
        Ok(state)
    }
}
