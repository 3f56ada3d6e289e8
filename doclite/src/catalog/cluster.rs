// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cluster manager
//!
//! Clusters are the physical partitions that hold records. Each cluster has a
//! numeric id and a lower-case name; records inside a cluster are addressed by
//! a monotonically assigned position.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::{CatalogError, CatalogResult};
use crate::storage::{Record, RecordId, Value};

static CLUSTER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_\-\.$]*$").expect("valid cluster name pattern"));

/// Availability of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterStatus {
    Online,
    Offline,
}

impl FromStr for ClusterStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ONLINE" => Ok(ClusterStatus::Online),
            "OFFLINE" => Ok(ClusterStatus::Offline),
            other => Err(CatalogError::InvalidArgument(format!(
                "Unknown cluster status '{}'. Valid options: ONLINE, OFFLINE",
                other
            ))),
        }
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterStatus::Online => write!(f, "ONLINE"),
            ClusterStatus::Offline => write!(f, "OFFLINE"),
        }
    }
}

/// How concurrent updates to the same record are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictStrategy {
    Version,
    Content,
    Automerge,
}

impl FromStr for ConflictStrategy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "version" => Ok(ConflictStrategy::Version),
            "content" => Ok(ConflictStrategy::Content),
            "automerge" => Ok(ConflictStrategy::Automerge),
            other => Err(CatalogError::InvalidArgument(format!(
                "Unknown conflict strategy '{}'. Valid options: version, content, automerge",
                other
            ))),
        }
    }
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConflictStrategy::Version => "version",
            ConflictStrategy::Content => "content",
            ConflictStrategy::Automerge => "automerge",
        };
        write!(f, "{}", name)
    }
}

/// A storage partition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: i32,
    pub name: String,
    pub blob: bool,
    pub status: ClusterStatus,
    pub conflict_strategy: ConflictStrategy,
    next_position: i64,
    records: BTreeMap<i64, Record>,
}

impl Cluster {
    fn new(id: i32, name: String, blob: bool) -> Self {
        Self {
            id,
            name,
            blob,
            status: ClusterStatus::Online,
            conflict_strategy: ConflictStrategy::Version,
            next_position: 0,
            records: BTreeMap::new(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

/// Registry of all clusters in a database
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterManager {
    clusters: BTreeMap<i32, Cluster>,
}

impl ClusterManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_name(name: &str) -> CatalogResult<String> {
        let normalized = name.to_lowercase();
        if !CLUSTER_NAME.is_match(&normalized) {
            return Err(CatalogError::InvalidArgument(format!(
                "Invalid cluster name '{}'",
                name
            )));
        }
        Ok(normalized)
    }

    /// Create a cluster; when `id` is absent the lowest free id is used
    pub fn add_cluster(&mut self, name: &str, id: Option<i32>, blob: bool) -> CatalogResult<i32> {
        let name = Self::validate_name(name)?;
        if self.id_of(&name).is_some() {
            return Err(CatalogError::already_exists("Cluster", name));
        }

        let id = match id {
            Some(id) if id < 0 => {
                return Err(CatalogError::InvalidArgument(format!(
                    "Cluster id must not be negative, got {}",
                    id
                )))
            }
            Some(id) if self.clusters.contains_key(&id) => {
                let owner = &self.clusters[&id].name;
                return Err(CatalogError::in_use(
                    "Cluster id",
                    id.to_string(),
                    format!("already assigned to cluster '{}'", owner),
                ));
            }
            Some(id) => id,
            None => (0..)
                .find(|candidate| !self.clusters.contains_key(candidate))
                .unwrap_or(0),
        };

        log::info!("Creating cluster '{}' with id {}", name, id);
        self.clusters.insert(id, Cluster::new(id, name, blob));
        Ok(id)
    }

    pub fn drop_cluster(&mut self, id: i32) -> CatalogResult<Cluster> {
        let cluster = self
            .clusters
            .remove(&id)
            .ok_or_else(|| CatalogError::not_found("Cluster", id.to_string()))?;
        log::info!("Dropped cluster '{}' ({})", cluster.name, id);
        Ok(cluster)
    }

    pub fn get(&self, id: i32) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    fn get_mut(&mut self, id: i32) -> CatalogResult<&mut Cluster> {
        self.clusters
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found("Cluster", id.to_string()))
    }

    /// Look up a cluster id by (case-insensitive) name
    pub fn id_of(&self, name: &str) -> Option<i32> {
        let name = name.to_lowercase();
        self.clusters
            .values()
            .find(|c| c.name == name)
            .map(|c| c.id)
    }

    pub fn name_of(&self, id: i32) -> Option<&str> {
        self.clusters.get(&id).map(|c| c.name.as_str())
    }

    /// Ids of clusters whose name starts with `prefix`
    pub fn ids_with_prefix(&self, prefix: &str) -> Vec<i32> {
        let prefix = prefix.to_lowercase();
        self.clusters
            .values()
            .filter(|c| c.name.starts_with(&prefix))
            .map(|c| c.id)
            .collect()
    }

    pub fn ids(&self) -> Vec<i32> {
        self.clusters.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn rename(&mut self, id: i32, new_name: &str) -> CatalogResult<()> {
        let new_name = Self::validate_name(new_name)?;
        if let Some(existing) = self.id_of(&new_name) {
            if existing != id {
                return Err(CatalogError::already_exists("Cluster", new_name));
            }
        }
        let cluster = self.get_mut(id)?;
        log::info!("Renaming cluster '{}' to '{}'", cluster.name, new_name);
        cluster.name = new_name;
        Ok(())
    }

    pub fn set_status(&mut self, id: i32, status: ClusterStatus) -> CatalogResult<()> {
        self.get_mut(id)?.status = status;
        Ok(())
    }

    pub fn set_conflict_strategy(&mut self, id: i32, strategy: ConflictStrategy) -> CatalogResult<()> {
        self.get_mut(id)?.conflict_strategy = strategy;
        Ok(())
    }

    /// Remove every record of a cluster and return them
    pub fn truncate(&mut self, id: i32) -> CatalogResult<Vec<Record>> {
        let cluster = self.get_mut(id)?;
        let removed: Vec<Record> = std::mem::take(&mut cluster.records).into_values().collect();
        log::debug!("Truncated cluster '{}': {} records", cluster.name, removed.len());
        Ok(removed)
    }

    pub fn insert_record(
        &mut self,
        id: i32,
        class_name: Option<String>,
        fields: BTreeMap<String, Value>,
    ) -> CatalogResult<RecordId> {
        let cluster = self.get_mut(id)?;
        if cluster.status == ClusterStatus::Offline {
            return Err(CatalogError::ClusterOffline(cluster.name.clone()));
        }
        let rid = RecordId::new(id, cluster.next_position);
        cluster.next_position += 1;
        cluster.records.insert(rid.position, Record::new(rid, class_name, fields));
        Ok(rid)
    }

    pub fn load(&self, rid: &RecordId) -> Option<&Record> {
        self.clusters
            .get(&rid.cluster)
            .and_then(|c| c.records.get(&rid.position))
    }

    pub fn delete_record(&mut self, rid: &RecordId) -> CatalogResult<Option<Record>> {
        match self.clusters.get_mut(&rid.cluster) {
            Some(cluster) => {
                if cluster.status == ClusterStatus::Offline {
                    return Err(CatalogError::ClusterOffline(cluster.name.clone()));
                }
                Ok(cluster.records.remove(&rid.position))
            }
            None => Ok(None),
        }
    }

    pub fn record_count(&self, id: i32) -> usize {
        self.clusters.get(&id).map(Cluster::record_count).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_cluster_assigns_lowest_free_id() {
        let mut manager = ClusterManager::new();
        assert_eq!(manager.add_cluster("a", None, false).unwrap(), 0);
        assert_eq!(manager.add_cluster("b", Some(5), false).unwrap(), 5);
        assert_eq!(manager.add_cluster("c", None, false).unwrap(), 1);
        assert_eq!(manager.id_of("B"), Some(5));
    }

    #[test]
    fn test_add_cluster_rejects_duplicates() {
        let mut manager = ClusterManager::new();
        manager.add_cluster("orders", None, false).unwrap();
        assert!(matches!(
            manager.add_cluster("ORDERS", None, false),
            Err(CatalogError::AlreadyExists { .. })
        ));
        assert!(matches!(
            manager.add_cluster("other", Some(0), false),
            Err(CatalogError::InUse { .. })
        ));
        assert!(manager.add_cluster("bad name", None, false).is_err());
    }

    #[test]
    fn test_offline_cluster_rejects_writes() {
        let mut manager = ClusterManager::new();
        let id = manager.add_cluster("log", None, false).unwrap();
        manager.set_status(id, ClusterStatus::Offline).unwrap();
        assert!(matches!(
            manager.insert_record(id, None, BTreeMap::new()),
            Err(CatalogError::ClusterOffline(_))
        ));
    }

    #[test]
    fn test_truncate_returns_removed_records() {
        let mut manager = ClusterManager::new();
        let id = manager.add_cluster("log", None, false).unwrap();
        manager.insert_record(id, None, BTreeMap::new()).unwrap();
        manager.insert_record(id, None, BTreeMap::new()).unwrap();

        assert_eq!(manager.truncate(id).unwrap().len(), 2);
        assert_eq!(manager.record_count(id), 0);

        // positions keep growing after a truncate
        let rid = manager.insert_record(id, None, BTreeMap::new()).unwrap();
        assert_eq!(rid.position, 2);
    }
}
