// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Index manager
//!
//! Single-field indexes over class records. Automatic indexes are maintained
//! as records are created and deleted and can be re-derived from class data
//! with a rebuild; manual indexes are only changed through explicit puts.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::cluster::ClusterManager;
use super::error::{CatalogError, CatalogResult};
use super::schema::Schema;
use crate::storage::{Record, RecordId, Value};

/// Ordered index key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexKey(pub Value);

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub class_name: String,
    pub field: String,
    pub unique: bool,
    /// Automatic indexes are derived from class data and can be rebuilt
    pub automatic: bool,
}

type Entries = BTreeMap<IndexKey, Vec<RecordId>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub definition: IndexDefinition,
    entries: Entries,
}

impl Index {
    /// Number of (key, record) pairs held by the index
    pub fn size(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn get(&self, key: &Value) -> Vec<RecordId> {
        self.entries
            .get(&IndexKey(key.clone()))
            .cloned()
            .unwrap_or_default()
    }

    fn put(&mut self, key: Value, rid: RecordId) -> CatalogResult<()> {
        put_entry(&self.definition, &mut self.entries, key, rid)
    }

    fn remove(&mut self, key: Value, rid: &RecordId) {
        let key = IndexKey(key);
        if let Some(rids) = self.entries.get_mut(&key) {
            rids.retain(|r| r != rid);
            if rids.is_empty() {
                self.entries.remove(&key);
            }
        }
    }
}

fn put_entry(
    definition: &IndexDefinition,
    entries: &mut Entries,
    key: Value,
    rid: RecordId,
) -> CatalogResult<()> {
    let rids = entries.entry(IndexKey(key.clone())).or_default();
    if definition.unique && rids.iter().any(|r| *r != rid) {
        return Err(CatalogError::DuplicateKey {
            index: definition.name.clone(),
            key: key.to_string(),
        });
    }
    if !rids.contains(&rid) {
        rids.push(rid);
    }
    Ok(())
}

/// Keys a record contributes to an index: one per list element, none for null
fn keys_for(definition: &IndexDefinition, record: &Record) -> Vec<Value> {
    match record.field(&definition.field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::List(items)) => items.iter().filter(|v| !v.is_null()).cloned().collect(),
        Some(value) => vec![value.clone()],
    }
}

fn covers(definition: &IndexDefinition, record: &Record, schema: &Schema) -> bool {
    record
        .class_name
        .as_deref()
        .map(|class| schema.is_sub_class_of(class, &definition.class_name))
        .unwrap_or(false)
}

/// Derive the full entry set of an index from the current class data
fn derive_entries(
    definition: &IndexDefinition,
    clusters: &ClusterManager,
    schema: &Schema,
) -> CatalogResult<Entries> {
    let mut entries = Entries::new();
    for cluster_id in schema.cluster_ids(&definition.class_name, true)? {
        let Some(cluster) = clusters.get(cluster_id) else {
            continue;
        };
        for record in cluster.records() {
            for key in keys_for(definition, record) {
                put_entry(definition, &mut entries, key, record.rid)?;
            }
        }
    }
    Ok(entries)
}

/// Manager for all indexes of a database
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexManager {
    indexes: BTreeMap<String, Index>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new index and populate it from existing data
    pub fn create_index(
        &mut self,
        definition: IndexDefinition,
        clusters: &ClusterManager,
        schema: &Schema,
    ) -> CatalogResult<usize> {
        info!("Creating index '{}'", definition.name);
        let key = definition.name.to_lowercase();
        if self.indexes.contains_key(&key) {
            return Err(CatalogError::already_exists("Index", definition.name));
        }
        if !schema.exists(&definition.class_name) {
            return Err(CatalogError::not_found("Class", definition.class_name));
        }

        let entries = if definition.automatic {
            derive_entries(&definition, clusters, schema)?
        } else {
            Entries::new()
        };
        let index = Index {
            definition,
            entries,
        };
        let size = index.size();
        self.indexes.insert(key, index);
        debug!("Index created with {} entries", size);
        Ok(size)
    }

    pub fn drop_index(&mut self, name: &str) -> CatalogResult<()> {
        info!("Deleting index '{}'", name);
        self.indexes
            .remove(&name.to_lowercase())
            .map(|_| ())
            .ok_or_else(|| CatalogError::not_found("Index", name))
    }

    pub fn get(&self, name: &str) -> Option<&Index> {
        self.indexes.get(&name.to_lowercase())
    }

    /// Put an entry into a manual index
    pub fn put(&mut self, name: &str, key: Value, rid: RecordId) -> CatalogResult<()> {
        let index = self
            .indexes
            .get_mut(&name.to_lowercase())
            .ok_or_else(|| CatalogError::not_found("Index", name))?;
        if index.definition.automatic {
            return Err(CatalogError::InvalidArgument(format!(
                "Index '{}' is automatic and is maintained from class data",
                index.definition.name
            )));
        }
        index.put(key, rid)
    }

    /// Maintain automatic indexes after a record was created
    pub fn on_record_created(&mut self, record: &Record, schema: &Schema) -> CatalogResult<()> {
        for index in self.indexes.values_mut() {
            if index.definition.automatic && covers(&index.definition, record, schema) {
                for key in keys_for(&index.definition, record) {
                    index.put(key, record.rid)?;
                }
            }
        }
        Ok(())
    }

    /// Remove a deleted record from every index that references it
    pub fn on_record_deleted(&mut self, record: &Record, schema: &Schema) {
        for index in self.indexes.values_mut() {
            if !index.definition.automatic {
                // manual entries may point at the record under any key
                index.entries.retain(|_, rids| {
                    rids.retain(|r| *r != record.rid);
                    !rids.is_empty()
                });
            } else if covers(&index.definition, record, schema) {
                for key in keys_for(&index.definition, record) {
                    index.remove(key, &record.rid);
                }
            }
        }
    }

    /// Re-derive one automatic index from its class data
    pub fn rebuild(
        &mut self,
        name: &str,
        clusters: &ClusterManager,
        schema: &Schema,
    ) -> CatalogResult<usize> {
        let index = self
            .indexes
            .get_mut(&name.to_lowercase())
            .ok_or_else(|| CatalogError::not_found("Index", name))?;
        if !index.definition.automatic {
            return Err(CatalogError::InvalidArgument(format!(
                "Cannot rebuild index '{}' because it's manual and there aren't indications of what to index",
                index.definition.name
            )));
        }

        index.entries = derive_entries(&index.definition, clusters, schema)?;
        let size = index.size();
        info!("Rebuilt index '{}': {} entries", index.definition.name, size);
        Ok(size)
    }

    /// Re-derive every automatic index in parallel; manual indexes are skipped
    pub fn rebuild_all(
        &mut self,
        clusters: &ClusterManager,
        schema: &Schema,
    ) -> CatalogResult<Vec<(String, usize)>> {
        let rebuilt: Vec<CatalogResult<(String, Entries)>> = self
            .indexes
            .par_iter()
            .filter(|(_, index)| index.definition.automatic)
            .map(|(key, index)| {
                derive_entries(&index.definition, clusters, schema).map(|e| (key.clone(), e))
            })
            .collect();

        let mut summary = Vec::with_capacity(rebuilt.len());
        for result in rebuilt {
            let (key, entries) = result?;
            if let Some(index) = self.indexes.get_mut(&key) {
                index.entries = entries;
                summary.push((index.definition.name.clone(), index.size()));
            }
        }
        info!("Rebuilt {} automatic indexes", summary.len());
        Ok(summary)
    }
}
