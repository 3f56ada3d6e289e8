// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema classes
//!
//! A class owns one or more clusters and may extend other classes. Lookups are
//! case-insensitive; the declared spelling is preserved for display.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::error::{CatalogError, CatalogResult};

/// Built-in vertex base class
pub const VERTEX_CLASS: &str = "V";
/// Built-in edge base class
pub const EDGE_CLASS: &str = "E";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaClass {
    pub name: String,
    pub super_classes: Vec<String>,
    pub cluster_ids: Vec<i32>,
    pub is_abstract: bool,
}

impl SchemaClass {
    /// Cluster that receives new records of this class
    pub fn default_cluster(&self) -> Option<i32> {
        self.cluster_ids.first().copied()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    classes: BTreeMap<String, SchemaClass>,
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_class(
        &mut self,
        name: &str,
        super_classes: &[&str],
        cluster_ids: Vec<i32>,
        is_abstract: bool,
    ) -> CatalogResult<&SchemaClass> {
        if name.trim().is_empty() {
            return Err(CatalogError::InvalidArgument(
                "Class name must not be empty".to_string(),
            ));
        }
        if self.classes.contains_key(&key(name)) {
            return Err(CatalogError::already_exists("Class", name));
        }

        let mut supers = Vec::with_capacity(super_classes.len());
        for parent in super_classes {
            let parent_class = self
                .get_class(parent)
                .ok_or_else(|| CatalogError::not_found("Class", *parent))?;
            supers.push(parent_class.name.clone());
        }

        for id in &cluster_ids {
            if let Some(owner) = self.class_owning_cluster(*id) {
                return Err(CatalogError::in_use(
                    "Cluster",
                    id.to_string(),
                    format!("already owned by class '{}'", owner),
                ));
            }
        }

        log::info!("Creating class '{}' (clusters {:?})", name, cluster_ids);
        let class = SchemaClass {
            name: name.to_string(),
            super_classes: supers,
            cluster_ids,
            is_abstract,
        };
        let entry = self.classes.entry(key(name)).or_insert(class);
        Ok(entry)
    }

    pub fn get_class(&self, name: &str) -> Option<&SchemaClass> {
        self.classes.get(&key(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.classes.contains_key(&key(name))
    }

    pub fn classes(&self) -> impl Iterator<Item = &SchemaClass> {
        self.classes.values()
    }

    /// Check whether `name` is `ancestor` or inherits from it transitively
    pub fn is_sub_class_of(&self, name: &str, ancestor: &str) -> bool {
        let mut visited = BTreeSet::new();
        let mut pending = vec![key(name)];
        let ancestor = key(ancestor);

        while let Some(current) = pending.pop() {
            if current == ancestor {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(class) = self.classes.get(&current) {
                pending.extend(class.super_classes.iter().map(|s| key(s)));
            }
        }
        false
    }

    /// All classes extending `name`, directly or transitively
    pub fn subclasses(&self, name: &str) -> Vec<&SchemaClass> {
        let target = key(name);
        self.classes
            .values()
            .filter(|c| key(&c.name) != target && self.is_sub_class_of(&c.name, name))
            .collect()
    }

    /// Clusters of the class, plus those of its subclasses when `polymorphic`
    pub fn cluster_ids(&self, name: &str, polymorphic: bool) -> CatalogResult<Vec<i32>> {
        let class = self
            .get_class(name)
            .ok_or_else(|| CatalogError::not_found("Class", name))?;
        let mut ids: Vec<i32> = class.cluster_ids.clone();
        if polymorphic {
            for sub in self.subclasses(name) {
                ids.extend(sub.cluster_ids.iter().copied());
            }
        }
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    pub fn class_owning_cluster(&self, cluster_id: i32) -> Option<&str> {
        self.classes
            .values()
            .find(|c| c.cluster_ids.contains(&cluster_id))
            .map(|c| c.name.as_str())
    }

    /// Check whether the class is a vertex or edge class
    pub fn is_graph_class(&self, name: &str) -> bool {
        self.is_sub_class_of(name, VERTEX_CLASS) || self.is_sub_class_of(name, EDGE_CLASS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        let mut schema = Schema::new();
        schema.create_class("V", &[], vec![1], false).unwrap();
        schema.create_class("Person", &["V"], vec![10], false).unwrap();
        schema.create_class("Employee", &["Person"], vec![11], false).unwrap();
        schema.create_class("Invoice", &[], vec![12, 13], false).unwrap();
        schema
    }

    #[test]
    fn test_inheritance_is_transitive() {
        let schema = sample_schema();
        assert!(schema.is_sub_class_of("employee", "V"));
        assert!(schema.is_graph_class("Employee"));
        assert!(!schema.is_graph_class("Invoice"));

        let subs: Vec<&str> = schema.subclasses("Person").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(subs, vec!["Employee"]);
    }

    #[test]
    fn test_polymorphic_cluster_ids() {
        let schema = sample_schema();
        assert_eq!(schema.cluster_ids("Person", false).unwrap(), vec![10]);
        assert_eq!(schema.cluster_ids("Person", true).unwrap(), vec![10, 11]);
        assert!(schema.cluster_ids("Missing", true).is_err());
    }

    #[test]
    fn test_cluster_cannot_have_two_owners() {
        let mut schema = sample_schema();
        let result = schema.create_class("Other", &[], vec![12], false);
        assert!(matches!(result, Err(CatalogError::InUse { .. })));
        assert_eq!(schema.class_owning_cluster(13), Some("Invoice"));
    }
}
