// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;

use doclite::{Database, DatabaseConfig, QueryResult, Record, Session, Value};

/// Low bcrypt cost keeps user creation fast in tests
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config() -> DatabaseConfig {
    DatabaseConfig::memory().with_bcrypt_cost(TEST_BCRYPT_COST)
}

/// In-memory database plus a root session
pub struct DbFixture {
    pub db: Database,
    pub root: Session,
}

impl DbFixture {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: DatabaseConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let db = Database::open(config).expect("Failed to open test database");
        let root = db.root_session();
        Self { db, root }
    }

    pub fn assert_command_succeeds(&self, sql: &str) -> QueryResult {
        match self.db.command(&self.root, sql) {
            Ok(result) => result,
            Err(e) => panic!("Command '{}' failed: {}", sql, e),
        }
    }

    pub fn assert_command_fails(&self, sql: &str) -> String {
        match self.db.command(&self.root, sql) {
            Ok(result) => panic!("Command '{}' unexpectedly succeeded: {:?}", sql, result),
            Err(e) => e.to_string(),
        }
    }

    /// Create a class and insert `count` records with a `n` field
    pub fn populate(&self, class_name: &str, super_classes: &[&str], count: usize) -> Vec<Record> {
        self.db
            .create_class(&self.root, class_name, super_classes, false)
            .expect("Failed to create class");
        (0..count)
            .map(|n| self.insert(class_name, &[("n", Value::from(n))]))
            .collect()
    }

    pub fn insert(&self, class_name: &str, fields: &[(&str, Value)]) -> Record {
        let fields: BTreeMap<String, Value> = fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        self.db
            .insert(&self.root, class_name, fields)
            .expect("Failed to insert record")
    }

    pub fn count_records(&self, cluster: &str) -> usize {
        self.db.with_state(&self.root, |state| {
            state
                .clusters
                .id_of(cluster)
                .and_then(|id| state.clusters.get(id))
                .map(|c| c.records().count())
                .unwrap_or(0)
        })
    }
}
