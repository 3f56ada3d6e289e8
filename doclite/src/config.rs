// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Database configuration
//!
//! Values come from `Default`, optionally a JSON file, then environment
//! overrides (`DOCLITE_*`), in that order.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::sequence::{DEFAULT_CACHE, DEFAULT_INCREMENT, DEFAULT_START};
use crate::storage::{StorageError, StorageResult, StorageType};

pub const ENV_STORAGE: &str = "DOCLITE_STORAGE";
pub const ENV_PATH: &str = "DOCLITE_PATH";
pub const ENV_PARSE_CACHE: &str = "DOCLITE_PARSE_CACHE";
pub const ENV_BCRYPT_COST: &str = "DOCLITE_BCRYPT_COST";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub storage: StorageType,
    pub path: Option<PathBuf>,
    pub sequence_start: i64,
    pub sequence_increment: i64,
    pub sequence_cache_size: i64,
    /// Distributed timeout reported by read and data commands
    pub command_timeout_ms: u64,
    /// Distributed timeout reported by schema and security commands
    pub ddl_timeout_ms: u64,
    pub parse_cache_capacity: usize,
    pub bcrypt_cost: u32,
    pub admin_password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            storage: StorageType::Memory,
            path: None,
            sequence_start: DEFAULT_START,
            sequence_increment: DEFAULT_INCREMENT,
            sequence_cache_size: DEFAULT_CACHE,
            command_timeout_ms: 120_000,
            ddl_timeout_ms: 600_000,
            parse_cache_capacity: 256,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            admin_password: "admin".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// In-memory configuration
    pub fn memory() -> Self {
        Self::default()
    }

    /// Sled-backed configuration rooted at `path`
    pub fn sled<P: AsRef<Path>>(path: P) -> Self {
        Self {
            storage: StorageType::Sled,
            path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: DatabaseConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `DOCLITE_*` environment variables
    pub fn apply_env(mut self) -> StorageResult<Self> {
        if let Ok(storage) = env::var(ENV_STORAGE) {
            self.storage = storage.parse().map_err(StorageError::Configuration)?;
        }
        if let Ok(path) = env::var(ENV_PATH) {
            self.path = Some(PathBuf::from(path));
        }
        if let Ok(capacity) = env::var(ENV_PARSE_CACHE) {
            self.parse_cache_capacity = capacity.parse().map_err(|_| {
                StorageError::Configuration(format!("Invalid {} value: {}", ENV_PARSE_CACHE, capacity))
            })?;
        }
        if let Ok(cost) = env::var(ENV_BCRYPT_COST) {
            self.bcrypt_cost = cost.parse().map_err(|_| {
                StorageError::Configuration(format!("Invalid {} value: {}", ENV_BCRYPT_COST, cost))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> StorageResult<()> {
        if self.storage == StorageType::Sled && self.path.is_none() {
            return Err(StorageError::Configuration(
                "sled storage requires a database path".to_string(),
            ));
        }
        if self.sequence_increment <= 0 || self.sequence_cache_size <= 0 {
            return Err(StorageError::Configuration(
                "sequence increment and cache size must be positive".to_string(),
            ));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(StorageError::Configuration(format!(
                "bcrypt cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }
        Ok(())
    }

    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_storage(mut self, storage: StorageType) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_admin_password(mut self, password: &str) -> Self {
        self.admin_password = password.to_string();
        self
    }

    pub fn with_parse_cache_capacity(mut self, capacity: usize) -> Self {
        self.parse_cache_capacity = capacity;
        self
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn ddl_timeout(&self) -> Duration {
        Duration::from_millis(self.ddl_timeout_ms)
    }
}
