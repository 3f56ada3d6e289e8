// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog error types

use thiserror::Error;

/// Errors raised by the catalog collaborators (clusters, schema, indexes,
/// sequences, functions and security)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("{kind} '{name}' is in use: {reason}")]
    InUse {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Sequence '{name}' reached its limit {limit}")]
    SequenceLimitReached { name: String, limit: i64 },

    #[error("Duplicate key {key} in unique index '{index}'")]
    DuplicateKey { index: String, key: String },

    #[error("Cluster '{0}' is offline")]
    ClusterOffline(String),

    #[error("Security error: {0}")]
    Security(String),
}

impl CatalogError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        CatalogError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn already_exists(kind: &'static str, name: impl Into<String>) -> Self {
        CatalogError::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    pub fn in_use(kind: &'static str, name: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::InUse {
            kind,
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
