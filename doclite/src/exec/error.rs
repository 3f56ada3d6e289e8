// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Execution errors

use thiserror::Error;

use crate::ast::ParseError;
use crate::catalog::security::permission_to_string;
use crate::catalog::CatalogError;
use crate::exec::statement_base::Permission;
use crate::storage::StorageError;

/// Errors returned by command execution and the database facade
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("User '{user}' does not have {permission} permission on {resource}")]
    PermissionDenied {
        user: String,
        permission: String,
        resource: String,
    },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Transaction error: {0}")]
    Transaction(String),
}

impl ExecutionError {
    pub fn permission_denied(user: &str, permission: &Permission) -> Self {
        ExecutionError::PermissionDenied {
            user: user.to_string(),
            permission: permission_to_string(permission.operation),
            resource: permission.resource.to_string(),
        }
    }

    /// Catalog error carried by this error, if any
    pub fn as_catalog(&self) -> Option<&CatalogError> {
        match self {
            ExecutionError::Catalog(e) => Some(e),
            _ => None,
        }
    }
}
