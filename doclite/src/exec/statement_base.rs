// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Base trait shared by every command executor

use std::fmt;
use std::time::Duration;

use crate::catalog::security::{permission_to_string, Resource};
use crate::config::DatabaseConfig;
use crate::db::state::EngineState;
use crate::exec::context::ExecutionContext;
use crate::exec::error::ExecutionError;
use crate::exec::result::QueryResult;

/// Broad category of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Clusters, sequences, functions, indexes
    Schema,
    /// Users, roles, permissions
    Security,
    /// Record deletion
    Data,
    Read,
    /// Live queries and transaction control
    Meta,
}

impl OperationType {
    /// Whether the command changes the engine state
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            OperationType::Schema | OperationType::Security | OperationType::Data
        )
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationType::Schema => "schema",
            OperationType::Security => "security",
            OperationType::Data => "data",
            OperationType::Read => "read",
            OperationType::Meta => "meta",
        };
        write!(f, "{}", name)
    }
}

/// Replica acknowledgement a command asks for before it counts as committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuorumType {
    None,
    Read,
    Write,
    All,
}

impl fmt::Display for QuorumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuorumType::None => "NONE",
            QuorumType::Read => "READ",
            QuorumType::Write => "WRITE",
            QuorumType::All => "ALL",
        };
        write!(f, "{}", name)
    }
}

/// Permission a session must hold to run a command
#[derive(Debug, Clone, PartialEq)]
pub struct Permission {
    pub resource: Resource,
    pub operation: u8,
}

impl Permission {
    pub fn new(resource: Resource, operation: u8) -> Self {
        Self {
            resource,
            operation,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", permission_to_string(self.operation), self.resource)
    }
}

/// Common behavior of all command executors
pub trait StatementExecutor {
    /// Grammar of the command, shown in errors and help
    fn syntax(&self) -> &'static str;

    fn operation_type(&self) -> OperationType;

    /// Short human readable description used in logs
    fn operation_description(&self) -> String;

    fn quorum_type(&self) -> QuorumType {
        match self.operation_type() {
            OperationType::Schema | OperationType::Security => QuorumType::All,
            OperationType::Data => QuorumType::Write,
            OperationType::Read => QuorumType::Read,
            OperationType::Meta => QuorumType::None,
        }
    }

    fn distributed_timeout(&self, config: &DatabaseConfig) -> Duration {
        match self.operation_type() {
            OperationType::Schema | OperationType::Security => config.ddl_timeout(),
            _ => config.command_timeout(),
        }
    }

    fn is_idempotent(&self) -> bool {
        false
    }

    /// Names of the clusters the command touches
    fn involved_clusters(&self, _state: &EngineState) -> Vec<String> {
        Vec::new()
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission>;

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError>;
}
