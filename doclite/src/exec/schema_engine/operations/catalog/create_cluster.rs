// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CREATE [BLOB] CLUSTER executor

use crate::ast::CreateClusterStatement;
use crate::catalog::security::{Resource, ResourceGeneric, PERMISSION_CREATE};
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Executor for CREATE CLUSTER statements
pub struct CreateClusterExecutor {
    statement: CreateClusterStatement,
}

impl CreateClusterExecutor {
    pub fn new(statement: CreateClusterStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for CreateClusterExecutor {
    fn syntax(&self) -> &'static str {
        "CREATE [BLOB] CLUSTER <name> [ID <id>]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Schema
    }

    fn operation_description(&self) -> String {
        let kind = if self.statement.blob { "blob cluster" } else { "cluster" };
        format!("CREATE {} '{}'", kind, self.statement.name)
    }

    fn involved_clusters(&self, _state: &EngineState) -> Vec<String> {
        vec![self.statement.name.to_lowercase()]
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(
            Resource::generic(ResourceGeneric::Cluster),
            PERMISSION_CREATE,
        ))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let state = context.state_mut();
        let id = state
            .clusters
            .add_cluster(&self.statement.name, self.statement.id, self.statement.blob)?;
        let name = state.clusters.name_of(id).unwrap_or_default().to_string();

        let row = Row::new()
            .with("operation", "create cluster")
            .with("name", name)
            .with("id", id)
            .with("blob", self.statement.blob);
        Ok(QueryResult::from_row(row).with_value(id))
    }
}
