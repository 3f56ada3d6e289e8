// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! DROP CLUSTER executor

use crate::ast::DropClusterStatement;
use crate::catalog::security::PERMISSION_DELETE;
use crate::catalog::CatalogError;
use crate::db::state::EngineState;
use crate::exec::{
    cluster_resource, resolve_cluster, ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Executor for DROP CLUSTER statements
pub struct DropClusterExecutor {
    statement: DropClusterStatement,
}

impl DropClusterExecutor {
    pub fn new(statement: DropClusterStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for DropClusterExecutor {
    fn syntax(&self) -> &'static str {
        "DROP CLUSTER <name|id> [IF EXISTS]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Schema
    }

    fn operation_description(&self) -> String {
        format!("DROP CLUSTER '{}'", self.statement.cluster)
    }

    fn involved_clusters(&self, state: &EngineState) -> Vec<String> {
        resolve_cluster(&state.clusters, &self.statement.cluster)
            .and_then(|id| state.clusters.name_of(id))
            .map(|name| vec![name.to_string()])
            .unwrap_or_default()
    }

    fn required_permission(&self, state: &EngineState) -> Option<Permission> {
        Some(Permission::new(
            cluster_resource(&state.clusters, &self.statement.cluster),
            PERMISSION_DELETE,
        ))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let Some(id) = resolve_cluster(&context.state().clusters, &self.statement.cluster) else {
            if self.statement.if_exists {
                log::debug!("Cluster '{}' does not exist, nothing to drop", self.statement.cluster);
                let row = Row::new()
                    .with("operation", "drop cluster")
                    .with("name", self.statement.cluster.to_string())
                    .with("dropped", false);
                return Ok(QueryResult::from_row(row).with_value(false));
            }
            return Err(CatalogError::not_found("Cluster", self.statement.cluster.to_string()).into());
        };

        if let Some(owner) = context.state().schema.class_owning_cluster(id) {
            let name = context.state().clusters.name_of(id).unwrap_or_default();
            return Err(CatalogError::in_use(
                "Cluster",
                name,
                format!("it belongs to class '{}'", owner),
            )
            .into());
        }

        let state = context.state_mut();
        let cluster = state.clusters.drop_cluster(id)?;
        for record in cluster.records() {
            state.indexes.on_record_deleted(record, &state.schema);
        }

        let row = Row::new()
            .with("operation", "drop cluster")
            .with("name", cluster.name.clone())
            .with("dropped", true);
        Ok(QueryResult::from_row(row).with_value(true))
    }
}
