// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! TRUNCATE CLASS executor

use crate::ast::TruncateClassStatement;
use crate::catalog::security::{Resource, ResourceGeneric, PERMISSION_DELETE};
use crate::catalog::CatalogError;
use crate::db::state::EngineState;
use crate::exec::write_engine::truncate_clusters;
use crate::exec::{
    cluster_names, ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Executor for TRUNCATE CLASS statements
pub struct TruncateClassExecutor {
    statement: TruncateClassStatement,
}

impl TruncateClassExecutor {
    pub fn new(statement: TruncateClassStatement) -> Self {
        Self { statement }
    }

    /// Check the safety rules and return the clusters to truncate
    fn target_clusters(&self, state: &EngineState) -> Result<Vec<i32>, ExecutionError> {
        let class_name = &self.statement.class_name;
        let class = state
            .schema
            .get_class(class_name)
            .ok_or_else(|| CatalogError::not_found("Class", class_name.as_str()))?;

        if !self.statement.polymorphic {
            for sub in state.schema.subclasses(class_name) {
                let records: usize = sub
                    .cluster_ids
                    .iter()
                    .map(|id| state.clusters.record_count(*id))
                    .sum();
                if records > 0 {
                    return Err(ExecutionError::InvalidCommand(format!(
                        "Class '{}' has subclass '{}' with {} records. Use TRUNCATE CLASS {} POLYMORPHIC to delete them too",
                        class.name, sub.name, records, class.name
                    )));
                }
            }
        }

        let ids = state.schema.cluster_ids(class_name, self.statement.polymorphic)?;
        let total: usize = ids.iter().map(|id| state.clusters.record_count(*id)).sum();
        if total > 0 && !self.statement.unsafe_mode && state.schema.is_graph_class(class_name) {
            return Err(ExecutionError::InvalidCommand(format!(
                "'TRUNCATE CLASS' on vertex or edge class '{}' can break graph consistency. Use 'DELETE VERTEX' or 'DELETE EDGE', or add the UNSAFE keyword to force it",
                class.name
            )));
        }
        Ok(ids)
    }
}

impl StatementExecutor for TruncateClassExecutor {
    fn syntax(&self) -> &'static str {
        "TRUNCATE CLASS <class> [POLYMORPHIC] [UNSAFE]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Data
    }

    fn operation_description(&self) -> String {
        format!("TRUNCATE CLASS '{}'", self.statement.class_name)
    }

    fn involved_clusters(&self, state: &EngineState) -> Vec<String> {
        state
            .schema
            .cluster_ids(&self.statement.class_name, self.statement.polymorphic)
            .map(|ids| cluster_names(&state.clusters, &ids))
            .unwrap_or_default()
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(
            Resource::specific(ResourceGeneric::Class, &self.statement.class_name),
            PERMISSION_DELETE,
        ))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let ids = self.target_clusters(context.state())?;
        let deleted = truncate_clusters(context, &ids)?;
        log::info!(
            "Truncated class '{}': {} records deleted",
            self.statement.class_name,
            deleted
        );

        let row = Row::new()
            .with("operation", "truncate class")
            .with("class", self.statement.class_name.clone())
            .with("count", deleted);
        Ok(QueryResult::from_row(row).with_value(deleted))
    }
}
