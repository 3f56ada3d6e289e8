// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! TRUNCATE CLUSTER executor

use crate::ast::TruncateClusterStatement;
use crate::catalog::security::PERMISSION_DELETE;
use crate::db::state::EngineState;
use crate::exec::write_engine::truncate_clusters;
use crate::exec::{
    cluster_resource, require_cluster, resolve_cluster, ExecutionContext, ExecutionError,
    OperationType, Permission, QueryResult, Row, StatementExecutor,
};

/// Executor for TRUNCATE CLUSTER statements
pub struct TruncateClusterExecutor {
    statement: TruncateClusterStatement,
}

impl TruncateClusterExecutor {
    pub fn new(statement: TruncateClusterStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for TruncateClusterExecutor {
    fn syntax(&self) -> &'static str {
        "TRUNCATE CLUSTER <name|id> [UNSAFE]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Data
    }

    fn operation_description(&self) -> String {
        format!("TRUNCATE CLUSTER '{}'", self.statement.cluster)
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
        let state = context.state();
        let id = require_cluster(&state.clusters, &self.statement.cluster)?;
        let name = state.clusters.name_of(id).unwrap_or_default().to_string();

        if let Some(owner) = state.schema.class_owning_cluster(id) {
            let non_empty = state.clusters.record_count(id) > 0;
            if non_empty && !self.statement.unsafe_mode && state.schema.is_graph_class(owner) {
                return Err(ExecutionError::InvalidCommand(format!(
                    "Cluster '{}' belongs to vertex or edge class '{}'. Add the UNSAFE keyword to truncate it",
                    name, owner
                )));
            }
        }

        let deleted = truncate_clusters(context, &[id])?;
        let row = Row::new()
            .with("operation", "truncate cluster")
            .with("cluster", name)
            .with("count", deleted);
        Ok(QueryResult::from_row(row).with_value(deleted))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::parse_statement;
    use crate::catalog::{CatalogError, ClusterStatus};
    use crate::exec::test_support::Fixture;
    use crate::exec::{executor_for, ExecutionError};
    use crate::storage::Value;

    #[test]
    fn test_truncate_cluster_by_name_and_id() {
        let mut fixture = Fixture::new();
        let cluster = fixture.state.create_class("Doc", &[], false).unwrap();
        fixture.populate("Doc", 4);

        assert_eq!(fixture.sql("TRUNCATE CLUSTER doc").unwrap().value, Some(Value::Integer(4)));
        fixture.populate("Doc", 1);
        let sql = format!("TRUNCATE CLUSTER {}", cluster);
        assert_eq!(fixture.sql(&sql).unwrap().value, Some(Value::Integer(1)));
    }

    #[test]
    fn test_vertex_cluster_needs_unsafe() {
        let mut fixture = Fixture::new();
        fixture.populate("V", 2);
        assert!(matches!(
            fixture.sql("TRUNCATE CLUSTER v"),
            Err(ExecutionError::InvalidCommand(_))
        ));
        assert_eq!(fixture.sql("TRUNCATE CLUSTER v UNSAFE").unwrap().value, Some(Value::Integer(2)));
    }

    #[test]
    fn test_offline_cluster_cannot_be_truncated() {
        let mut fixture = Fixture::new();
        let id = fixture.state.create_class("Doc", &[], false).unwrap();
        fixture.populate("Doc", 1);
        fixture.state.clusters.set_status(id, ClusterStatus::Offline).unwrap();
        assert!(matches!(
            fixture.sql("TRUNCATE CLUSTER doc"),
            Err(ExecutionError::Catalog(CatalogError::ClusterOffline(_)))
        ));
    }

    #[test]
    fn test_permission_names_cluster_given_by_id() {
        let mut fixture = Fixture::new();
        let id = fixture.state.create_class("Doc", &[], false).unwrap();
        let by_id = parse_statement(&format!("TRUNCATE CLUSTER {}", id)).unwrap();
        let permission = executor_for(&by_id).required_permission(&fixture.state).unwrap();
        assert_eq!(permission.resource.to_string(), "database.cluster.doc");

        let unknown = parse_statement("TRUNCATE CLUSTER 99").unwrap();
        let permission = executor_for(&unknown).required_permission(&fixture.state).unwrap();
        assert_eq!(permission.resource.to_string(), "database.cluster");
    }

    #[test]
    fn test_unknown_cluster() {
        let mut fixture = Fixture::new();
        assert!(matches!(
            fixture.sql("TRUNCATE CLUSTER 99"),
            Err(ExecutionError::Catalog(CatalogError::NotFound { .. }))
        ));
    }
}
