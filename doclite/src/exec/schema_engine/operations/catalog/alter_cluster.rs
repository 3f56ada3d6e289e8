// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! ALTER CLUSTER executor
//!
//! A selector ending in `*` applies the change to every cluster whose name
//! starts with the prefix, producing one row per cluster.

use crate::ast::{AlterClusterStatement, ClusterAttribute, ClusterSelector};
use crate::catalog::security::{Resource, ResourceGeneric, PERMISSION_UPDATE};
use crate::catalog::{CatalogError, ClusterStatus, ConflictStrategy};
use crate::db::state::EngineState;
use crate::exec::{
    cluster_names, cluster_resource, resolve_cluster, CollectingListener, ExecutionContext, ExecutionError,
    OperationType, Permission, QueryResult, ResultListener, Row, StatementExecutor,
};

/// Executor for ALTER CLUSTER statements
pub struct AlterClusterExecutor {
    statement: AlterClusterStatement,
}

impl AlterClusterExecutor {
    pub fn new(statement: AlterClusterStatement) -> Self {
        Self { statement }
    }

    fn target_ids(&self, state: &EngineState) -> Result<Vec<i32>, CatalogError> {
        match &self.statement.selector {
            ClusterSelector::Single(cluster) => resolve_cluster(&state.clusters, cluster)
                .map(|id| vec![id])
                .ok_or_else(|| CatalogError::not_found("Cluster", cluster.to_string())),
            ClusterSelector::Prefix(prefix) => {
                let ids = state.clusters.ids_with_prefix(prefix);
                if ids.is_empty() {
                    return Err(CatalogError::not_found("Cluster", format!("{}*", prefix)));
                }
                Ok(ids)
            }
        }
    }

    fn apply(&self, state: &mut EngineState, id: i32) -> Result<(), CatalogError> {
        let value = self.statement.value.as_str();
        match self.statement.attribute {
            ClusterAttribute::Name => state.clusters.rename(id, value),
            ClusterAttribute::Status => state.clusters.set_status(id, value.parse::<ClusterStatus>()?),
            ClusterAttribute::ConflictStrategy => state
                .clusters
                .set_conflict_strategy(id, value.parse::<ConflictStrategy>()?),
        }
    }
}

impl StatementExecutor for AlterClusterExecutor {
    fn syntax(&self) -> &'static str {
        "ALTER CLUSTER <name|id|prefix*> <NAME|STATUS|CONFLICTSTRATEGY> <value>"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Schema
    }

    fn operation_description(&self) -> String {
        let target = match &self.statement.selector {
            ClusterSelector::Single(cluster) => cluster.to_string(),
            ClusterSelector::Prefix(prefix) => format!("{}*", prefix),
        };
        format!(
            "ALTER CLUSTER '{}' {} {}",
            target, self.statement.attribute, self.statement.value
        )
    }

    fn involved_clusters(&self, state: &EngineState) -> Vec<String> {
        self.target_ids(state)
            .map(|ids| cluster_names(&state.clusters, &ids))
            .unwrap_or_default()
    }

    fn required_permission(&self, state: &EngineState) -> Option<Permission> {
        let resource = match &self.statement.selector {
            ClusterSelector::Single(cluster) => cluster_resource(&state.clusters, cluster),
            ClusterSelector::Prefix(_) => Resource::generic(ResourceGeneric::Cluster),
        };
        Some(Permission::new(resource, PERMISSION_UPDATE))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let ids = self.target_ids(context.state())?;
        let mut listener = CollectingListener::new();
        let state = context.state_mut();

        for id in ids {
            let old_name = state.clusters.name_of(id).unwrap_or_default().to_string();
            self.apply(state, id)?;
            log::info!(
                "Altered cluster '{}': {} = {}",
                old_name,
                self.statement.attribute,
                self.statement.value
            );
            let row = Row::new()
                .with("cluster", old_name)
                .with("attribute", self.statement.attribute.to_string())
                .with("value", self.statement.value.clone());
            if !listener.on_result(row) {
                break;
            }
        }
        listener.end();
        Ok(listener.result())
    }
}
