// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! TRUNCATE RECORD executor

use crate::ast::{ClusterRef, TruncateRecordStatement};
use crate::catalog::security::{Resource, ResourceGeneric, PERMISSION_DELETE};
use crate::db::state::EngineState;
use crate::exec::{
    cluster_names, cluster_resource, ExecutionContext, ExecutionError, OperationType, Permission,
    QueryResult, Row, StatementExecutor,
};
use crate::live::RecordChange;

/// Executor for TRUNCATE RECORD statements
pub struct TruncateRecordExecutor {
    statement: TruncateRecordStatement,
}

impl TruncateRecordExecutor {
    pub fn new(statement: TruncateRecordStatement) -> Self {
        Self { statement }
    }

    fn cluster_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.statement.rids.iter().map(|rid| rid.cluster).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl StatementExecutor for TruncateRecordExecutor {
    fn syntax(&self) -> &'static str {
        "TRUNCATE RECORD <rid> | [<rid>, ...]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Data
    }

    fn operation_description(&self) -> String {
        format!("TRUNCATE RECORD ({} records)", self.statement.rids.len())
    }

    fn involved_clusters(&self, state: &EngineState) -> Vec<String> {
        cluster_names(&state.clusters, &self.cluster_ids())
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(
            Resource::generic(ResourceGeneric::Cluster),
            PERMISSION_DELETE,
        ))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        // rids may span clusters, so specific cluster rules are checked here
        for id in self.cluster_ids() {
            let resource = cluster_resource(&context.state().clusters, &ClusterRef::Id(id));
            if resource.specific.is_some() {
                context.check_permission(&Permission::new(resource, PERMISSION_DELETE))?;
            }
        }

        let mut deleted = 0;
        for rid in &self.statement.rids {
            if context.state().clusters.load(rid).is_none() {
                log::debug!("Record {} does not exist, skipping", rid);
                continue;
            }
            if let Some(record) = context.state_mut().delete_record(rid)? {
                deleted += 1;
                context.record_change(RecordChange::deleted(record));
            }
        }
        context.stats_mut().records_deleted += deleted;

        let row = Row::new()
            .with("operation", "truncate record")
            .with("count", deleted);
        Ok(QueryResult::from_row(row).with_value(deleted))
    }
}

#[cfg(test)]
mod tests {
    use crate::exec::test_support::Fixture;
    use crate::storage::Value;

    #[test]
    fn test_missing_records_are_skipped() {
        let mut fixture = Fixture::new();
        fixture.state.create_class("Doc", &[], false).unwrap();
        let rids = fixture.populate("Doc", 2);

        let sql = format!("TRUNCATE RECORD [{}, #77:0, {}]", rids[0], rids[1]);
        let result = fixture.sql(&sql).unwrap();
        assert_eq!(result.value, Some(Value::Integer(2)));
        assert!(fixture.state.clusters.load(&rids[0]).is_none());
        assert_eq!(fixture.changes.len(), 2);
    }

    #[test]
    fn test_single_rid() {
        let mut fixture = Fixture::new();
        let rid = fixture.populate("V", 1)[0];
        let result = fixture.sql(&format!("TRUNCATE RECORD {}", rid)).unwrap();
        assert_eq!(result.value, Some(Value::Integer(1)));
        assert_eq!(fixture.sql(&format!("TRUNCATE RECORD {}", rid)).unwrap().value, Some(Value::Integer(0)));
    }
}
