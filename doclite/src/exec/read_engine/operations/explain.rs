// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! EXPLAIN executor
//!
//! Runs the wrapped command with profiling enabled and replaces its result with
//! a single row describing the execution.

use std::time::Instant;

use crate::ast::ExplainStatement;
use crate::db::state::EngineState;
use crate::exec::{
    executor_for, ExecutionContext, ExecutionError, OperationType, Permission, QueryResult,
    QuorumType, Row, StatementExecutor,
};
use crate::storage::Value;

/// Executor for EXPLAIN statements
pub struct ExplainExecutor {
    text: String,
    inner: Box<dyn StatementExecutor>,
}

impl ExplainExecutor {
    pub fn new(statement: ExplainStatement) -> Self {
        Self {
            inner: executor_for(&statement.statement),
            text: statement.text,
        }
    }
}

fn result_type(result: &QueryResult) -> &'static str {
    match &result.value {
        Some(Value::Integer(_)) | Some(Value::Float(_)) => "number",
        Some(Value::Boolean(_)) => "boolean",
        _ => "collection",
    }
}

impl StatementExecutor for ExplainExecutor {
    fn syntax(&self) -> &'static str {
        "EXPLAIN <command>"
    }

    fn operation_type(&self) -> OperationType {
        self.inner.operation_type()
    }

    fn operation_description(&self) -> String {
        format!("EXPLAIN {}", self.inner.operation_description())
    }

    fn quorum_type(&self) -> QuorumType {
        self.inner.quorum_type()
    }

    fn is_idempotent(&self) -> bool {
        self.inner.is_idempotent()
    }

    fn involved_clusters(&self, state: &EngineState) -> Vec<String> {
        self.inner.involved_clusters(state)
    }

    fn required_permission(&self, state: &EngineState) -> Option<Permission> {
        self.inner.required_permission(state)
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let involved = self.inner.involved_clusters(context.state());
        context.enable_profiling();

        let started = Instant::now();
        let result = self.inner.execute(context)?;
        let elapsed = started.elapsed();
        let stats = context.stats();

        let row = Row::new()
            .with("elapsed", elapsed.as_secs_f64() * 1000.0)
            .with("resultType", result_type(&result))
            .with("resultSize", result.len())
            .with("recordsScanned", stats.records_scanned)
            .with("recordsDeleted", stats.records_deleted)
            .with("indexesRebuilt", stats.indexes_rebuilt)
            .with("command", self.text.clone())
            .with("quorum", self.inner.quorum_type().to_string())
            .with("involvedClusters", Value::from(involved));
        Ok(QueryResult::from_row(row))
    }
}

#[cfg(test)]
mod tests {
    use crate::exec::test_support::Fixture;
    use crate::exec::ExecutionError;
    use crate::storage::Value;

    #[test]
    fn test_explain_truncate_reports_counters() {
        let mut fixture = Fixture::new();
        fixture.state.create_class("Doc", &[], false).unwrap();
        fixture.populate("Doc", 3);

        let result = fixture.sql("EXPLAIN TRUNCATE CLASS Doc").unwrap();
        let row = &result.rows[0];
        assert_eq!(row.get("resultType"), Some(&Value::from("number")));
        assert_eq!(row.get("recordsDeleted"), Some(&Value::Integer(3)));
        assert_eq!(row.get("command"), Some(&Value::from("TRUNCATE CLASS Doc")));
        assert_eq!(row.get("quorum"), Some(&Value::from("WRITE")));
        assert_eq!(
            row.get("involvedClusters"),
            Some(&Value::List(vec![Value::from("doc")]))
        );
        // the inner command really ran
        let cluster = fixture.state.clusters.id_of("doc").unwrap();
        assert_eq!(fixture.state.clusters.record_count(cluster), 0);
    }

    #[test]
    fn test_result_types() {
        let mut fixture = Fixture::new();
        let result = fixture.sql("EXPLAIN DROP CLUSTER ghost IF EXISTS").unwrap();
        assert_eq!(result.rows[0].get("resultType"), Some(&Value::from("boolean")));

        let result = fixture.sql("EXPLAIN FIND REFERENCES #0:0").unwrap();
        assert_eq!(result.rows[0].get("resultType"), Some(&Value::from("collection")));
        assert_eq!(result.rows[0].get("resultSize"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_inner_errors_propagate() {
        let mut fixture = Fixture::new();
        assert!(matches!(
            fixture.sql("EXPLAIN DROP CLUSTER ghost"),
            Err(ExecutionError::Catalog(_))
        ));
        assert!(matches!(
            fixture.sql("EXPLAIN EXPLAIN DROP CLUSTER ghost"),
            Err(ExecutionError::Parse(_))
        ));
    }
}
