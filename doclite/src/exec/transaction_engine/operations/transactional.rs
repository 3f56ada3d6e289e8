// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! TRANSACTIONAL wrapper executor
//!
//! The wrapped command runs against the same working copy as any other
//! command: on success the copy is committed in one step, on error it is
//! discarded. Inside an explicit transaction the command simply joins it.

use crate::ast::TransactionalStatement;
use crate::config::DatabaseConfig;
use crate::db::state::EngineState;
use crate::exec::{
    executor_for, ExecutionContext, ExecutionError, OperationType, Permission, QueryResult,
    QuorumType, StatementExecutor,
};
use std::time::Duration;

/// Executor for TRANSACTIONAL statements
pub struct TransactionalExecutor {
    inner: Box<dyn StatementExecutor>,
}

impl TransactionalExecutor {
    pub fn new(statement: TransactionalStatement) -> Self {
        Self {
            inner: executor_for(&statement.statement),
        }
    }
}

impl StatementExecutor for TransactionalExecutor {
    fn syntax(&self) -> &'static str {
        self.inner.syntax()
    }

    fn operation_type(&self) -> OperationType {
        self.inner.operation_type()
    }

    fn operation_description(&self) -> String {
        format!("TRANSACTIONAL {}", self.inner.operation_description())
    }

    fn quorum_type(&self) -> QuorumType {
        self.inner.quorum_type()
    }

    fn distributed_timeout(&self, config: &DatabaseConfig) -> Duration {
        self.inner.distributed_timeout(config)
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
        let joined = context.in_transaction();
        if !joined {
            log::debug!("Begin transaction for {}", self.inner.operation_description());
        }
        match self.inner.execute(context) {
            Ok(result) => {
                if !joined {
                    log::debug!("Commit transaction for {}", self.inner.operation_description());
                }
                Ok(result)
            }
            Err(e) => {
                log::warn!(
                    "Rolling back {}: {}",
                    self.inner.operation_description(),
                    e
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::exec::test_support::Fixture;
    use crate::exec::{ExecutionError, OperationType};

    #[test]
    fn test_wraps_inner_command() {
        let mut fixture = Fixture::new();
        let statement = crate::ast::parse_statement("TRANSACTIONAL CREATE CLUSTER wrapped").unwrap();
        let executor = crate::exec::executor_for(&statement);
        assert_eq!(executor.operation_type(), OperationType::Schema);
        assert_eq!(executor.syntax(), "CREATE [BLOB] CLUSTER <name> [ID <id>]");

        fixture.run(executor.as_ref()).unwrap();
        assert!(fixture.state.clusters.id_of("wrapped").is_some());
    }

    #[test]
    fn test_failed_inner_command_changes_nothing() {
        let mut fixture = Fixture::new();
        fixture.state.create_class("Doc", &[], false).unwrap();
        let before = fixture.state.clusters.len();
        assert!(matches!(
            fixture.sql("TRANSACTIONAL DROP CLUSTER doc"),
            Err(ExecutionError::Catalog(_))
        ));
        assert_eq!(fixture.state.clusters.len(), before);
    }
}
