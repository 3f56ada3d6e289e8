// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! BEGIN / COMMIT / ROLLBACK executor

use crate::ast::TransactionControl;
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Executor for explicit transaction boundaries
pub struct TransactionControlExecutor {
    control: TransactionControl,
}

impl TransactionControlExecutor {
    pub fn new(control: TransactionControl) -> Self {
        Self { control }
    }

    fn keyword(&self) -> &'static str {
        match self.control {
            TransactionControl::Begin => "begin",
            TransactionControl::Commit => "commit",
            TransactionControl::Rollback => "rollback",
        }
    }
}

impl StatementExecutor for TransactionControlExecutor {
    fn syntax(&self) -> &'static str {
        match self.control {
            TransactionControl::Begin => "BEGIN [TRANSACTION]",
            TransactionControl::Commit => "COMMIT [TRANSACTION]",
            TransactionControl::Rollback => "ROLLBACK [TRANSACTION]",
        }
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Meta
    }

    fn operation_description(&self) -> String {
        self.keyword().to_uppercase()
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        None
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        match (self.control, context.in_transaction()) {
            (TransactionControl::Begin, true) => {
                return Err(ExecutionError::Transaction(
                    "a transaction is already active in this session".to_string(),
                ))
            }
            (TransactionControl::Commit | TransactionControl::Rollback, false) => {
                return Err(ExecutionError::Transaction(format!(
                    "cannot {}: no active transaction",
                    self.keyword()
                )))
            }
            _ => {}
        }
        context.request_transaction(self.control)?;
        Ok(QueryResult::from_row(Row::new().with("operation", self.keyword())))
    }
}
