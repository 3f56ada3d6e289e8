// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! DROP USER executor

use crate::ast::DropUserStatement;
use crate::catalog::security::{Resource, PERMISSION_DELETE};
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Executor for DROP USER statements
pub struct DropUserExecutor {
    statement: DropUserStatement,
}

impl DropUserExecutor {
    pub fn new(statement: DropUserStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for DropUserExecutor {
    fn syntax(&self) -> &'static str {
        "DROP USER <name>"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Security
    }

    fn operation_description(&self) -> String {
        format!("DROP USER '{}'", self.statement.name)
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(Resource::users(), PERMISSION_DELETE))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        if context.session().user() == self.statement.name {
            return Err(ExecutionError::InvalidCommand(format!(
                "User '{}' cannot drop itself",
                self.statement.name
            )));
        }
        let user = context
            .state_mut()
            .security
            .drop_user(&self.statement.name)?;

        let row = Row::new()
            .with("operation", "drop user")
            .with("name", user.name)
            .with("dropped", true);
        Ok(QueryResult::from_row(row).with_value(true))
    }
}
