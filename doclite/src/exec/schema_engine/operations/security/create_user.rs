// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CREATE USER executor

use crate::ast::CreateUserStatement;
use crate::catalog::security::{Resource, PERMISSION_CREATE};
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};
use crate::storage::Value;

/// Executor for CREATE USER statements
pub struct CreateUserExecutor {
    statement: CreateUserStatement,
}

impl CreateUserExecutor {
    pub fn new(statement: CreateUserStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for CreateUserExecutor {
    fn syntax(&self) -> &'static str {
        "CREATE USER <name> IDENTIFIED BY <password> [ROLE <role>|ROLE [<role>, ...]]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Security
    }

    // never includes the password
    fn operation_description(&self) -> String {
        format!(
            "CREATE USER '{}' with roles {:?}",
            self.statement.name, self.statement.roles
        )
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(Resource::users(), PERMISSION_CREATE))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let user = context.state_mut().security.create_user(
            &self.statement.name,
            &self.statement.password,
            &self.statement.roles,
        )?;

        let row = Row::new()
            .with("operation", "create user")
            .with("name", user.name.clone())
            .with("roles", Value::from(user.roles.clone()));
        Ok(QueryResult::from_row(row).with_value(user.name.clone()))
    }
}
