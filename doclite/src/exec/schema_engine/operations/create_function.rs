// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CREATE FUNCTION executor

use crate::ast::CreateFunctionStatement;
use crate::catalog::security::{Resource, ResourceGeneric, PERMISSION_CREATE};
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};
use crate::storage::Value;

/// Executor for CREATE FUNCTION statements
pub struct CreateFunctionExecutor {
    statement: CreateFunctionStatement,
}

impl CreateFunctionExecutor {
    pub fn new(statement: CreateFunctionStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for CreateFunctionExecutor {
    fn syntax(&self) -> &'static str {
        "CREATE FUNCTION <name> '<code>' [PARAMETERS [<name>, ...]] [IDEMPOTENT <bool>] [LANGUAGE <language>]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Schema
    }

    fn operation_description(&self) -> String {
        format!("CREATE FUNCTION '{}'", self.statement.name)
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(
            Resource::generic(ResourceGeneric::Function),
            PERMISSION_CREATE,
        ))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let statement = &self.statement;
        let function = context.state_mut().functions.create_function(
            &statement.name,
            &statement.code,
            statement.language.as_deref(),
            statement.parameters.clone(),
            statement.idempotent.unwrap_or(false),
        )?;

        let row = Row::new()
            .with("operation", "create function")
            .with("name", function.name.clone())
            .with("language", function.language.clone())
            .with("parameters", Value::from(function.parameters.clone()))
            .with("idempotent", function.idempotent);
        Ok(QueryResult::from_row(row).with_value(function.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::CatalogError;
    use crate::exec::test_support::Fixture;
    use crate::exec::ExecutionError;
    use crate::storage::Value;

    #[test]
    fn test_create_function() {
        let mut fixture = Fixture::new();
        let result = fixture
            .sql("CREATE FUNCTION greet 'return name' PARAMETERS [name] IDEMPOTENT true LANGUAGE JavaScript")
            .unwrap();
        assert_eq!(result.rows[0].get("language"), Some(&Value::from("javascript")));

        let function = fixture.state.functions.get("greet").unwrap();
        assert_eq!(function.parameters, vec!["name".to_string()]);
        assert!(function.idempotent);
    }

    #[test]
    fn test_defaults() {
        let mut fixture = Fixture::new();
        fixture.sql("CREATE FUNCTION noop 'return 1'").unwrap();
        let function = fixture.state.functions.get("noop").unwrap();
        assert!(!function.idempotent);
        assert_eq!(function.language, "sql");
    }

    #[test]
    fn test_duplicate_function() {
        let mut fixture = Fixture::new();
        fixture.sql("CREATE FUNCTION f 'return 1'").unwrap();
        assert!(matches!(
            fixture.sql("CREATE FUNCTION F 'return 2'"),
            Err(ExecutionError::Catalog(CatalogError::AlreadyExists { .. }))
        ));
    }
}
