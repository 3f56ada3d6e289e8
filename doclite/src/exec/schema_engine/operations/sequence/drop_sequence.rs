// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! DROP SEQUENCE executor

use crate::ast::DropSequenceStatement;
use crate::catalog::security::{Resource, ResourceGeneric, PERMISSION_DELETE};
use crate::catalog::CatalogError;
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Executor for DROP SEQUENCE statements
pub struct DropSequenceExecutor {
    statement: DropSequenceStatement,
}

impl DropSequenceExecutor {
    pub fn new(statement: DropSequenceStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for DropSequenceExecutor {
    fn syntax(&self) -> &'static str {
        "DROP SEQUENCE <name> [IF EXISTS]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Schema
    }

    fn operation_description(&self) -> String {
        format!("DROP SEQUENCE '{}'", self.statement.name)
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(
            Resource::generic(ResourceGeneric::Schema),
            PERMISSION_DELETE,
        ))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let name = self.statement.name.to_uppercase();
        let dropped = if context.state().sequences.get(&name).is_some() {
            context.state_mut().sequences.drop_sequence(&name)
        } else if self.statement.if_exists {
            false
        } else {
            return Err(CatalogError::not_found("Sequence", name).into());
        };

        let row = Row::new()
            .with("operation", "drop sequence")
            .with("name", name)
            .with("dropped", dropped);
        Ok(QueryResult::from_row(row).with_value(dropped))
    }
}

#[cfg(test)]
mod tests {
    use crate::exec::test_support::Fixture;
    use crate::storage::Value;

    #[test]
    fn test_drop_sequence() {
        let mut fixture = Fixture::new();
        fixture.sql("CREATE SEQUENCE s").unwrap();
        assert_eq!(fixture.sql("DROP SEQUENCE S").unwrap().value, Some(Value::Boolean(true)));
        assert!(fixture.state.sequences.get("s").is_none());
    }

    #[test]
    fn test_drop_missing_sequence() {
        let mut fixture = Fixture::new();
        assert!(fixture.sql("DROP SEQUENCE s").is_err());
        let result = fixture.sql("DROP SEQUENCE s IF EXISTS").unwrap();
        assert_eq!(result.rows[0].get("dropped"), Some(&Value::Boolean(false)));
    }
}
