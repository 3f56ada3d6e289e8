// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! ALTER SEQUENCE executor

use crate::ast::AlterSequenceStatement;
use crate::catalog::security::{Resource, ResourceGeneric, PERMISSION_UPDATE};
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Executor for ALTER SEQUENCE statements
pub struct AlterSequenceExecutor {
    statement: AlterSequenceStatement,
}

impl AlterSequenceExecutor {
    pub fn new(statement: AlterSequenceStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for AlterSequenceExecutor {
    fn syntax(&self) -> &'static str {
        "ALTER SEQUENCE <name> [START <n>] [INCREMENT <n>] [CACHE <n>] [LIMIT <n>|NOLIMIT] [ASC|DESC] [CYCLE <bool>]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Schema
    }

    fn operation_description(&self) -> String {
        format!("ALTER SEQUENCE '{}'", self.statement.name)
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(
            Resource::generic(ResourceGeneric::Schema),
            PERMISSION_UPDATE,
        ))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let changed = context
            .state_mut()
            .sequences
            .update_sequence(&self.statement.name, &self.statement.params)?;
        if !changed {
            log::debug!("ALTER SEQUENCE '{}' changed nothing", self.statement.name);
        }

        let row = Row::new()
            .with("operation", "alter sequence")
            .with("name", self.statement.name.to_uppercase())
            .with("changed", changed);
        Ok(QueryResult::from_row(row).with_value(changed))
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::CatalogError;
    use crate::exec::test_support::Fixture;
    use crate::exec::ExecutionError;
    use crate::storage::Value;

    #[test]
    fn test_alter_start_resets_value() {
        let mut fixture = Fixture::new();
        fixture.sql("CREATE SEQUENCE s TYPE ORDERED").unwrap();
        fixture.state.sequences.next("s").unwrap();
        fixture.state.sequences.next("s").unwrap();

        let result = fixture.sql("ALTER SEQUENCE s START 1000").unwrap();
        assert_eq!(result.value, Some(Value::Boolean(true)));
        assert_eq!(fixture.state.sequences.current("s").unwrap(), 1000);
    }

    #[test]
    fn test_alter_with_same_values_reports_unchanged() {
        let mut fixture = Fixture::new();
        fixture.sql("CREATE SEQUENCE s INCREMENT 2").unwrap();
        let result = fixture.sql("ALTER SEQUENCE s INCREMENT 2").unwrap();
        assert_eq!(result.value, Some(Value::Boolean(false)));
    }

    #[test]
    fn test_alter_unknown_sequence() {
        let mut fixture = Fixture::new();
        assert!(matches!(
            fixture.sql("ALTER SEQUENCE nope INCREMENT 3"),
            Err(ExecutionError::Catalog(CatalogError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_cache_on_ordered_sequence_is_rejected() {
        let mut fixture = Fixture::new();
        fixture.sql("CREATE SEQUENCE s TYPE ORDERED").unwrap();
        assert!(matches!(
            fixture.sql("ALTER SEQUENCE s CACHE 10"),
            Err(ExecutionError::Catalog(CatalogError::InvalidArgument(_)))
        ));
    }
}
