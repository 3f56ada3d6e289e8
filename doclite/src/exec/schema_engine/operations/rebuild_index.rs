// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! REBUILD INDEX executor

use crate::ast::{IndexTarget, RebuildIndexStatement};
use crate::catalog::security::{Resource, ResourceGeneric, PERMISSION_UPDATE};
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Executor for REBUILD INDEX statements
pub struct RebuildIndexExecutor {
    statement: RebuildIndexStatement,
}

impl RebuildIndexExecutor {
    pub fn new(statement: RebuildIndexStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for RebuildIndexExecutor {
    fn syntax(&self) -> &'static str {
        "REBUILD INDEX <name|*>"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Schema
    }

    fn operation_description(&self) -> String {
        match &self.statement.target {
            IndexTarget::Named(name) => format!("REBUILD INDEX '{}'", name),
            IndexTarget::All => "REBUILD INDEX *".to_string(),
        }
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(
            Resource::generic(ResourceGeneric::Schema),
            PERMISSION_UPDATE,
        ))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let state = context.state_mut();
        let (name, total, rebuilt) = match &self.statement.target {
            IndexTarget::Named(name) => {
                let total = state.indexes.rebuild(name, &state.clusters, &state.schema)?;
                (name.clone(), total, 1)
            }
            IndexTarget::All => {
                let summary = state.indexes.rebuild_all(&state.clusters, &state.schema)?;
                let total = summary.iter().map(|(_, size)| size).sum::<usize>();
                ("*".to_string(), total, summary.len())
            }
        };
        context.stats_mut().indexes_rebuilt += rebuilt;

        let row = Row::new()
            .with("operation", "rebuild index")
            .with("name", name)
            .with("totalIndexed", total);
        Ok(QueryResult::from_row(row).with_value(total))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::catalog::{CatalogError, IndexDefinition};
    use crate::exec::test_support::Fixture;
    use crate::exec::ExecutionError;
    use crate::storage::Value;

    fn fixture_with_index(automatic: bool) -> Fixture {
        let mut fixture = Fixture::new();
        let state = &mut fixture.state;
        state.create_class("Person", &[], false).unwrap();
        for name in ["ann", "bob", "cy"] {
            let mut fields = BTreeMap::new();
            fields.insert("name".to_string(), Value::from(name));
            state.insert("Person", fields).unwrap();
        }
        let definition = IndexDefinition {
            name: "Person.name".into(),
            class_name: "Person".into(),
            field: "name".into(),
            unique: false,
            automatic,
        };
        state
            .indexes
            .create_index(definition, &state.clusters, &state.schema)
            .unwrap();
        fixture
    }

    #[test]
    fn test_rebuild_named_index() {
        let mut fixture = fixture_with_index(true);
        let result = fixture.sql("REBUILD INDEX Person.name").unwrap();
        assert_eq!(result.value, Some(Value::Integer(3)));
        assert_eq!(fixture.stats.indexes_rebuilt, 1);
    }

    #[test]
    fn test_rebuild_all_skips_manual_indexes() {
        let mut fixture = fixture_with_index(false);
        let result = fixture.sql("REBUILD INDEX *").unwrap();
        assert_eq!(result.value, Some(Value::Integer(0)));
        assert_eq!(fixture.stats.indexes_rebuilt, 0);
    }

    #[test]
    fn test_manual_index_cannot_be_rebuilt_by_name() {
        let mut fixture = fixture_with_index(false);
        assert!(matches!(
            fixture.sql("REBUILD INDEX Person.name"),
            Err(ExecutionError::Catalog(CatalogError::InvalidArgument(_)))
        ));
        assert!(matches!(
            fixture.sql("REBUILD INDEX missing"),
            Err(ExecutionError::Catalog(CatalogError::NotFound { .. }))
        ));
    }
}
