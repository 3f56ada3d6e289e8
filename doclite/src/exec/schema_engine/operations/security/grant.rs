// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GRANT executor

use crate::ast::PermissionStatement;
use crate::catalog::security::{Resource, PERMISSION_UPDATE};
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Result row shared by GRANT and REVOKE
pub(crate) fn permission_row(operation: &str, role: &str, statement: &PermissionStatement) -> Row {
    Row::new()
        .with("operation", operation)
        .with("role", role)
        .with("permission", statement.permission_name.clone())
        .with("resource", statement.resource.to_string())
}

/// Executor for GRANT statements
pub struct GrantExecutor {
    statement: PermissionStatement,
}

impl GrantExecutor {
    pub fn new(statement: PermissionStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for GrantExecutor {
    fn syntax(&self) -> &'static str {
        "GRANT <permission> ON <resource> TO <role>"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Security
    }

    fn operation_description(&self) -> String {
        format!(
            "GRANT {} ON {} TO '{}'",
            self.statement.permission_name, self.statement.resource, self.statement.role
        )
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(Resource::roles(), PERMISSION_UPDATE))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let role = context.state_mut().security.grant(
            &self.statement.role,
            &self.statement.resource,
            self.statement.permission,
        )?;
        let row = permission_row("grant", &role.name, &self.statement);
        Ok(QueryResult::from_row(row))
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::security::{Resource, PERMISSION_DELETE, PERMISSION_READ};
    use crate::catalog::CatalogError;
    use crate::exec::test_support::Fixture;
    use crate::exec::ExecutionError;
    use crate::storage::Value;

    #[test]
    fn test_grant_specific_class() {
        let mut fixture = Fixture::new();
        let resource: Resource = "database.class.Invoice".parse().unwrap();
        assert!(!fixture.state.security.role_allows("reader", &resource, PERMISSION_DELETE));

        let result = fixture.sql("GRANT DELETE ON database.class.Invoice TO reader").unwrap();
        assert_eq!(result.rows[0].get("role"), Some(&Value::from("reader")));
        assert!(fixture.state.security.role_allows("reader", &resource, PERMISSION_DELETE));
        // a specific rule replaces the generic one for that class
        assert!(!fixture.state.security.role_allows("reader", &resource, PERMISSION_READ));
    }

    #[test]
    fn test_grant_to_unknown_role() {
        let mut fixture = Fixture::new();
        assert!(matches!(
            fixture.sql("GRANT READ ON database.cluster TO ghost"),
            Err(ExecutionError::Catalog(CatalogError::NotFound { .. }))
        ));
    }
}
