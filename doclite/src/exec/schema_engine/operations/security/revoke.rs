// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! REVOKE executor

use super::grant::permission_row;
use crate::ast::PermissionStatement;
use crate::catalog::security::{Resource, PERMISSION_UPDATE};
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, StatementExecutor,
};

/// Executor for REVOKE statements
pub struct RevokeExecutor {
    statement: PermissionStatement,
}

impl RevokeExecutor {
    pub fn new(statement: PermissionStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for RevokeExecutor {
    fn syntax(&self) -> &'static str {
        "REVOKE <permission> ON <resource> FROM <role>"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Security
    }

    fn operation_description(&self) -> String {
        format!(
            "REVOKE {} ON {} FROM '{}'",
            self.statement.permission_name, self.statement.resource, self.statement.role
        )
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(Resource::roles(), PERMISSION_UPDATE))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let role = context.state_mut().security.revoke(
            &self.statement.role,
            &self.statement.resource,
            self.statement.permission,
        )?;
        let row = permission_row("revoke", &role.name, &self.statement);
        Ok(QueryResult::from_row(row))
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::security::{Resource, PERMISSION_READ};
    use crate::exec::test_support::Fixture;

    #[test]
    fn test_revoke_read_on_cluster() {
        let mut fixture = Fixture::new();
        let resource: Resource = "database.cluster".parse().unwrap();
        assert!(fixture.state.security.role_allows("reader", &resource, PERMISSION_READ));

        fixture.sql("REVOKE READ ON database.cluster FROM reader").unwrap();
        assert!(!fixture.state.security.role_allows("reader", &resource, PERMISSION_READ));
    }

    #[test]
    fn test_revoke_none_is_a_no_op() {
        let mut fixture = Fixture::new();
        let resource: Resource = "database.cluster".parse().unwrap();
        fixture.sql("REVOKE NONE ON database.cluster FROM reader").unwrap();
        assert!(fixture.state.security.role_allows("reader", &resource, PERMISSION_READ));
    }
}
