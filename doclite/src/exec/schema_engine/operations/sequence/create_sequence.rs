// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CREATE SEQUENCE executor

use crate::ast::CreateSequenceStatement;
use crate::catalog::security::{Resource, ResourceGeneric, PERMISSION_CREATE};
use crate::catalog::SequenceType;
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Executor for CREATE SEQUENCE statements
pub struct CreateSequenceExecutor {
    statement: CreateSequenceStatement,
}

impl CreateSequenceExecutor {
    pub fn new(statement: CreateSequenceStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for CreateSequenceExecutor {
    fn syntax(&self) -> &'static str {
        "CREATE SEQUENCE <name> [IF NOT EXISTS] [TYPE CACHED|ORDERED] [START <n>] [INCREMENT <n>] [CACHE <n>] [LIMIT <n>] [ASC|DESC] [CYCLE <bool>]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Schema
    }

    fn operation_description(&self) -> String {
        format!(
            "CREATE {} SEQUENCE '{}'",
            self.statement.sequence_type, self.statement.name
        )
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(
            Resource::generic(ResourceGeneric::Schema),
            PERMISSION_CREATE,
        ))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let name = self.statement.name.to_uppercase();
        if context.state().sequences.get(&name).is_some() && self.statement.if_not_exists {
            let row = Row::new()
                .with("operation", "create sequence")
                .with("name", name)
                .with("created", false);
            return Ok(QueryResult::from_row(row).with_value(false));
        }

        // unset attributes fall back to the configured defaults
        let config = context.config();
        let mut params = self.statement.params.clone();
        params.start.get_or_insert(config.sequence_start);
        params.increment.get_or_insert(config.sequence_increment);
        if self.statement.sequence_type == SequenceType::Cached {
            params.cache_size.get_or_insert(config.sequence_cache_size);
        }

        let sequence = context
            .state_mut()
            .sequences
            .create_sequence(&name, self.statement.sequence_type, &params)?;
        let row = Row::new()
            .with("operation", "create sequence")
            .with("name", sequence.name.clone())
            .with("type", sequence.sequence_type.to_string())
            .with("created", true);
        Ok(QueryResult::from_row(row).with_value(true))
    }
}
