// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! LIVE UNSUBSCRIBE executor

use crate::ast::LiveUnsubscribeStatement;
use crate::db::state::EngineState;
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, Row,
    StatementExecutor,
};

/// Executor for LIVE UNSUBSCRIBE statements
pub struct LiveUnsubscribeExecutor {
    statement: LiveUnsubscribeStatement,
}

impl LiveUnsubscribeExecutor {
    pub fn new(statement: LiveUnsubscribeStatement) -> Self {
        Self { statement }
    }
}

impl StatementExecutor for LiveUnsubscribeExecutor {
    fn syntax(&self) -> &'static str {
        "LIVE UNSUBSCRIBE <token>"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Meta
    }

    fn operation_description(&self) -> String {
        format!("LIVE UNSUBSCRIBE {}", self.statement.token)
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        None
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let token = self.statement.token;
        let unsubscribed = context.live_registry().unsubscribe(token);

        let row = Row::new()
            .with("unsubscribed", token)
            .with("unsubscribe", unsubscribed)
            .with("value", i64::from(unsubscribed));
        Ok(QueryResult::from_row(row).with_value(unsubscribed))
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::unbounded_channel;

    use crate::exec::test_support::Fixture;
    use crate::exec::QuorumType;
    use crate::live::LiveEvent;
    use crate::storage::Value;

    #[test]
    fn test_unsubscribe_known_token() {
        let mut fixture = Fixture::new();
        let (sender, mut receiver) = unbounded_channel();
        let token = fixture.live.lock().subscribe("V", sender);

        let result = fixture.sql(&format!("LIVE UNSUBSCRIBE {}", token)).unwrap();
        let row = &result.rows[0];
        assert_eq!(row.get("unsubscribed"), Some(&Value::Integer(token as i64)));
        assert_eq!(row.get("unsubscribe"), Some(&Value::Boolean(true)));
        assert_eq!(row.get("value"), Some(&Value::Integer(1)));
        assert_eq!(receiver.try_recv().unwrap(), LiveEvent::Unsubscribed { token });
        assert!(!fixture.live.lock().is_subscribed(token));
    }

    #[test]
    fn test_unknown_token() {
        let mut fixture = Fixture::new();
        let result = fixture.sql("LIVE UNSUBSCRIBE 17").unwrap();
        assert_eq!(result.rows[0].get("unsubscribe"), Some(&Value::Boolean(false)));
        assert_eq!(result.rows[0].get("value"), Some(&Value::Integer(0)));
    }

    #[test]
    fn test_needs_no_quorum() {
        let statement = crate::ast::parse_statement("LIVE UNSUBSCRIBE 1").unwrap();
        let executor = crate::exec::executor_for(&statement);
        assert_eq!(executor.quorum_type(), QuorumType::None);
        assert!(executor.required_permission(&Fixture::new().state).is_none());
    }
}
