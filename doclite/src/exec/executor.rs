// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statement dispatch
//!
//! [`executor_for`] maps a parsed statement to its executor.
//! [`DelegateExecutor`] parses command text and forwards every call to the
//! resolved executor, and [`CommandDispatcher`] keeps recently parsed
//! statements in an LRU cache keyed by the trimmed command text.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use crate::ast::{CommandRegistry, ParseError, Statement};
use crate::config::DatabaseConfig;
use crate::db::state::EngineState;
use crate::exec::live_engine::LiveUnsubscribeExecutor;
use crate::exec::read_engine::{ExplainExecutor, FindReferencesExecutor};
use crate::exec::schema_engine::{
    AlterClusterExecutor, AlterSequenceExecutor, CreateClusterExecutor, CreateFunctionExecutor,
    CreateSequenceExecutor, CreateUserExecutor, DropClusterExecutor, DropSequenceExecutor,
    DropUserExecutor, GrantExecutor, RebuildIndexExecutor, RevokeExecutor,
};
use crate::exec::transaction_engine::{TransactionControlExecutor, TransactionalExecutor};
use crate::exec::write_engine::{
    TruncateClassExecutor, TruncateClusterExecutor, TruncateRecordExecutor,
};
use crate::exec::{
    ExecutionContext, ExecutionError, OperationType, Permission, QueryResult, QuorumType,
    StatementExecutor,
};

/// Build the executor for a parsed statement
pub fn executor_for(statement: &Statement) -> Box<dyn StatementExecutor> {
    match statement.clone() {
        Statement::CreateCluster(s) => Box::new(CreateClusterExecutor::new(s)),
        Statement::DropCluster(s) => Box::new(DropClusterExecutor::new(s)),
        Statement::AlterCluster(s) => Box::new(AlterClusterExecutor::new(s)),
        Statement::CreateSequence(s) => Box::new(CreateSequenceExecutor::new(s)),
        Statement::AlterSequence(s) => Box::new(AlterSequenceExecutor::new(s)),
        Statement::DropSequence(s) => Box::new(DropSequenceExecutor::new(s)),
        Statement::CreateFunction(s) => Box::new(CreateFunctionExecutor::new(s)),
        Statement::CreateUser(s) => Box::new(CreateUserExecutor::new(s)),
        Statement::DropUser(s) => Box::new(DropUserExecutor::new(s)),
        Statement::Grant(s) => Box::new(GrantExecutor::new(s)),
        Statement::Revoke(s) => Box::new(RevokeExecutor::new(s)),
        Statement::TruncateClass(s) => Box::new(TruncateClassExecutor::new(s)),
        Statement::TruncateCluster(s) => Box::new(TruncateClusterExecutor::new(s)),
        Statement::TruncateRecord(s) => Box::new(TruncateRecordExecutor::new(s)),
        Statement::RebuildIndex(s) => Box::new(RebuildIndexExecutor::new(s)),
        Statement::FindReferences(s) => Box::new(FindReferencesExecutor::new(s)),
        Statement::Explain(s) => Box::new(ExplainExecutor::new(s)),
        Statement::LiveUnsubscribe(s) => Box::new(LiveUnsubscribeExecutor::new(s)),
        Statement::Transactional(s) => Box::new(TransactionalExecutor::new(s)),
        Statement::Transaction(control) => Box::new(TransactionControlExecutor::new(control)),
    }
}

/// Parses command text and forwards every call to the resolved executor
pub struct DelegateExecutor {
    statement: Arc<Statement>,
    delegate: Box<dyn StatementExecutor>,
}

impl DelegateExecutor {
    /// Parse `sql` with the built-in registry and resolve its executor
    pub fn parse(sql: &str) -> Result<Self, ParseError> {
        let statement = crate::ast::parse_statement(sql)?;
        Ok(Self::resolve(Arc::new(statement)))
    }

    pub fn resolve(statement: Arc<Statement>) -> Self {
        let delegate = executor_for(&statement);
        Self {
            statement,
            delegate,
        }
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }
}

impl StatementExecutor for DelegateExecutor {
    fn syntax(&self) -> &'static str {
        self.delegate.syntax()
    }

    fn operation_type(&self) -> OperationType {
        self.delegate.operation_type()
    }

    fn operation_description(&self) -> String {
        self.delegate.operation_description()
    }

    fn quorum_type(&self) -> QuorumType {
        self.delegate.quorum_type()
    }

    fn distributed_timeout(&self, config: &DatabaseConfig) -> Duration {
        self.delegate.distributed_timeout(config)
    }

    fn is_idempotent(&self) -> bool {
        self.delegate.is_idempotent()
    }

    fn involved_clusters(&self, state: &EngineState) -> Vec<String> {
        self.delegate.involved_clusters(state)
    }

    fn required_permission(&self, state: &EngineState) -> Option<Permission> {
        self.delegate.required_permission(state)
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        self.delegate.execute(context)
    }
}

/// Parses commands through a registry, caching the parsed statements
pub struct CommandDispatcher {
    registry: CommandRegistry,
    cache: Option<Mutex<LruCache<String, Arc<Statement>>>>,
}

impl CommandDispatcher {
    /// A capacity of zero disables the cache
    pub fn new(registry: CommandRegistry, cache_capacity: usize) -> Self {
        let cache = NonZeroUsize::new(cache_capacity).map(|c| Mutex::new(LruCache::new(c)));
        Self { registry, cache }
    }

    pub fn parse(&self, sql: &str) -> Result<Arc<Statement>, ParseError> {
        let key = sql.trim();
        if let Some(cache) = &self.cache {
            if let Some(statement) = cache.lock().get(key) {
                log::trace!("Parse cache hit for '{}'", key);
                return Ok(Arc::clone(statement));
            }
        }

        let statement = Arc::new(self.registry.parse(key)?);
        if let Some(cache) = &self.cache {
            cache.lock().put(key.to_string(), Arc::clone(&statement));
        }
        Ok(statement)
    }

    /// Parse and resolve the executor for a command
    pub fn resolve(&self, sql: &str) -> Result<DelegateExecutor, ParseError> {
        self.parse(sql).map(DelegateExecutor::resolve)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map(|c| c.lock().len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_statement_resolves() {
        let commands = [
            ("CREATE CLUSTER c", OperationType::Schema),
            ("DROP CLUSTER c", OperationType::Schema),
            ("ALTER CLUSTER c STATUS OFFLINE", OperationType::Schema),
            ("CREATE SEQUENCE s", OperationType::Schema),
            ("ALTER SEQUENCE s START 1", OperationType::Schema),
            ("DROP SEQUENCE s", OperationType::Schema),
            ("CREATE FUNCTION f 'return 1'", OperationType::Schema),
            ("CREATE USER u IDENTIFIED BY p", OperationType::Security),
            ("DROP USER u", OperationType::Security),
            ("GRANT READ ON database.class.X TO reader", OperationType::Security),
            ("REVOKE READ ON database.class.X FROM reader", OperationType::Security),
            ("TRUNCATE CLASS X", OperationType::Data),
            ("TRUNCATE CLUSTER x", OperationType::Data),
            ("TRUNCATE RECORD #1:1", OperationType::Data),
            ("REBUILD INDEX *", OperationType::Schema),
            ("FIND REFERENCES #1:1", OperationType::Read),
            ("EXPLAIN FIND REFERENCES #1:1", OperationType::Read),
            ("LIVE UNSUBSCRIBE 3", OperationType::Meta),
            ("TRANSACTIONAL TRUNCATE RECORD #1:1", OperationType::Data),
            ("BEGIN", OperationType::Meta),
        ];
        for (sql, expected) in commands {
            let executor = DelegateExecutor::parse(sql).unwrap();
            assert_eq!(executor.operation_type(), expected, "{}", sql);
        }
    }

    #[test]
    fn test_quorum_by_command() {
        let quorum = |sql: &str| DelegateExecutor::parse(sql).unwrap().quorum_type();
        assert_eq!(quorum("CREATE CLUSTER c"), QuorumType::All);
        assert_eq!(quorum("TRUNCATE RECORD #1:1"), QuorumType::Write);
        assert_eq!(quorum("FIND REFERENCES #1:1"), QuorumType::Read);
        assert_eq!(quorum("EXPLAIN TRUNCATE RECORD #1:1"), QuorumType::Write);
        assert_eq!(quorum("LIVE UNSUBSCRIBE 1"), QuorumType::None);
    }

    #[test]
    fn test_delegate_forwards_metadata() {
        let executor = DelegateExecutor::parse("FIND REFERENCES #1:1").unwrap();
        assert!(executor.is_idempotent());
        assert!(executor.syntax().starts_with("FIND REFERENCES"));
        assert!(matches!(executor.statement(), Statement::FindReferences(_)));

        let config = DatabaseConfig::default();
        let ddl = DelegateExecutor::parse("DROP SEQUENCE s").unwrap();
        assert_eq!(ddl.distributed_timeout(&config), config.ddl_timeout());
        assert_eq!(executor.distributed_timeout(&config), config.command_timeout());
    }

    #[test]
    fn test_dispatcher_caches_by_trimmed_text() {
        let dispatcher = CommandDispatcher::new(CommandRegistry::new(), 2);
        let first = dispatcher.parse("DROP CLUSTER a").unwrap();
        let second = dispatcher.parse("  DROP CLUSTER a  ").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        dispatcher.parse("DROP CLUSTER b").unwrap();
        dispatcher.parse("DROP CLUSTER c").unwrap();
        assert_eq!(dispatcher.cached_len(), 2);
    }

    #[test]
    fn test_dispatcher_without_cache() {
        let dispatcher = CommandDispatcher::new(CommandRegistry::new(), 0);
        let first = dispatcher.parse("DROP CLUSTER a").unwrap();
        let second = dispatcher.parse("DROP CLUSTER a").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(dispatcher.cached_len(), 0);
        assert!(matches!(
            dispatcher.resolve("SELECT 1"),
            Err(ParseError::UnknownCommand(_))
        ));
    }
}
