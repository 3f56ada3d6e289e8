// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Execution context handed to every executor
//!
//! The context starts out borrowing the committed engine state. The first
//! mutation clones it into a private working copy, which the database swaps
//! in only when the command succeeds.

use parking_lot::{Mutex, MutexGuard};
use std::borrow::Cow;

use crate::ast::TransactionControl;
use crate::config::DatabaseConfig;
use crate::db::session::Session;
use crate::db::state::EngineState;
use crate::exec::error::ExecutionError;
use crate::exec::statement_base::Permission;
use crate::live::{LiveQueryRegistry, RecordChange};

/// Counters collected while a command runs, reported by EXPLAIN
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub records_scanned: usize,
    pub records_deleted: usize,
    pub indexes_rebuilt: usize,
}

/// What a finished context hands back to the database
pub struct ContextOutcome {
    /// Working copy, present only when the command mutated state
    pub state: Option<EngineState>,
    pub changes: Vec<RecordChange>,
    pub transaction: Option<TransactionControl>,
    pub stats: ExecutionStats,
}

pub struct ExecutionContext<'a> {
    state: Cow<'a, EngineState>,
    live: &'a Mutex<LiveQueryRegistry>,
    session: &'a Session,
    config: &'a DatabaseConfig,
    in_transaction: bool,
    profiling: bool,
    stats: ExecutionStats,
    changes: Vec<RecordChange>,
    transaction: Option<TransactionControl>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        state: &'a EngineState,
        live: &'a Mutex<LiveQueryRegistry>,
        session: &'a Session,
        config: &'a DatabaseConfig,
        in_transaction: bool,
    ) -> Self {
        Self {
            state: Cow::Borrowed(state),
            live,
            session,
            config,
            in_transaction,
            profiling: false,
            stats: ExecutionStats::default(),
            changes: Vec::new(),
            transaction: None,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Working copy of the state; cloned from the committed state on first use
    pub fn state_mut(&mut self) -> &mut EngineState {
        if matches!(self.state, Cow::Borrowed(_)) {
            log::debug!("Cloning engine state for a mutating command");
        }
        self.state.to_mut()
    }

    pub fn live_registry(&self) -> MutexGuard<'_, LiveQueryRegistry> {
        self.live.lock()
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    pub fn config(&self) -> &DatabaseConfig {
        self.config
    }

    /// Check a permission the command can only resolve while running
    pub fn check_permission(&self, permission: &Permission) -> Result<(), ExecutionError> {
        if self.session.is_root()
            || self.state.security.user_allows(
                self.session.user(),
                &permission.resource,
                permission.operation,
            )
        {
            return Ok(());
        }
        log::warn!("Permission denied for user '{}': {}", self.session.user(), permission);
        Err(ExecutionError::permission_denied(self.session.user(), permission))
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub fn enable_profiling(&mut self) {
        self.profiling = true;
    }

    pub fn is_profiling(&self) -> bool {
        self.profiling
    }

    pub fn stats(&self) -> ExecutionStats {
        self.stats
    }

    pub fn stats_mut(&mut self) -> &mut ExecutionStats {
        &mut self.stats
    }

    /// Queue a record change for delivery to live subscribers after commit
    pub fn record_change(&mut self, change: RecordChange) {
        self.changes.push(change);
    }

    /// Ask the database to begin, commit or roll back after this command
    pub fn request_transaction(&mut self, control: TransactionControl) -> Result<(), ExecutionError> {
        if self.transaction.is_some() {
            return Err(ExecutionError::Transaction(
                "only one transaction request per command".to_string(),
            ));
        }
        self.transaction = Some(control);
        Ok(())
    }

    pub fn finish(self) -> ContextOutcome {
        let state = match self.state {
            Cow::Owned(state) => Some(state),
            Cow::Borrowed(_) => None,
        };
        ContextOutcome {
            state,
            changes: self.changes,
            transaction: self.transaction,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (EngineState, Mutex<LiveQueryRegistry>, Session, DatabaseConfig) {
        let config = DatabaseConfig::default().with_bcrypt_cost(4);
        let state = EngineState::bootstrap(&config).unwrap();
        (state, Mutex::new(LiveQueryRegistry::new()), Session::root(), config)
    }

    #[test]
    fn test_reads_do_not_clone() {
        let (state, live, session, config) = fixture();
        let context = ExecutionContext::new(&state, &live, &session, &config, false);
        assert!(context.state().schema.exists("V"));
        assert!(context.finish().state.is_none());
    }

    #[test]
    fn test_mutation_produces_working_copy() {
        let (state, live, session, config) = fixture();
        let mut context = ExecutionContext::new(&state, &live, &session, &config, false);
        context.state_mut().clusters.add_cluster("scratch", None, false).unwrap();
        context.stats_mut().records_deleted += 2;

        let outcome = context.finish();
        assert_eq!(outcome.stats.records_deleted, 2);
        assert!(outcome.state.unwrap().clusters.id_of("scratch").is_some());
        assert!(state.clusters.id_of("scratch").is_none());
    }

    #[test]
    fn test_single_transaction_request() {
        let (state, live, session, config) = fixture();
        let mut context = ExecutionContext::new(&state, &live, &session, &config, false);
        context.request_transaction(TransactionControl::Begin).unwrap();
        assert!(context.request_transaction(TransactionControl::Commit).is_err());
        assert_eq!(context.finish().transaction, Some(TransactionControl::Begin));
    }
}
