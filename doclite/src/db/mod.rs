// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Database facade
//!
//! The database owns the committed [`EngineState`], the live query registry
//! and the storage driver holding the persisted snapshot. Commands execute on
//! a working copy of the state which replaces the committed state only when
//! the command succeeds and the new snapshot has been written.
//!
//! One explicit transaction may be active at a time. Commands of the owning
//! session run against the transaction's private state; other sessions keep
//! reading the committed state and cannot mutate until it ends.

pub mod script;
pub mod session;
pub mod state;

pub use script::split_script;
pub use session::{Session, ROOT_USER};
pub use state::EngineState;

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use uuid::Uuid;

use crate::ast::{ClusterRef, CommandRegistry, TransactionControl};
use crate::catalog::security::{
    Resource, ResourceGeneric, PERMISSION_CREATE, PERMISSION_DELETE, PERMISSION_READ,
    PERMISSION_UPDATE,
};
use crate::catalog::{CatalogError, IndexDefinition, UserStatus};
use crate::config::DatabaseConfig;
use crate::exec::context::ContextOutcome;
use crate::exec::transaction_engine::TransactionControlExecutor;
use crate::exec::{
    cluster_resource, CommandDispatcher, ExecutionContext, ExecutionError, OperationType,
    Permission, QueryResult, QuorumType, StatementExecutor,
};
use crate::live::{LiveEvent, LiveQueryRegistry, RecordChange};
use crate::storage::{create_driver, Record, RecordId, StorageDriver, StorageTree, Value};

const METADATA_TREE: &str = "metadata";
const SNAPSHOT_KEY: &[u8] = b"snapshot";

/// Static facts about a command, resolved without executing it
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDescription {
    pub syntax: &'static str,
    pub description: String,
    pub operation: OperationType,
    pub quorum: QuorumType,
    pub timeout: Duration,
    pub idempotent: bool,
    pub involved_clusters: Vec<String>,
    pub permission: Option<String>,
}

struct ActiveTransaction {
    session_id: Uuid,
    state: EngineState,
    changes: Vec<RecordChange>,
}

pub struct Database {
    config: DatabaseConfig,
    state: RwLock<EngineState>,
    live: Mutex<LiveQueryRegistry>,
    transaction: Mutex<Option<ActiveTransaction>>,
    // kept alive for the lifetime of the metadata tree
    _driver: Box<dyn StorageDriver>,
    metadata: Box<dyn StorageTree>,
    dispatcher: CommandDispatcher,
}

impl Database {
    /// Open a database, loading its snapshot or bootstrapping a fresh one
    pub fn open(config: DatabaseConfig) -> Result<Self, ExecutionError> {
        config.validate()?;
        let driver = create_driver(config.storage, config.path.as_deref())?;
        let metadata = driver.open_tree(METADATA_TREE)?;

        let state = match metadata.get(SNAPSHOT_KEY)? {
            Some(bytes) => {
                log::info!("Loading database snapshot ({} bytes)", bytes.len());
                EngineState::from_snapshot(&bytes)?
            }
            None => {
                log::info!("Bootstrapping new {} database", config.storage);
                let state = EngineState::bootstrap(&config)?;
                metadata.insert(SNAPSHOT_KEY, &state.to_snapshot()?)?;
                metadata.flush()?;
                state
            }
        };

        let dispatcher = CommandDispatcher::new(CommandRegistry::new(), config.parse_cache_capacity);
        Ok(Self {
            config,
            state: RwLock::new(state),
            live: Mutex::new(LiveQueryRegistry::new()),
            transaction: Mutex::new(None),
            _driver: driver,
            metadata,
            dispatcher,
        })
    }

    pub fn in_memory() -> Result<Self, ExecutionError> {
        Self::open(DatabaseConfig::memory())
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Authenticate a user and open a session for it
    pub fn open_session(&self, user: &str, password: &str) -> Result<Session, ExecutionError> {
        let state = self.state.read();
        let user = state.security.authenticate(user, password)?;
        log::info!("Opened session for user '{}'", user.name);
        Ok(Session::for_user(user))
    }

    /// Session for embedded callers; permission checks are skipped
    pub fn root_session(&self) -> Session {
        Session::root()
    }

    /// Execute one command
    pub fn command(&self, session: &Session, sql: &str) -> Result<QueryResult, ExecutionError> {
        let started = Instant::now();
        let executor = self.dispatcher.resolve(sql)?;
        let mut result = self.run(session, &executor)?;
        result.elapsed = started.elapsed();
        Ok(result)
    }

    /// Execute every command of a script in order, stopping at the first error
    pub fn script(&self, session: &Session, text: &str) -> Result<Vec<QueryResult>, ExecutionError> {
        split_script(text)
            .into_iter()
            .map(|command| self.command(session, command))
            .collect()
    }

    /// Resolve a command's metadata without running it
    pub fn describe(&self, sql: &str) -> Result<CommandDescription, ExecutionError> {
        let executor = self.dispatcher.resolve(sql)?;
        let state = self.state.read();
        Ok(CommandDescription {
            syntax: executor.syntax(),
            description: executor.operation_description(),
            operation: executor.operation_type(),
            quorum: executor.quorum_type(),
            timeout: executor.distributed_timeout(&self.config),
            idempotent: executor.is_idempotent(),
            involved_clusters: executor.involved_clusters(&state),
            permission: executor.required_permission(&state).map(|p| p.to_string()),
        })
    }

    pub fn begin(&self, session: &Session) -> Result<(), ExecutionError> {
        self.transaction_control(session, TransactionControl::Begin)
    }

    pub fn commit(&self, session: &Session) -> Result<(), ExecutionError> {
        self.transaction_control(session, TransactionControl::Commit)
    }

    pub fn rollback(&self, session: &Session) -> Result<(), ExecutionError> {
        self.transaction_control(session, TransactionControl::Rollback)
    }

    /// Whether `session` owns the active transaction
    pub fn in_transaction(&self, session: &Session) -> bool {
        self.transaction
            .lock()
            .as_ref()
            .map(|tx| tx.session_id == session.id())
            .unwrap_or(false)
    }

    fn transaction_control(&self, session: &Session, control: TransactionControl) -> Result<(), ExecutionError> {
        self.run(session, &TransactionControlExecutor::new(control))
            .map(|_| ())
    }

    fn authorize(&self, session: &Session, permission: Option<&Permission>) -> Result<(), ExecutionError> {
        let Some(permission) = permission else {
            return Ok(());
        };
        if session.is_root() {
            return Ok(());
        }
        let state = self.state.read();
        if state
            .security
            .user_allows(session.user(), &permission.resource, permission.operation)
        {
            return Ok(());
        }
        log::warn!("Permission denied for user '{}': {}", session.user(), permission);
        Err(ExecutionError::permission_denied(session.user(), permission))
    }

    fn execute_on(
        &self,
        state: &EngineState,
        session: &Session,
        executor: &dyn StatementExecutor,
        in_transaction: bool,
    ) -> (Result<QueryResult, ExecutionError>, ContextOutcome) {
        let mut context = ExecutionContext::new(state, &self.live, session, &self.config, in_transaction);
        let result = executor.execute(&mut context);
        (result, context.finish())
    }

    fn run(&self, session: &Session, executor: &dyn StatementExecutor) -> Result<QueryResult, ExecutionError> {
        let operation = executor.operation_type();
        log::debug!(
            "Executing {} ({}) for user '{}'",
            executor.operation_description(),
            operation,
            session.user()
        );

        let mut slot = self.transaction.lock();
        let owns_transaction = slot
            .as_ref()
            .map(|tx| tx.session_id == session.id())
            .unwrap_or(false);
        if slot.is_some() && !owns_transaction && operation.is_mutating() {
            return Err(ExecutionError::Transaction(
                "another session holds the active transaction".to_string(),
            ));
        }
        let permission = match slot.as_ref() {
            Some(tx) if owns_transaction => executor.required_permission(&tx.state),
            _ => executor.required_permission(&self.state.read()),
        };
        self.authorize(session, permission.as_ref())?;

        if owns_transaction {
            let Some(tx) = slot.as_mut() else {
                return Err(ExecutionError::Transaction("transaction vanished".to_string()));
            };
            let (result, outcome) = self.execute_on(&tx.state, session, executor, true);
            let result = result?;
            if let Some(state) = outcome.state {
                tx.state = state;
            }
            tx.changes.extend(outcome.changes);

            match outcome.transaction {
                Some(TransactionControl::Commit) => {
                    if let Some(tx) = slot.take() {
                        self.commit_transaction(tx)?;
                    }
                }
                Some(TransactionControl::Rollback) => {
                    if let Some(tx) = slot.take() {
                        log::info!(
                            "Rolled back transaction of session {} ({} pending changes)",
                            tx.session_id,
                            tx.changes.len()
                        );
                    }
                }
                Some(TransactionControl::Begin) => {
                    return Err(ExecutionError::Transaction(
                        "a transaction is already active in this session".to_string(),
                    ))
                }
                None => {}
            }
            return Ok(result);
        }

        if operation == OperationType::Read {
            drop(slot);
            let state = self.state.read();
            let (result, _) = self.execute_on(&state, session, executor, false);
            return result;
        }

        let mut state = self.state.write();
        let (result, outcome) = self.execute_on(&state, session, executor, false);
        let result = result?;
        if let Some(new_state) = outcome.state {
            self.persist(&new_state)?;
            *state = new_state;
        }
        if !outcome.changes.is_empty() {
            self.live.lock().dispatch(&outcome.changes, &state.schema);
        }

        match outcome.transaction {
            Some(TransactionControl::Begin) => {
                if slot.is_some() {
                    return Err(ExecutionError::Transaction(
                        "another session holds the active transaction".to_string(),
                    ));
                }
                log::info!("Began transaction for session {}", session.id());
                *slot = Some(ActiveTransaction {
                    session_id: session.id(),
                    state: state.clone(),
                    changes: Vec::new(),
                });
            }
            Some(control) if slot.is_some() => {
                return Err(ExecutionError::Transaction(format!(
                    "{:?} rejected: another session holds the active transaction",
                    control
                )))
            }
            Some(control) => {
                return Err(ExecutionError::Transaction(format!(
                    "{:?} without an active transaction",
                    control
                )))
            }
            None => {}
        }
        Ok(result)
    }

    fn commit_transaction(&self, tx: ActiveTransaction) -> Result<(), ExecutionError> {
        let mut state = self.state.write();
        self.persist(&tx.state)?;
        *state = tx.state;
        log::info!(
            "Committed transaction of session {} ({} changes)",
            tx.session_id,
            tx.changes.len()
        );
        if !tx.changes.is_empty() {
            self.live.lock().dispatch(&tx.changes, &state.schema);
        }
        Ok(())
    }

    fn persist(&self, state: &EngineState) -> Result<(), ExecutionError> {
        let bytes = state.to_snapshot()?;
        self.metadata.insert(SNAPSHOT_KEY, &bytes)?;
        self.metadata.flush()?;
        log::trace!("Persisted snapshot ({} bytes)", bytes.len());
        Ok(())
    }

    /// Apply a programmatic change with the same transaction and commit rules
    /// as commands
    fn mutate<T>(
        &self,
        session: &Session,
        permission: Option<Permission>,
        apply: impl FnOnce(&mut EngineState, &mut Vec<RecordChange>) -> Result<T, ExecutionError>,
    ) -> Result<T, ExecutionError> {
        let mut slot = self.transaction.lock();
        self.authorize(session, permission.as_ref())?;
        let mut changes = Vec::new();

        match slot.as_mut() {
            Some(tx) if tx.session_id == session.id() => {
                let mut working = tx.state.clone();
                let value = apply(&mut working, &mut changes)?;
                tx.state = working;
                tx.changes.extend(changes);
                Ok(value)
            }
            Some(_) => Err(ExecutionError::Transaction(
                "another session holds the active transaction".to_string(),
            )),
            None => {
                let mut state = self.state.write();
                let mut working = state.clone();
                let value = apply(&mut working, &mut changes)?;
                self.persist(&working)?;
                *state = working;
                if !changes.is_empty() {
                    self.live.lock().dispatch(&changes, &state.schema);
                }
                Ok(value)
            }
        }
    }

    /// Read from the state visible to `session`
    fn read<T>(&self, session: &Session, read: impl FnOnce(&EngineState) -> T) -> T {
        let slot = self.transaction.lock();
        match slot.as_ref() {
            Some(tx) if tx.session_id == session.id() => read(&tx.state),
            _ => {
                drop(slot);
                read(&self.state.read())
            }
        }
    }

    /// Create a class with its default cluster; returns the cluster id
    pub fn create_class(
        &self,
        session: &Session,
        name: &str,
        super_classes: &[&str],
        is_abstract: bool,
    ) -> Result<i32, ExecutionError> {
        let permission = Permission::new(Resource::generic(ResourceGeneric::Schema), PERMISSION_CREATE);
        self.mutate(session, Some(permission), |state, _| {
            Ok(state.create_class(name, super_classes, is_abstract)?)
        })
    }

    /// Create an index and fill it from existing records; returns its size
    pub fn create_index(&self, session: &Session, definition: IndexDefinition) -> Result<usize, ExecutionError> {
        let permission = Permission::new(Resource::generic(ResourceGeneric::Schema), PERMISSION_UPDATE);
        self.mutate(session, Some(permission), |state, _| {
            Ok(state
                .indexes
                .create_index(definition, &state.clusters, &state.schema)?)
        })
    }

    /// Add an entry to a manual index; the record must exist
    pub fn index_put(
        &self,
        session: &Session,
        index: &str,
        key: Value,
        rid: RecordId,
    ) -> Result<(), ExecutionError> {
        let permission = Permission::new(Resource::generic(ResourceGeneric::Schema), PERMISSION_UPDATE);
        self.mutate(session, Some(permission), |state, _| {
            if state.clusters.load(&rid).is_none() {
                return Err(CatalogError::not_found("Record", rid.to_string()).into());
            }
            Ok(state.indexes.put(index, key, rid)?)
        })
    }

    pub fn drop_index(&self, session: &Session, index: &str) -> Result<(), ExecutionError> {
        let permission = Permission::new(Resource::generic(ResourceGeneric::Schema), PERMISSION_DELETE);
        self.mutate(session, Some(permission), |state, _| Ok(state.indexes.drop_index(index)?))
    }

    /// Create a role, optionally inheriting the rules of `parent`
    pub fn create_role(&self, session: &Session, name: &str, parent: Option<&str>) -> Result<(), ExecutionError> {
        let permission = Permission::new(Resource::roles(), PERMISSION_CREATE);
        self.mutate(session, Some(permission), |state, _| {
            state.security.create_role(name, parent)?;
            Ok(())
        })
    }

    /// Change a password; users may always change their own
    pub fn set_password(&self, session: &Session, user: &str, password: &str) -> Result<(), ExecutionError> {
        let permission = if !session.is_root() && session.user() == user {
            None
        } else {
            Some(Permission::new(Resource::users(), PERMISSION_UPDATE))
        };
        self.mutate(session, permission, |state, _| Ok(state.security.set_password(user, password)?))
    }

    /// Suspend or reactivate a user; suspended users cannot open sessions
    pub fn set_user_status(&self, session: &Session, user: &str, status: UserStatus) -> Result<(), ExecutionError> {
        if !session.is_root() && session.user() == user {
            return Err(ExecutionError::InvalidCommand(format!(
                "User '{}' cannot change its own status",
                user
            )));
        }
        let permission = Permission::new(Resource::users(), PERMISSION_UPDATE);
        self.mutate(session, Some(permission), |state, _| Ok(state.security.set_status(user, status)?))
    }

    pub fn insert(
        &self,
        session: &Session,
        class_name: &str,
        fields: BTreeMap<String, Value>,
    ) -> Result<Record, ExecutionError> {
        let permission = Permission::new(
            Resource::specific(ResourceGeneric::Class, class_name),
            PERMISSION_CREATE,
        );
        self.mutate(session, Some(permission), |state, changes| {
            let record = state.insert(class_name, fields)?;
            changes.push(RecordChange::created(record.clone()));
            Ok(record)
        })
    }

    /// Delete a record; returns false when it did not exist
    pub fn delete_record(&self, session: &Session, rid: &RecordId) -> Result<bool, ExecutionError> {
        let resource = self.read(session, |state| record_cluster_resource(state, rid));
        let permission = Permission::new(resource, PERMISSION_DELETE);
        self.mutate(session, Some(permission), |state, changes| {
            match state.delete_record(rid)? {
                Some(record) => {
                    changes.push(RecordChange::deleted(record));
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    pub fn load(&self, session: &Session, rid: &RecordId) -> Result<Option<Record>, ExecutionError> {
        let resource = self.read(session, |state| record_cluster_resource(state, rid));
        let permission = Permission::new(resource, PERMISSION_READ);
        self.authorize(session, Some(&permission))?;
        Ok(self.read(session, |state| state.clusters.load(rid).cloned()))
    }

    /// Next value of a sequence
    pub fn sequence_next(&self, session: &Session, name: &str) -> Result<i64, ExecutionError> {
        let permission = Permission::new(Resource::generic(ResourceGeneric::Schema), PERMISSION_READ);
        self.mutate(session, Some(permission), |state, _| Ok(state.sequences.next(name)?))
    }

    /// Last value handed out by a sequence
    pub fn sequence_current(&self, session: &Session, name: &str) -> Result<i64, ExecutionError> {
        let permission = Permission::new(Resource::generic(ResourceGeneric::Schema), PERMISSION_READ);
        self.authorize(session, Some(&permission))?;
        Ok(self.read(session, |state| state.sequences.current(name))?)
    }

    /// Subscribe to record events of a class and its subclasses
    pub fn subscribe_live(
        &self,
        session: &Session,
        class_name: &str,
    ) -> Result<(i32, UnboundedReceiver<LiveEvent>), ExecutionError> {
        let permission = Permission::new(
            Resource::specific(ResourceGeneric::Class, class_name),
            PERMISSION_READ,
        );
        self.authorize(session, Some(&permission))?;
        if !self.read(session, |state| state.schema.exists(class_name)) {
            return Err(CatalogError::not_found("Class", class_name).into());
        }

        let (sender, receiver) = unbounded_channel();
        let token = self.live.lock().subscribe(class_name, sender);
        log::info!("User '{}' subscribed to '{}' with token {}", session.user(), class_name, token);
        Ok((token, receiver))
    }

    /// Run a read-only closure against the state visible to `session`
    pub fn with_state<T>(&self, session: &Session, read: impl FnOnce(&EngineState) -> T) -> T {
        self.read(session, read)
    }

    pub fn flush(&self) -> Result<(), ExecutionError> {
        self.metadata.flush()?;
        Ok(())
    }
}

fn record_cluster_resource(state: &EngineState, rid: &RecordId) -> Resource {
    cluster_resource(&state.clusters, &ClusterRef::Id(rid.cluster))
}
