// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! DocLite - embedded document database command engine
//!
//! DocLite executes the administrative and maintenance commands of a
//! multi-model document database: cluster, sequence, function, user and
//! permission management, bulk truncation, index rebuilds, reference lookup,
//! live query management and EXPLAIN profiling.
//!
//! # Quick Start
//!
//! ```no_run
//! use doclite::{Database, DatabaseConfig};
//!
//! # fn main() -> Result<(), doclite::ExecutionError> {
//! let db = Database::open(DatabaseConfig::memory())?;
//! let session = db.open_session("admin", "admin")?;
//!
//! db.command(&session, "CREATE CLUSTER archive")?;
//! let result = db.command(&session, "EXPLAIN TRUNCATE CLUSTER archive")?;
//! for row in &result.rows {
//!     println!("{:?}", row.get("elapsed"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`ast`] - Command grammar, lexer and per-statement parsers
//! - [`catalog`] - Clusters, classes, indexes, sequences, functions, security
//! - [`exec`] - Statement executors grouped by the state they touch
//! - [`db`] - Database facade, sessions, transactions and snapshots
//! - [`live`] - Live query subscriptions
//! - [`storage`] - Records, values and the persistent key-value backends
//! - [`config`] - Database configuration

pub mod ast;
pub mod catalog;
pub mod config;
pub mod db;
pub mod exec;
pub mod live;
pub mod storage;

pub use ast::{parse_statement, ParseError, Statement};
pub use catalog::{CatalogError, IndexDefinition, UserStatus};
pub use config::DatabaseConfig;
pub use db::{split_script, CommandDescription, Database, EngineState, Session};
pub use exec::{ExecutionError, OperationType, QueryResult, QuorumType, Row};
pub use live::{LiveEvent, RecordChange};
pub use storage::{Record, RecordId, StorageError, StorageType, Value};
