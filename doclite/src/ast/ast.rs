// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statement nodes produced by the command parsers

use crate::catalog::security::Resource;
use crate::catalog::{SequenceParams, SequenceType};
use crate::storage::RecordId;

/// Reference to a cluster by name or numeric id
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterRef {
    Name(String),
    Id(i32),
}

impl std::fmt::Display for ClusterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterRef::Name(name) => write!(f, "{}", name),
            ClusterRef::Id(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateClusterStatement {
    pub name: String,
    pub id: Option<i32>,
    pub blob: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropClusterStatement {
    pub cluster: ClusterRef,
    pub if_exists: bool,
}

/// Which clusters an ALTER CLUSTER applies to
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterSelector {
    Single(ClusterRef),
    /// Every cluster whose name starts with the prefix (`name*`)
    Prefix(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterAttribute {
    Name,
    Status,
    ConflictStrategy,
}

impl std::fmt::Display for ClusterAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClusterAttribute::Name => "NAME",
            ClusterAttribute::Status => "STATUS",
            ClusterAttribute::ConflictStrategy => "CONFLICTSTRATEGY",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterClusterStatement {
    pub selector: ClusterSelector,
    pub attribute: ClusterAttribute,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSequenceStatement {
    pub name: String,
    pub if_not_exists: bool,
    pub sequence_type: SequenceType,
    pub params: SequenceParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterSequenceStatement {
    pub name: String,
    pub params: SequenceParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropSequenceStatement {
    pub name: String,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateFunctionStatement {
    pub name: String,
    pub code: String,
    pub parameters: Vec<String>,
    pub idempotent: Option<bool>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateUserStatement {
    pub name: String,
    pub password: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropUserStatement {
    pub name: String,
}

/// GRANT and REVOKE share one shape
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionStatement {
    pub permission_name: String,
    pub permission: u8,
    pub resource: Resource,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TruncateClassStatement {
    pub class_name: String,
    pub polymorphic: bool,
    pub unsafe_mode: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TruncateClusterStatement {
    pub cluster: ClusterRef,
    pub unsafe_mode: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TruncateRecordStatement {
    pub rids: Vec<RecordId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndexTarget {
    Named(String),
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RebuildIndexStatement {
    pub target: IndexTarget,
}

/// Restricts the records scanned by FIND REFERENCES
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceTarget {
    Class(String),
    Cluster(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FindReferencesStatement {
    pub rids: Vec<RecordId>,
    pub targets: Vec<ReferenceTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplainStatement {
    pub statement: Box<Statement>,
    /// Inner command text as written
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveUnsubscribeStatement {
    pub token: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionalStatement {
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionControl {
    Begin,
    Commit,
    Rollback,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateCluster(CreateClusterStatement),
    DropCluster(DropClusterStatement),
    AlterCluster(AlterClusterStatement),
    CreateSequence(CreateSequenceStatement),
    AlterSequence(AlterSequenceStatement),
    DropSequence(DropSequenceStatement),
    CreateFunction(CreateFunctionStatement),
    CreateUser(CreateUserStatement),
    DropUser(DropUserStatement),
    Grant(PermissionStatement),
    Revoke(PermissionStatement),
    TruncateClass(TruncateClassStatement),
    TruncateCluster(TruncateClusterStatement),
    TruncateRecord(TruncateRecordStatement),
    RebuildIndex(RebuildIndexStatement),
    FindReferences(FindReferencesStatement),
    Explain(ExplainStatement),
    LiveUnsubscribe(LiveUnsubscribeStatement),
    Transactional(TransactionalStatement),
    Transaction(TransactionControl),
}

impl Statement {
    /// Statements that start, end or wrap a transaction
    pub fn is_transaction_control(&self) -> bool {
        matches!(self, Statement::Transactional(_) | Statement::Transaction(_))
    }
}
