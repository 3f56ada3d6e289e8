// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command parsers
//!
//! Each statement type parses its own fixed grammar. The [`CommandRegistry`]
//! maps leading keyword sequences to those parsers and picks the longest
//! matching prefix, so `CREATE BLOB CLUSTER` and `CREATE CLUSTER` can share
//! one parser while `CREATE SEQUENCE` goes elsewhere.

pub mod cluster;
pub mod function;
pub mod index;
pub mod misc;
pub mod references;
pub mod security;
pub mod sequence;
pub mod truncate;

use once_cell::sync::Lazy;

use super::ast::*;
use super::cursor::TokenCursor;
use super::error::{ParseError, ParseResult};
use super::lexer::TokenKind;

pub type StatementParser = fn(&str) -> ParseResult<Statement>;

struct Registration {
    prefix: Vec<&'static str>,
    parser: StatementParser,
}

pub struct CommandRegistry {
    registrations: Vec<Registration>,
    longest_prefix: usize,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Registry with every built-in command
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("CREATE CLUSTER", |sql| {
            CreateClusterStatement::parse(sql).map(Statement::CreateCluster)
        });
        registry.register("CREATE BLOB CLUSTER", |sql| {
            CreateClusterStatement::parse(sql).map(Statement::CreateCluster)
        });
        registry.register("DROP CLUSTER", |sql| {
            DropClusterStatement::parse(sql).map(Statement::DropCluster)
        });
        registry.register("ALTER CLUSTER", |sql| {
            AlterClusterStatement::parse(sql).map(Statement::AlterCluster)
        });
        registry.register("CREATE SEQUENCE", |sql| {
            CreateSequenceStatement::parse(sql).map(Statement::CreateSequence)
        });
        registry.register("ALTER SEQUENCE", |sql| {
            AlterSequenceStatement::parse(sql).map(Statement::AlterSequence)
        });
        registry.register("DROP SEQUENCE", |sql| {
            DropSequenceStatement::parse(sql).map(Statement::DropSequence)
        });
        registry.register("CREATE FUNCTION", |sql| {
            CreateFunctionStatement::parse(sql).map(Statement::CreateFunction)
        });
        registry.register("CREATE USER", |sql| {
            CreateUserStatement::parse(sql).map(Statement::CreateUser)
        });
        registry.register("DROP USER", |sql| {
            DropUserStatement::parse(sql).map(Statement::DropUser)
        });
        registry.register("GRANT", |sql| {
            PermissionStatement::parse_grant(sql).map(Statement::Grant)
        });
        registry.register("REVOKE", |sql| {
            PermissionStatement::parse_revoke(sql).map(Statement::Revoke)
        });
        registry.register("TRUNCATE CLASS", |sql| {
            TruncateClassStatement::parse(sql).map(Statement::TruncateClass)
        });
        registry.register("TRUNCATE CLUSTER", |sql| {
            TruncateClusterStatement::parse(sql).map(Statement::TruncateCluster)
        });
        registry.register("TRUNCATE RECORD", |sql| {
            TruncateRecordStatement::parse(sql).map(Statement::TruncateRecord)
        });
        registry.register("REBUILD INDEX", |sql| {
            RebuildIndexStatement::parse(sql).map(Statement::RebuildIndex)
        });
        registry.register("FIND REFERENCES", |sql| {
            FindReferencesStatement::parse(sql).map(Statement::FindReferences)
        });
        registry.register("EXPLAIN", |sql| {
            ExplainStatement::parse(sql).map(Statement::Explain)
        });
        registry.register("LIVE UNSUBSCRIBE", |sql| {
            LiveUnsubscribeStatement::parse(sql).map(Statement::LiveUnsubscribe)
        });
        registry.register("TRANSACTIONAL", |sql| {
            TransactionalStatement::parse(sql).map(Statement::Transactional)
        });
        registry.register("BEGIN", |sql| {
            TransactionControl::parse(sql).map(Statement::Transaction)
        });
        registry.register("COMMIT", |sql| {
            TransactionControl::parse(sql).map(Statement::Transaction)
        });
        registry.register("ROLLBACK", |sql| {
            TransactionControl::parse(sql).map(Statement::Transaction)
        });
        registry
    }

    /// Registry without any command
    pub fn empty() -> Self {
        Self {
            registrations: Vec::new(),
            longest_prefix: 0,
        }
    }

    /// Register a parser for a space-separated keyword prefix
    pub fn register(&mut self, prefix: &'static str, parser: StatementParser) {
        let prefix: Vec<&'static str> = prefix.split_whitespace().collect();
        self.longest_prefix = self.longest_prefix.max(prefix.len());
        self.registrations.push(Registration { prefix, parser });
    }

    /// Parser registered for the longest prefix of `words`
    pub fn resolve(&self, words: &[String]) -> Option<StatementParser> {
        self.registrations
            .iter()
            .filter(|r| {
                r.prefix.len() <= words.len()
                    && r.prefix
                        .iter()
                        .zip(words)
                        .all(|(kw, word)| word.eq_ignore_ascii_case(kw))
            })
            .max_by_key(|r| r.prefix.len())
            .map(|r| r.parser)
    }

    pub fn parse(&self, sql: &str) -> ParseResult<Statement> {
        let cursor = TokenCursor::new(sql)?;
        let words = cursor.leading_words(self.longest_prefix);
        match self.resolve(&words) {
            Some(parser) => {
                log::debug!("Parsing command '{}'", sql.trim());
                parser(sql)
            }
            None => Err(ParseError::UnknownCommand(sql.trim().to_string())),
        }
    }
}

static DEFAULT_REGISTRY: Lazy<CommandRegistry> = Lazy::new(CommandRegistry::new);

/// Parse one command with the built-in registry
pub fn parse_statement(sql: &str) -> ParseResult<Statement> {
    DEFAULT_REGISTRY.parse(sql)
}

/// Cluster given by numeric id or by name
pub(crate) fn parse_cluster_ref(cursor: &mut TokenCursor<'_>) -> ParseResult<ClusterRef> {
    if let Some(TokenKind::Integer(id)) = cursor.peek().map(|t| t.kind.clone()) {
        cursor.advance();
        if id < 0 {
            return Err(ParseError::invalid_value(
                "cluster id",
                format!("{} must not be negative", id),
            ));
        }
        let id = i32::try_from(id)
            .map_err(|_| ParseError::invalid_value("cluster id", format!("{} is out of range", id)))?;
        return Ok(ClusterRef::Id(id));
    }
    cursor
        .expect_identifier("cluster name or id")
        .map(ClusterRef::Name)
}
