// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CREATE / DROP / ALTER CLUSTER
//!
//! ```text
//! CREATE [BLOB] CLUSTER <name> [ID <id>]
//! DROP CLUSTER <name|id> [IF EXISTS]
//! ALTER CLUSTER <name|id|prefix*> NAME|STATUS|CONFLICTSTRATEGY <value>
//! ```

use std::str::FromStr;

use super::parse_cluster_ref;
use crate::ast::ast::{
    AlterClusterStatement, ClusterAttribute, ClusterSelector, CreateClusterStatement,
    DropClusterStatement,
};
use crate::ast::cursor::TokenCursor;
use crate::ast::error::{ParseError, ParseResult};
use crate::ast::lexer::TokenKind;
use crate::catalog::{ClusterStatus, ConflictStrategy};

impl CreateClusterStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keyword("CREATE")?;
        let blob = cursor.consume_keyword("BLOB");
        cursor.expect_keyword("CLUSTER")?;
        let name = cursor.expect_identifier("cluster name")?;

        let id = if cursor.consume_keyword("ID") {
            let id = cursor.expect_integer("cluster id")?;
            Some(i32::try_from(id).map_err(|_| {
                ParseError::invalid_value("cluster id", format!("{} is out of range", id))
            })?)
        } else {
            None
        };
        cursor.expect_end()?;

        Ok(Self { name, id, blob })
    }
}

impl DropClusterStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["DROP", "CLUSTER"])?;
        let cluster = parse_cluster_ref(&mut cursor)?;
        let if_exists = cursor.consume_keywords(&["IF", "EXISTS"]);
        cursor.expect_end()?;
        Ok(Self { cluster, if_exists })
    }
}

impl AlterClusterStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["ALTER", "CLUSTER"])?;

        let selector = match cursor.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Word(word)) if word.len() > 1 && word.ends_with('*') => {
                cursor.advance();
                ClusterSelector::Prefix(word.trim_end_matches('*').to_string())
            }
            _ => ClusterSelector::Single(parse_cluster_ref(&mut cursor)?),
        };

        let attribute = if cursor.consume_keyword("NAME") {
            ClusterAttribute::Name
        } else if cursor.consume_keyword("STATUS") {
            ClusterAttribute::Status
        } else if cursor.consume_keyword("CONFLICTSTRATEGY") {
            ClusterAttribute::ConflictStrategy
        } else {
            return Err(cursor.unexpected("NAME, STATUS or CONFLICTSTRATEGY"));
        };

        let value = cursor.expect_text("attribute value")?;
        match attribute {
            ClusterAttribute::Status => {
                ClusterStatus::from_str(&value)
                    .map_err(|e| ParseError::invalid_value("STATUS", e.to_string()))?;
            }
            ClusterAttribute::ConflictStrategy => {
                ConflictStrategy::from_str(&value)
                    .map_err(|e| ParseError::invalid_value("CONFLICTSTRATEGY", e.to_string()))?;
            }
            ClusterAttribute::Name => {}
        }
        cursor.expect_end()?;

        Ok(Self {
            selector,
            attribute,
            value,
        })
    }
}
