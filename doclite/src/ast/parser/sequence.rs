// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CREATE / ALTER / DROP SEQUENCE
//!
//! ```text
//! CREATE SEQUENCE <name> [IF NOT EXISTS] [TYPE CACHED|ORDERED] <options>
//! ALTER SEQUENCE <name> <options>
//! DROP SEQUENCE <name> [IF EXISTS]
//!
//! options: [START <n>] [INCREMENT <n>] [CACHE <n>] [LIMIT <n>|NOLIMIT]
//!          [ASC|DESC] [CYCLE [TRUE|FALSE]]
//! ```

use std::str::FromStr;

use crate::ast::ast::{AlterSequenceStatement, CreateSequenceStatement, DropSequenceStatement};
use crate::ast::cursor::TokenCursor;
use crate::ast::error::{ParseError, ParseResult};
use crate::catalog::{SequenceOrder, SequenceParams, SequenceType};

fn set_once<T>(slot: &mut Option<T>, value: T, clause: &str) -> ParseResult<()> {
    if slot.is_some() {
        return Err(ParseError::invalid_value(
            clause,
            format!("{} specified more than once", clause),
        ));
    }
    *slot = Some(value);
    Ok(())
}

/// Parse option clauses until none match; `NOLIMIT` is only valid on ALTER
fn parse_options(cursor: &mut TokenCursor<'_>, allow_no_limit: bool) -> ParseResult<SequenceParams> {
    let mut params = SequenceParams::default();
    loop {
        if cursor.consume_keyword("START") {
            let value = cursor.expect_integer("START value")?;
            set_once(&mut params.start, value, "START")?;
        } else if cursor.consume_keyword("INCREMENT") {
            let value = cursor.expect_integer("INCREMENT value")?;
            set_once(&mut params.increment, value, "INCREMENT")?;
        } else if cursor.consume_keyword("CACHE") {
            let value = cursor.expect_integer("CACHE value")?;
            set_once(&mut params.cache_size, value, "CACHE")?;
        } else if cursor.consume_keyword("LIMIT") {
            let value = cursor.expect_integer("LIMIT value")?;
            set_once(&mut params.limit, value, "LIMIT")?;
        } else if allow_no_limit && cursor.consume_keyword("NOLIMIT") {
            params.no_limit = true;
        } else if cursor.consume_keyword("ASC") {
            set_once(&mut params.order, SequenceOrder::Ascending, "ASC/DESC")?;
        } else if cursor.consume_keyword("DESC") {
            set_once(&mut params.order, SequenceOrder::Descending, "ASC/DESC")?;
        } else if cursor.consume_keyword("CYCLE") {
            let cycle = if cursor.peek_keyword("TRUE") || cursor.peek_keyword("FALSE") {
                cursor.expect_bool("TRUE or FALSE")?
            } else {
                true
            };
            set_once(&mut params.cycle, cycle, "CYCLE")?;
        } else {
            break;
        }
    }

    if params.no_limit && params.limit.is_some() {
        return Err(ParseError::invalid_value(
            "LIMIT",
            "LIMIT and NOLIMIT cannot be combined",
        ));
    }
    Ok(params)
}

impl CreateSequenceStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["CREATE", "SEQUENCE"])?;
        let name = cursor.expect_identifier("sequence name")?;
        let if_not_exists = cursor.consume_keywords(&["IF", "NOT", "EXISTS"]);

        let sequence_type = if cursor.consume_keyword("TYPE") {
            let text = cursor.expect_identifier("CACHED or ORDERED")?;
            SequenceType::from_str(&text)
                .map_err(|e| ParseError::invalid_value("TYPE", e.to_string()))?
        } else {
            SequenceType::Cached
        };

        let params = parse_options(&mut cursor, false)?;
        cursor.expect_end()?;

        Ok(Self {
            name,
            if_not_exists,
            sequence_type,
            params,
        })
    }
}

impl AlterSequenceStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["ALTER", "SEQUENCE"])?;
        let name = cursor.expect_identifier("sequence name")?;
        let params = parse_options(&mut cursor, true)?;
        cursor.expect_end()?;

        if params.is_empty() {
            return Err(ParseError::invalid_value(
                "ALTER SEQUENCE",
                "at least one attribute must be changed",
            ));
        }
        Ok(Self { name, params })
    }
}

impl DropSequenceStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["DROP", "SEQUENCE"])?;
        let name = cursor.expect_identifier("sequence name")?;
        let if_exists = cursor.consume_keywords(&["IF", "EXISTS"]);
        cursor.expect_end()?;
        Ok(Self { name, if_exists })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_sequence() {
        let statement = CreateSequenceStatement::parse(
            "CREATE SEQUENCE ids IF NOT EXISTS TYPE ORDERED START 10 INCREMENT 5 LIMIT 100 DESC CYCLE TRUE",
        )
        .unwrap();
        assert_eq!(statement.name, "ids");
        assert!(statement.if_not_exists);
        assert_eq!(statement.sequence_type, SequenceType::Ordered);
        assert_eq!(statement.params.start, Some(10));
        assert_eq!(statement.params.increment, Some(5));
        assert_eq!(statement.params.limit, Some(100));
        assert_eq!(statement.params.order, Some(SequenceOrder::Descending));
        assert_eq!(statement.params.cycle, Some(true));
    }

    #[test]
    fn test_create_sequence_defaults_to_cached() {
        let statement = CreateSequenceStatement::parse("create sequence ids cache 50").unwrap();
        assert_eq!(statement.sequence_type, SequenceType::Cached);
        assert_eq!(statement.params.cache_size, Some(50));
        assert!(!statement.if_not_exists);
    }

    #[test]
    fn test_create_sequence_rejects_bad_clauses() {
        assert!(CreateSequenceStatement::parse("CREATE SEQUENCE s TYPE RANDOM").is_err());
        assert!(CreateSequenceStatement::parse("CREATE SEQUENCE s START 1 START 2").is_err());
        assert!(CreateSequenceStatement::parse("CREATE SEQUENCE s NOLIMIT").is_err());
        assert!(CreateSequenceStatement::parse("CREATE SEQUENCE s START x").is_err());
    }

    #[test]
    fn test_parse_alter_sequence() {
        let statement = AlterSequenceStatement::parse("ALTER SEQUENCE ids NOLIMIT CYCLE FALSE").unwrap();
        assert!(statement.params.no_limit);
        assert_eq!(statement.params.cycle, Some(false));

        assert!(AlterSequenceStatement::parse("ALTER SEQUENCE ids").is_err());
        assert!(AlterSequenceStatement::parse("ALTER SEQUENCE ids LIMIT 3 NOLIMIT").is_err());
    }

    #[test]
    fn test_parse_drop_sequence() {
        let statement = DropSequenceStatement::parse("DROP SEQUENCE ids IF EXISTS").unwrap();
        assert!(statement.if_exists);
        assert!(!DropSequenceStatement::parse("DROP SEQUENCE ids").unwrap().if_exists);
    }
}
