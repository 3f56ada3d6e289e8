// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! EXPLAIN, LIVE UNSUBSCRIBE, TRANSACTIONAL and transaction control

use super::parse_statement;
use crate::ast::ast::{
    ExplainStatement, LiveUnsubscribeStatement, Statement, TransactionControl,
    TransactionalStatement,
};
use crate::ast::cursor::TokenCursor;
use crate::ast::error::{ParseError, ParseResult};
use crate::ast::lexer::TokenKind;

/// Parse the command that follows a wrapper keyword
fn parse_inner(cursor: &mut TokenCursor<'_>, wrapper: &str) -> ParseResult<(Statement, String)> {
    let text = cursor.rest_text();
    if text.is_empty() {
        return Err(ParseError::UnexpectedEnd {
            expected: format!("command after {}", wrapper),
        });
    }
    cursor.skip_to_end();
    let statement = parse_statement(text)?;
    if statement.is_transaction_control() {
        return Err(ParseError::invalid_value(
            wrapper,
            "transaction commands cannot be wrapped",
        ));
    }
    Ok((statement, text.to_string()))
}

impl ExplainStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keyword("EXPLAIN")?;
        let (statement, text) = parse_inner(&mut cursor, "EXPLAIN")?;
        if matches!(statement, Statement::Explain(_)) {
            return Err(ParseError::invalid_value("EXPLAIN", "EXPLAIN cannot be nested"));
        }
        Ok(Self {
            statement: Box::new(statement),
            text,
        })
    }
}

impl TransactionalStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keyword("TRANSACTIONAL")?;
        let (statement, _) = parse_inner(&mut cursor, "TRANSACTIONAL")?;
        Ok(Self {
            statement: Box::new(statement),
        })
    }
}

impl LiveUnsubscribeStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["LIVE", "UNSUBSCRIBE"])?;

        let token = match cursor.advance().map(|t| t.kind.clone()) {
            Some(TokenKind::Integer(value)) => i32::try_from(value)
                .map_err(|_| ParseError::invalid_value("token", format!("invalid token '{}'", value)))?,
            Some(other) => {
                return Err(ParseError::invalid_value(
                    "token",
                    format!("invalid token '{}'", other.describe()),
                ))
            }
            None => {
                return Err(ParseError::UnexpectedEnd {
                    expected: "live query token".to_string(),
                })
            }
        };
        cursor.expect_end()?;
        Ok(Self { token })
    }
}

impl TransactionControl {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        let control = if cursor.consume_keyword("BEGIN") {
            TransactionControl::Begin
        } else if cursor.consume_keyword("COMMIT") {
            TransactionControl::Commit
        } else if cursor.consume_keyword("ROLLBACK") {
            TransactionControl::Rollback
        } else {
            return Err(cursor.unexpected("BEGIN, COMMIT or ROLLBACK"));
        };
        cursor.consume_keyword("TRANSACTION");
        cursor.expect_end()?;
        Ok(control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explain() {
        let statement = ExplainStatement::parse("EXPLAIN TRUNCATE RECORD #1:0;").unwrap();
        assert_eq!(statement.text, "TRUNCATE RECORD #1:0");
        assert!(matches!(*statement.statement, Statement::TruncateRecord(_)));

        assert!(ExplainStatement::parse("EXPLAIN").is_err());
        assert!(ExplainStatement::parse("EXPLAIN EXPLAIN DROP CLUSTER x").is_err());
        assert!(ExplainStatement::parse("EXPLAIN COMMIT").is_err());
    }

    #[test]
    fn test_parse_live_unsubscribe() {
        assert_eq!(LiveUnsubscribeStatement::parse("LIVE UNSUBSCRIBE 42").unwrap().token, 42);
        assert!(matches!(
            LiveUnsubscribeStatement::parse("LIVE UNSUBSCRIBE abc"),
            Err(ParseError::InvalidValue { .. })
        ));
        assert!(LiveUnsubscribeStatement::parse("LIVE UNSUBSCRIBE 99999999999").is_err());
        assert!(LiveUnsubscribeStatement::parse("LIVE UNSUBSCRIBE").is_err());
    }

    #[test]
    fn test_parse_transactional() {
        let statement = TransactionalStatement::parse("TRANSACTIONAL CREATE CLUSTER x").unwrap();
        assert!(matches!(*statement.statement, Statement::CreateCluster(_)));
        assert!(TransactionalStatement::parse("TRANSACTIONAL TRANSACTIONAL CREATE CLUSTER x").is_err());
        assert!(TransactionalStatement::parse("TRANSACTIONAL BEGIN").is_err());
    }

    #[test]
    fn test_parse_transaction_control() {
        assert_eq!(TransactionControl::parse("begin").unwrap(), TransactionControl::Begin);
        assert_eq!(
            TransactionControl::parse("COMMIT TRANSACTION").unwrap(),
            TransactionControl::Commit
        );
        assert!(TransactionControl::parse("ROLLBACK now").is_err());
    }
}
