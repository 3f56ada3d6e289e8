// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CREATE FUNCTION <name> '<code>' [PARAMETERS [<p>, ...]] [IDEMPOTENT TRUE|FALSE] [LANGUAGE <lang>]

use crate::ast::ast::CreateFunctionStatement;
use crate::ast::cursor::TokenCursor;
use crate::ast::error::{ParseError, ParseResult};

impl CreateFunctionStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["CREATE", "FUNCTION"])?;
        let name = cursor.expect_identifier("function name")?;
        let code = cursor.expect_string("quoted function code")?;

        let mut parameters = None;
        let mut idempotent = None;
        let mut language = None;
        loop {
            if cursor.consume_keyword("PARAMETERS") {
                if parameters.is_some() {
                    return Err(ParseError::invalid_value("PARAMETERS", "specified more than once"));
                }
                parameters = Some(cursor.expect_identifier_list("parameter name")?);
            } else if cursor.consume_keyword("IDEMPOTENT") {
                if idempotent.is_some() {
                    return Err(ParseError::invalid_value("IDEMPOTENT", "specified more than once"));
                }
                idempotent = Some(cursor.expect_bool("TRUE or FALSE")?);
            } else if cursor.consume_keyword("LANGUAGE") {
                if language.is_some() {
                    return Err(ParseError::invalid_value("LANGUAGE", "specified more than once"));
                }
                language = Some(cursor.expect_identifier("language")?);
            } else {
                break;
            }
        }
        cursor.expect_end()?;

        Ok(Self {
            name,
            code,
            parameters: parameters.unwrap_or_default(),
            idempotent,
            language,
        })
    }
}
