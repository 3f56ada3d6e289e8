// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! TRUNCATE CLASS / CLUSTER / RECORD
//!
//! ```text
//! TRUNCATE CLASS <class> [POLYMORPHIC] [UNSAFE]
//! TRUNCATE CLUSTER <name|id> [UNSAFE]
//! TRUNCATE RECORD <rid> | [<rid>, ...]
//! ```

use super::parse_cluster_ref;
use crate::ast::ast::{TruncateClassStatement, TruncateClusterStatement, TruncateRecordStatement};
use crate::ast::cursor::TokenCursor;
use crate::ast::error::{ParseError, ParseResult};

impl TruncateClassStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["TRUNCATE", "CLASS"])?;
        let class_name = cursor.expect_identifier("class name")?;

        let mut polymorphic = false;
        let mut unsafe_mode = false;
        loop {
            if !polymorphic && cursor.consume_keyword("POLYMORPHIC") {
                polymorphic = true;
            } else if !unsafe_mode && cursor.consume_keyword("UNSAFE") {
                unsafe_mode = true;
            } else {
                break;
            }
        }
        cursor.expect_end()?;

        Ok(Self {
            class_name,
            polymorphic,
            unsafe_mode,
        })
    }
}

impl TruncateClusterStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["TRUNCATE", "CLUSTER"])?;
        let cluster = parse_cluster_ref(&mut cursor)?;
        let unsafe_mode = cursor.consume_keyword("UNSAFE");
        cursor.expect_end()?;
        Ok(Self {
            cluster,
            unsafe_mode,
        })
    }
}

impl TruncateRecordStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["TRUNCATE", "RECORD"])?;
        let rids = cursor.expect_rid_list()?;
        if rids.is_empty() {
            return Err(ParseError::invalid_value("TRUNCATE RECORD", "no record ids given"));
        }
        cursor.expect_end()?;
        Ok(Self { rids })
    }
}
