// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! REBUILD INDEX <name> | *

use crate::ast::ast::{IndexTarget, RebuildIndexStatement};
use crate::ast::cursor::TokenCursor;
use crate::ast::error::ParseResult;

impl RebuildIndexStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["REBUILD", "INDEX"])?;
        let name = cursor.expect_identifier("index name or *")?;
        cursor.expect_end()?;

        let target = if name == "*" {
            IndexTarget::All
        } else {
            IndexTarget::Named(name)
        };
        Ok(Self { target })
    }
}
