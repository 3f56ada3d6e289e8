// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! FIND REFERENCES <rid> | [<rid>, ...] [[<class> | CLUSTER:<name>, ...]]

use crate::ast::ast::{FindReferencesStatement, ReferenceTarget};
use crate::ast::cursor::TokenCursor;
use crate::ast::error::{ParseError, ParseResult};
use crate::ast::lexer::TokenKind;

fn reference_target(item: String) -> ParseResult<ReferenceTarget> {
    match item.split_once(':') {
        Some((prefix, name)) if prefix.eq_ignore_ascii_case("CLUSTER") => {
            if name.is_empty() {
                return Err(ParseError::invalid_value("FIND REFERENCES", "empty cluster name"));
            }
            Ok(ReferenceTarget::Cluster(name.to_string()))
        }
        _ => Ok(ReferenceTarget::Class(item)),
    }
}

impl FindReferencesStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["FIND", "REFERENCES"])?;
        let rids = cursor.expect_rid_list()?;
        if rids.is_empty() {
            return Err(ParseError::invalid_value("FIND REFERENCES", "no record ids given"));
        }

        let mut targets = Vec::new();
        if cursor.peek().map(|t| t.kind == TokenKind::LBracket).unwrap_or(false) {
            for item in cursor.expect_identifier_list("class or CLUSTER:<name>")? {
                targets.push(reference_target(item)?);
            }
        }
        cursor.expect_end()?;

        Ok(Self { rids, targets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecordId;

    #[test]
    fn test_parse_single_rid() {
        let statement = FindReferencesStatement::parse("FIND REFERENCES #5:0").unwrap();
        assert_eq!(statement.rids, vec![RecordId::new(5, 0)]);
        assert!(statement.targets.is_empty());
    }

    #[test]
    fn test_parse_targets() {
        let statement =
            FindReferencesStatement::parse("FIND REFERENCES [#5:0, #5:1] [Person, cluster:archive]").unwrap();
        assert_eq!(statement.rids.len(), 2);
        assert_eq!(
            statement.targets,
            vec![
                ReferenceTarget::Class("Person".into()),
                ReferenceTarget::Cluster("archive".into()),
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(FindReferencesStatement::parse("FIND REFERENCES").is_err());
        assert!(FindReferencesStatement::parse("FIND REFERENCES #1:1 Person").is_err());
        assert!(FindReferencesStatement::parse("FIND REFERENCES #1:1 [CLUSTER:]").is_err());
    }
}
