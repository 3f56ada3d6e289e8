// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! User and permission commands
//!
//! ```text
//! CREATE USER <name> IDENTIFIED BY <password> [ROLE <role> | ROLE [<role>, ...]]
//! DROP USER <name>
//! GRANT <permission> ON <resource> TO <role>
//! REVOKE <permission> ON <resource> FROM <role>
//! ```

use crate::ast::ast::{CreateUserStatement, DropUserStatement, PermissionStatement};
use crate::ast::cursor::TokenCursor;
use crate::ast::error::{ParseError, ParseResult};
use crate::catalog::security::{parse_permission, Resource, WRITER_ROLE};

impl CreateUserStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["CREATE", "USER"])?;
        let name = cursor.expect_identifier("user name")?;
        cursor.expect_keywords(&["IDENTIFIED", "BY"])?;
        let password = cursor.expect_text("password")?;

        let roles = if cursor.consume_keyword("ROLE") {
            let roles = cursor.expect_identifier_list("role name")?;
            if roles.is_empty() {
                return Err(ParseError::invalid_value("ROLE", "role list must not be empty"));
            }
            roles
        } else {
            vec![WRITER_ROLE.to_string()]
        };
        cursor.expect_end()?;

        Ok(Self {
            name,
            password,
            roles,
        })
    }
}

impl DropUserStatement {
    pub fn parse(sql: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keywords(&["DROP", "USER"])?;
        let name = cursor.expect_identifier("user name")?;
        cursor.expect_end()?;
        Ok(Self { name })
    }
}

impl PermissionStatement {
    fn parse_with(sql: &str, verb: &str, preposition: &str) -> ParseResult<Self> {
        let mut cursor = TokenCursor::new(sql)?;
        cursor.expect_keyword(verb)?;
        let permission_name = cursor.expect_identifier("permission")?.to_uppercase();
        let permission = parse_permission(&permission_name)
            .map_err(|e| ParseError::invalid_value("permission", e.to_string()))?;

        cursor.expect_keyword("ON")?;
        let resource_text = cursor.expect_identifier("resource")?;
        let resource: Resource = resource_text
            .parse()
            .map_err(|e: crate::catalog::CatalogError| ParseError::invalid_value("resource", e.to_string()))?;

        cursor.expect_keyword(preposition)?;
        let role = cursor.expect_identifier("role name")?;
        cursor.expect_end()?;

        Ok(Self {
            permission_name,
            permission,
            resource,
            role,
        })
    }

    pub fn parse_grant(sql: &str) -> ParseResult<Self> {
        Self::parse_with(sql, "GRANT", "TO")
    }

    pub fn parse_revoke(sql: &str) -> ParseResult<Self> {
        Self::parse_with(sql, "REVOKE", "FROM")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::security::{ResourceGeneric, PERMISSION_ALL, PERMISSION_READ};

    #[test]
    fn test_parse_create_user() {
        let statement =
            CreateUserStatement::parse("CREATE USER alice IDENTIFIED BY 'p@ss word' ROLE [reader, auditor]")
                .unwrap();
        assert_eq!(statement.name, "alice");
        assert_eq!(statement.password, "p@ss word");
        assert_eq!(statement.roles, vec!["reader".to_string(), "auditor".to_string()]);

        let default_role = CreateUserStatement::parse("CREATE USER bob IDENTIFIED BY secret").unwrap();
        assert_eq!(default_role.roles, vec!["writer".to_string()]);

        let single = CreateUserStatement::parse("CREATE USER carl IDENTIFIED BY x ROLE admin").unwrap();
        assert_eq!(single.roles, vec!["admin".to_string()]);

        assert!(CreateUserStatement::parse("CREATE USER dave secret").is_err());
        assert!(CreateUserStatement::parse("CREATE USER dave IDENTIFIED BY x ROLE []").is_err());
    }

    #[test]
    fn test_parse_drop_user() {
        assert_eq!(DropUserStatement::parse("DROP USER alice").unwrap().name, "alice");
        assert!(DropUserStatement::parse("DROP USER").is_err());
    }

    #[test]
    fn test_parse_grant_and_revoke() {
        let grant = PermissionStatement::parse_grant("GRANT read ON database.class.Person TO reader").unwrap();
        assert_eq!(grant.permission, PERMISSION_READ);
        assert_eq!(grant.permission_name, "READ");
        assert_eq!(grant.resource, Resource::specific(ResourceGeneric::Class, "person"));
        assert_eq!(grant.role, "reader");

        let revoke = PermissionStatement::parse_revoke("REVOKE ALL ON database.cluster FROM writer").unwrap();
        assert_eq!(revoke.permission, PERMISSION_ALL);
        assert_eq!(revoke.resource, Resource::generic(ResourceGeneric::Cluster));

        assert!(PermissionStatement::parse_grant("GRANT WRITE ON database TO reader").is_err());
        assert!(PermissionStatement::parse_grant("GRANT READ ON nowhere TO reader").is_err());
        assert!(PermissionStatement::parse_revoke("REVOKE READ ON database TO reader").is_err());
    }
}
