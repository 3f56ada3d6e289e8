// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Users, roles and permission rules
//!
//! Permissions are CRUD+execute bit masks attached to resources. A resource is
//! written `database.<generic>[.<specific>]`, for example `database.class.Person`
//! or `database.cluster.*`. A role checks the specific rule first, then the
//! generic rule, then the all-resources rule, then delegates to its parent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::{CatalogError, CatalogResult};

pub const PERMISSION_NONE: u8 = 0;
pub const PERMISSION_CREATE: u8 = 1;
pub const PERMISSION_READ: u8 = 1 << 1;
pub const PERMISSION_UPDATE: u8 = 1 << 2;
pub const PERMISSION_DELETE: u8 = 1 << 3;
pub const PERMISSION_EXECUTE: u8 = 1 << 4;
pub const PERMISSION_ALL: u8 = PERMISSION_CREATE
    | PERMISSION_READ
    | PERMISSION_UPDATE
    | PERMISSION_DELETE
    | PERMISSION_EXECUTE;

const PERMISSION_NAMES: [(u8, &str); 5] = [
    (PERMISSION_CREATE, "Create"),
    (PERMISSION_READ, "Read"),
    (PERMISSION_UPDATE, "Update"),
    (PERMISSION_DELETE, "Delete"),
    (PERMISSION_EXECUTE, "Execute"),
];

pub const ADMIN_ROLE: &str = "admin";
pub const WRITER_ROLE: &str = "writer";
pub const READER_ROLE: &str = "reader";
pub const ADMIN_USER: &str = "admin";

/// Class resource guarding user management
pub const USER_CLASS: &str = "ouser";
/// Class resource guarding role rules
pub const ROLE_CLASS: &str = "orole";

/// Parse a permission keyword (NONE, CREATE, READ, UPDATE, DELETE, EXECUTE, ALL)
pub fn parse_permission(name: &str) -> CatalogResult<u8> {
    match name.to_uppercase().as_str() {
        "NONE" => Ok(PERMISSION_NONE),
        "CREATE" => Ok(PERMISSION_CREATE),
        "READ" => Ok(PERMISSION_READ),
        "UPDATE" => Ok(PERMISSION_UPDATE),
        "DELETE" => Ok(PERMISSION_DELETE),
        "EXECUTE" => Ok(PERMISSION_EXECUTE),
        "ALL" => Ok(PERMISSION_ALL),
        other => Err(CatalogError::InvalidArgument(format!(
            "Unknown permission '{}'. Valid options: NONE, CREATE, READ, UPDATE, DELETE, EXECUTE, ALL",
            other
        ))),
    }
}

/// Human readable list of the bits set in a mask
pub fn permission_to_string(mask: u8) -> String {
    let names: Vec<&str> = PERMISSION_NAMES
        .iter()
        .filter(|(bit, _)| mask & bit == *bit)
        .map(|(_, name)| *name)
        .collect();
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

/// Resource families a rule can apply to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceGeneric {
    All,
    Database,
    Schema,
    Class,
    Cluster,
    Command,
    Function,
    RecordHook,
    Server,
    SystemClusters,
    BypassRestricted,
}

impl ResourceGeneric {
    pub fn legacy_name(self) -> &'static str {
        match self {
            ResourceGeneric::All => "*",
            ResourceGeneric::Database => "database",
            ResourceGeneric::Schema => "database.schema",
            ResourceGeneric::Class => "database.class",
            ResourceGeneric::Cluster => "database.cluster",
            ResourceGeneric::Command => "database.command",
            ResourceGeneric::Function => "database.function",
            ResourceGeneric::RecordHook => "database.hook.record",
            ResourceGeneric::Server => "server",
            ResourceGeneric::SystemClusters => "database.systemclusters",
            ResourceGeneric::BypassRestricted => "database.bypassrestricted",
        }
    }

    /// Generics that accept a specific resource name after their prefix
    fn takes_specific(self) -> bool {
        matches!(
            self,
            ResourceGeneric::Class | ResourceGeneric::Cluster | ResourceGeneric::Function
        )
    }
}

/// A generic resource with an optional specific name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub generic: ResourceGeneric,
    pub specific: Option<String>,
}

impl Resource {
    pub fn generic(generic: ResourceGeneric) -> Self {
        Self {
            generic,
            specific: None,
        }
    }

    pub fn specific(generic: ResourceGeneric, name: &str) -> Self {
        Self {
            generic,
            specific: Some(name.to_lowercase()),
        }
    }

    /// `database.class.ouser`
    pub fn users() -> Self {
        Self::specific(ResourceGeneric::Class, USER_CLASS)
    }

    /// `database.class.orole`
    pub fn roles() -> Self {
        Self::specific(ResourceGeneric::Class, ROLE_CLASS)
    }
}

impl FromStr for Resource {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if lowered.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "Resource must not be empty".to_string(),
            ));
        }
        if lowered == "*" {
            return Ok(Resource::generic(ResourceGeneric::All));
        }

        // longest legacy prefix wins: "database.class.x" before "database"
        let generics = [
            ResourceGeneric::RecordHook,
            ResourceGeneric::SystemClusters,
            ResourceGeneric::BypassRestricted,
            ResourceGeneric::Schema,
            ResourceGeneric::Class,
            ResourceGeneric::Cluster,
            ResourceGeneric::Command,
            ResourceGeneric::Function,
            ResourceGeneric::Server,
            ResourceGeneric::Database,
        ];
        for generic in generics {
            let prefix = generic.legacy_name();
            if lowered == prefix {
                return Ok(Resource::generic(generic));
            }
            if let Some(rest) = lowered.strip_prefix(prefix).and_then(|r| r.strip_prefix('.')) {
                if rest == "*" {
                    return Ok(Resource::generic(generic));
                }
                if generic.takes_specific() && !rest.is_empty() {
                    return Ok(Resource::specific(generic, rest));
                }
                if generic == ResourceGeneric::Server {
                    return Ok(Resource::specific(generic, rest));
                }
            }
        }
        Err(CatalogError::InvalidArgument(format!(
            "Unknown resource '{}'",
            s
        )))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.specific {
            Some(specific) => write!(f, "{}.{}", self.generic.legacy_name(), specific),
            None => write!(f, "{}", self.generic.legacy_name()),
        }
    }
}

/// Access masks for one resource family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub generic_access: Option<u8>,
    pub specific_access: BTreeMap<String, u8>,
}

impl Rule {
    fn grant_access(&mut self, specific: Option<&str>, mask: u8) {
        match specific {
            Some(name) => {
                *self.specific_access.entry(name.to_lowercase()).or_insert(0) |= mask;
            }
            None => {
                self.generic_access = Some(self.generic_access.unwrap_or(0) | mask);
            }
        }
    }

    fn revoke_access(&mut self, specific: Option<&str>, mask: u8) {
        match specific {
            Some(name) => {
                let entry = self.specific_access.entry(name.to_lowercase()).or_insert(0);
                *entry &= !mask;
            }
            None => {
                self.generic_access = Some(self.generic_access.unwrap_or(0) & !mask);
            }
        }
    }

    /// `None` when this rule says nothing about the resource
    fn is_allowed(&self, specific: Option<&str>, operation: u8) -> Option<bool> {
        if let Some(name) = specific {
            if let Some(mask) = self.specific_access.get(&name.to_lowercase()) {
                return Some(mask & operation == operation);
            }
        }
        self.generic_access.map(|mask| mask & operation == operation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub parent: Option<String>,
    pub rules: BTreeMap<ResourceGeneric, Rule>,
}

impl Role {
    fn new(name: &str, parent: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            rules: BTreeMap::new(),
        }
    }

    fn with_rule(mut self, generic: ResourceGeneric, mask: u8) -> Self {
        self.rules.entry(generic).or_default().grant_access(None, mask);
        self
    }

    fn with_specific_rule(mut self, resource: Resource, mask: u8) -> Self {
        self.rules
            .entry(resource.generic)
            .or_default()
            .grant_access(resource.specific.as_deref(), mask);
        self
    }

    fn local_allow(&self, resource: &Resource, operation: u8) -> Option<bool> {
        let specific = resource.specific.as_deref();
        if let Some(decision) = self
            .rules
            .get(&resource.generic)
            .and_then(|rule| rule.is_allowed(specific, operation))
        {
            return Some(decision);
        }
        self.rules
            .get(&ResourceGeneric::All)
            .and_then(|rule| rule.is_allowed(None, operation))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub password_hash: String,
    pub status: UserStatus,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityManager {
    users: BTreeMap<String, User>,
    roles: BTreeMap<String, Role>,
    bcrypt_cost: u32,
}

impl SecurityManager {
    /// Create the built-in roles and the bootstrap admin user
    pub fn bootstrap(admin_password: &str, bcrypt_cost: u32) -> CatalogResult<Self> {
        let mut manager = Self {
            users: BTreeMap::new(),
            roles: BTreeMap::new(),
            bcrypt_cost,
        };

        let admin = Role::new(ADMIN_ROLE, None).with_rule(ResourceGeneric::All, PERMISSION_ALL);
        let reader = Role::new(READER_ROLE, None)
            .with_rule(ResourceGeneric::Database, PERMISSION_READ)
            .with_rule(ResourceGeneric::Schema, PERMISSION_READ)
            .with_rule(ResourceGeneric::Class, PERMISSION_READ)
            .with_rule(ResourceGeneric::Cluster, PERMISSION_READ)
            .with_rule(ResourceGeneric::Command, PERMISSION_READ)
            .with_rule(ResourceGeneric::Function, PERMISSION_READ);
        let writer = Role::new(WRITER_ROLE, None)
            .with_rule(ResourceGeneric::Database, PERMISSION_READ)
            .with_rule(
                ResourceGeneric::Schema,
                PERMISSION_READ | PERMISSION_CREATE | PERMISSION_UPDATE,
            )
            .with_rule(ResourceGeneric::Class, PERMISSION_ALL)
            .with_specific_rule(Resource::users(), PERMISSION_READ)
            .with_specific_rule(Resource::roles(), PERMISSION_READ)
            .with_rule(ResourceGeneric::Cluster, PERMISSION_ALL)
            .with_rule(ResourceGeneric::Command, PERMISSION_ALL)
            .with_rule(ResourceGeneric::Function, PERMISSION_READ)
            .with_rule(ResourceGeneric::RecordHook, PERMISSION_ALL);

        for role in [admin, reader, writer] {
            manager.roles.insert(role.name.to_lowercase(), role);
        }
        manager.create_user(ADMIN_USER, admin_password, &[ADMIN_ROLE.to_string()])?;
        Ok(manager)
    }

    pub fn create_role(&mut self, name: &str, parent: Option<&str>) -> CatalogResult<&Role> {
        let key = name.to_lowercase();
        if self.roles.contains_key(&key) {
            return Err(CatalogError::already_exists("Role", name));
        }
        if let Some(parent) = parent {
            if !self.roles.contains_key(&parent.to_lowercase()) {
                return Err(CatalogError::not_found("Role", parent));
            }
        }
        Ok(self.roles.entry(key).or_insert_with(|| Role::new(name, parent)))
    }

    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.get(&name.to_lowercase())
    }

    fn role_mut(&mut self, name: &str) -> CatalogResult<&mut Role> {
        self.roles
            .get_mut(&name.to_lowercase())
            .ok_or_else(|| CatalogError::not_found("Role", name))
    }

    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    pub fn create_user(&mut self, name: &str, password: &str, roles: &[String]) -> CatalogResult<&User> {
        if name.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "User name must not be empty".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(CatalogError::InvalidArgument(format!(
                "Password of user '{}' must not be empty",
                name
            )));
        }
        if self.users.contains_key(name) {
            return Err(CatalogError::already_exists("User", name));
        }

        let mut resolved = Vec::with_capacity(roles.len());
        for role in roles {
            let role = self
                .role(role)
                .ok_or_else(|| CatalogError::not_found("Role", role.as_str()))?;
            resolved.push(role.name.clone());
        }

        let password_hash = bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| CatalogError::Security(format!("Failed to hash password: {}", e)))?;

        log::info!("Creating user '{}' with roles {:?}", name, resolved);
        let user = User {
            name: name.to_string(),
            password_hash,
            status: UserStatus::Active,
            roles: resolved,
            created_at: Utc::now(),
        };
        Ok(self.users.entry(name.to_string()).or_insert(user))
    }

    pub fn drop_user(&mut self, name: &str) -> CatalogResult<User> {
        let user = self
            .users
            .remove(name)
            .ok_or_else(|| CatalogError::not_found("User", name))?;
        log::info!("Dropped user '{}'", name);
        Ok(user)
    }

    pub fn set_password(&mut self, name: &str, password: &str) -> CatalogResult<()> {
        if password.is_empty() {
            return Err(CatalogError::InvalidArgument(format!(
                "Password of user '{}' must not be empty",
                name
            )));
        }
        let cost = self.bcrypt_cost;
        let user = self
            .users
            .get_mut(name)
            .ok_or_else(|| CatalogError::not_found("User", name))?;
        user.password_hash = bcrypt::hash(password, cost)
            .map_err(|e| CatalogError::Security(format!("Failed to hash password: {}", e)))?;
        log::info!("Changed password of user '{}'", name);
        Ok(())
    }

    pub fn set_status(&mut self, name: &str, status: UserStatus) -> CatalogResult<()> {
        self.users
            .get_mut(name)
            .ok_or_else(|| CatalogError::not_found("User", name))?
            .status = status;
        log::info!("User '{}' is now {:?}", name, status);
        Ok(())
    }

    /// Verify credentials and return the user
    pub fn authenticate(&self, name: &str, password: &str) -> CatalogResult<&User> {
        let invalid = || CatalogError::Security(format!("Invalid credentials for user '{}'", name));
        let user = self.users.get(name).ok_or_else(invalid)?;
        let matches = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| CatalogError::Security(format!("Failed to verify password: {}", e)))?;
        if !matches {
            return Err(invalid());
        }
        if user.status == UserStatus::Suspended {
            return Err(CatalogError::Security(format!(
                "User '{}' is suspended",
                name
            )));
        }
        Ok(user)
    }

    pub fn grant(&mut self, role: &str, resource: &Resource, mask: u8) -> CatalogResult<&Role> {
        let role = self.role_mut(role)?;
        role.rules
            .entry(resource.generic)
            .or_default()
            .grant_access(resource.specific.as_deref(), mask);
        log::info!(
            "Granted {} on {} to role '{}'",
            permission_to_string(mask),
            resource,
            role.name
        );
        Ok(role)
    }

    pub fn revoke(&mut self, role: &str, resource: &Resource, mask: u8) -> CatalogResult<&Role> {
        let role = self.role_mut(role)?;
        if mask == PERMISSION_NONE {
            return Ok(role);
        }
        role.rules
            .entry(resource.generic)
            .or_default()
            .revoke_access(resource.specific.as_deref(), mask);
        log::info!(
            "Revoked {} on {} from role '{}'",
            permission_to_string(mask),
            resource,
            role.name
        );
        Ok(role)
    }

    /// Check a role (and its ancestors) for an operation on a resource
    pub fn role_allows(&self, role: &str, resource: &Resource, operation: u8) -> bool {
        let mut current = self.role(role);
        let mut depth = 0;
        while let Some(role) = current {
            if let Some(decision) = role.local_allow(resource, operation) {
                return decision;
            }
            depth += 1;
            if depth > self.roles.len() {
                log::warn!("Role inheritance cycle detected at '{}'", role.name);
                return false;
            }
            current = role.parent.as_deref().and_then(|p| self.role(p));
        }
        false
    }

    /// Check whether any of the user's roles allows the operation
    pub fn user_allows(&self, user: &str, resource: &Resource, operation: u8) -> bool {
        self.users
            .get(user)
            .map(|u| {
                u.status == UserStatus::Active
                    && u.roles
                        .iter()
                        .any(|role| self.role_allows(role, resource, operation))
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    fn manager() -> SecurityManager {
        SecurityManager::bootstrap("admin", TEST_COST).unwrap()
    }

    #[test]
    fn test_parse_resources() {
        let class: Resource = "database.class.Person".parse().unwrap();
        assert_eq!(class, Resource::specific(ResourceGeneric::Class, "person"));

        let all_classes: Resource = "database.class.*".parse().unwrap();
        assert_eq!(all_classes, Resource::generic(ResourceGeneric::Class));

        let schema: Resource = "DATABASE.SCHEMA".parse().unwrap();
        assert_eq!(schema.generic, ResourceGeneric::Schema);

        let hook: Resource = "database.hook.record".parse().unwrap();
        assert_eq!(hook.generic, ResourceGeneric::RecordHook);

        assert!("nonsense".parse::<Resource>().is_err());
        assert!("database.schema.x".parse::<Resource>().is_err());
    }

    #[test]
    fn test_permission_names() {
        assert_eq!(parse_permission("read").unwrap(), PERMISSION_READ);
        assert_eq!(parse_permission("ALL").unwrap(), 31);
        assert!(parse_permission("write").is_err());
        assert_eq!(permission_to_string(PERMISSION_READ | PERMISSION_DELETE), "Read, Delete");
        assert_eq!(permission_to_string(PERMISSION_NONE), "None");
    }

    #[test]
    fn test_builtin_roles() {
        let security = manager();
        let schema = Resource::generic(ResourceGeneric::Schema);
        let person = Resource::specific(ResourceGeneric::Class, "Person");

        assert!(security.role_allows(ADMIN_ROLE, &schema, PERMISSION_DELETE));
        assert!(security.role_allows(WRITER_ROLE, &person, PERMISSION_DELETE));
        assert!(!security.role_allows(WRITER_ROLE, &schema, PERMISSION_DELETE));
        assert!(security.role_allows(READER_ROLE, &person, PERMISSION_READ));
        assert!(!security.role_allows(READER_ROLE, &person, PERMISSION_UPDATE));
    }

    #[test]
    fn test_writer_cannot_manage_security() {
        let security = manager();
        for resource in [Resource::users(), Resource::roles()] {
            assert!(security.role_allows(WRITER_ROLE, &resource, PERMISSION_READ));
            for operation in [PERMISSION_CREATE, PERMISSION_UPDATE, PERMISSION_DELETE] {
                assert!(!security.role_allows(WRITER_ROLE, &resource, operation));
                assert!(!security.role_allows(READER_ROLE, &resource, operation));
            }
            assert!(security.role_allows(ADMIN_ROLE, &resource, PERMISSION_UPDATE));
        }
        assert_eq!(Resource::users().to_string(), "database.class.ouser");
    }

    #[test]
    fn test_specific_rule_overrides_generic() {
        let mut security = manager();
        let person = Resource::specific(ResourceGeneric::Class, "Person");
        security
            .revoke(WRITER_ROLE, &person, PERMISSION_DELETE)
            .unwrap();

        assert!(!security.role_allows(WRITER_ROLE, &person, PERMISSION_DELETE));
        assert!(security.role_allows(WRITER_ROLE, &person, PERMISSION_UPDATE));
        let invoice = Resource::specific(ResourceGeneric::Class, "Invoice");
        assert!(security.role_allows(WRITER_ROLE, &invoice, PERMISSION_DELETE));
    }

    #[test]
    fn test_grant_then_revoke() {
        let mut security = manager();
        let function = Resource::generic(ResourceGeneric::Function);
        assert!(!security.role_allows(READER_ROLE, &function, PERMISSION_EXECUTE));

        security.grant(READER_ROLE, &function, PERMISSION_EXECUTE).unwrap();
        assert!(security.role_allows(READER_ROLE, &function, PERMISSION_EXECUTE));

        security.revoke(READER_ROLE, &function, PERMISSION_NONE).unwrap();
        assert!(security.role_allows(READER_ROLE, &function, PERMISSION_EXECUTE));

        security.revoke(READER_ROLE, &function, PERMISSION_EXECUTE).unwrap();
        assert!(!security.role_allows(READER_ROLE, &function, PERMISSION_EXECUTE));
        assert!(security.role_allows(READER_ROLE, &function, PERMISSION_READ));

        assert!(security.grant("ghost", &function, PERMISSION_READ).is_err());
    }

    #[test]
    fn test_parent_role_delegation() {
        let mut security = manager();
        security.create_role("auditor", Some(READER_ROLE)).unwrap();
        let cluster = Resource::generic(ResourceGeneric::Cluster);
        assert!(security.role_allows("auditor", &cluster, PERMISSION_READ));
        assert!(!security.role_allows("auditor", &cluster, PERMISSION_DELETE));
    }

    #[test]
    fn test_users_and_authentication() {
        let mut security = manager();
        security
            .create_user("alice", "secret", &[READER_ROLE.to_string()])
            .unwrap();
        assert!(security.authenticate("alice", "secret").is_ok());
        assert!(security.authenticate("alice", "wrong").is_err());
        assert!(security.create_user("alice", "x", &[]).is_err());
        assert!(security
            .create_user("bob", "x", &["ghost".to_string()])
            .is_err());

        let person = Resource::specific(ResourceGeneric::Class, "Person");
        assert!(security.user_allows("alice", &person, PERMISSION_READ));
        assert!(!security.user_allows("alice", &person, PERMISSION_CREATE));

        security.set_status("alice", UserStatus::Suspended).unwrap();
        assert!(security.authenticate("alice", "secret").is_err());
        assert!(!security.user_allows("alice", &person, PERMISSION_READ));

        security.drop_user("alice").unwrap();
        assert!(security.drop_user("alice").is_err());
    }
}
