// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Database sessions

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::User;

/// Name reported for the embedded root session
pub const ROOT_USER: &str = "root";

/// An authenticated connection to a database
///
/// Permission checks run against the user's current roles in the catalog, so
/// a session of a dropped user is denied every protected command. The root
/// session bypasses permission checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: Uuid,
    user: String,
    roles: Vec<String>,
    root: bool,
    opened_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn for_user(user: &User) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: user.name.clone(),
            roles: user.roles.clone(),
            root: false,
            opened_at: Utc::now(),
        }
    }

    pub(crate) fn root() -> Self {
        Self {
            id: Uuid::new_v4(),
            user: ROOT_USER.to_string(),
            roles: Vec::new(),
            root: true,
            opened_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Roles held when the session was opened
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}
