// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Security operations (CREATE/DROP USER, GRANT, REVOKE)

pub mod create_user;
pub mod drop_user;
pub mod grant;
pub mod revoke;

pub use create_user::*;
pub use drop_user::*;
pub use grant::*;
pub use revoke::*;
