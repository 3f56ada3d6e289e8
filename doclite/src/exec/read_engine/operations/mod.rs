// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Read-only executors

pub mod explain;
pub mod find_references;

pub use explain::*;
pub use find_references::*;
