// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Record storage primitives
//!
//! This module provides:
//! - Value type system for record fields
//! - Record identifiers and records
//! - Pluggable storage driver trait for persisting the database snapshot

pub mod persistent;
pub mod types;
pub mod value;

pub use persistent::{create_driver, StorageDriver, StorageTree, StorageType};
pub use types::{Record, RecordId, StorageError, StorageResult};
pub use value::Value;
