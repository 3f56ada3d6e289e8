// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Transaction Engine - BEGIN, COMMIT, ROLLBACK and the TRANSACTIONAL wrapper
//
// The executors here only request transaction boundaries; the database applies
// them once the command finishes, so a failed command never leaves a half-open
// transaction behind.

pub mod operations;

pub use operations::*;
