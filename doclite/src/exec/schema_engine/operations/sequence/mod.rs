// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sequence DDL executors

pub mod alter_sequence;
pub mod create_sequence;
pub mod drop_sequence;

pub use alter_sequence::*;
pub use create_sequence::*;
pub use drop_sequence::*;
