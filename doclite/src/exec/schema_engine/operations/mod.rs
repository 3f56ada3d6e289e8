// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema operations modules

pub mod catalog;
pub mod create_function;
pub mod rebuild_index;
pub mod security;
pub mod sequence;

pub use catalog::*;
pub use create_function::*;
pub use rebuild_index::*;
pub use security::*;
pub use sequence::*;
