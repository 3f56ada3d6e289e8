// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transaction executors

pub mod control;
pub mod transactional;

pub use control::*;
pub use transactional::*;
