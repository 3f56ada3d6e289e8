// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Read Engine - commands that inspect data without changing it

pub mod operations;

pub use operations::*;
