// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Schema Engine - DDL Operations
//
// This module handles the schema definition commands (CREATE, DROP, ALTER) for
// clusters, sequences and functions, index rebuilds, and security (users and
// permissions).

pub mod operations;

pub use operations::*;
