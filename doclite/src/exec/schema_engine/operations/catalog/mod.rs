// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cluster DDL executors

pub mod alter_cluster;
pub mod create_cluster;
pub mod drop_cluster;

pub use alter_cluster::*;
pub use create_cluster::*;
pub use drop_cluster::*;
