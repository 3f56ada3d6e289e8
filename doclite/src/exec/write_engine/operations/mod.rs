// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Truncate executors

pub mod truncate_class;
pub mod truncate_cluster;
pub mod truncate_record;

pub use truncate_class::*;
pub use truncate_cluster::*;
pub use truncate_record::*;
