// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog collaborators
//!
//! This module holds the in-process engine objects the SQL commands act on:
//! - Clusters and the records they hold
//! - Schema classes and their cluster ownership
//! - Automatic and manual indexes
//! - Sequences and stored functions
//! - Users, roles and permission rules

pub mod cluster;
pub mod error;
pub mod function;
pub mod index;
pub mod schema;
pub mod security;
pub mod sequence;

pub use cluster::{Cluster, ClusterManager, ClusterStatus, ConflictStrategy};
pub use error::{CatalogError, CatalogResult};
pub use function::{FunctionLibrary, StoredFunction};
pub use index::{Index, IndexDefinition, IndexManager};
pub use schema::{Schema, SchemaClass, EDGE_CLASS, VERTEX_CLASS};
pub use security::{Resource, ResourceGeneric, Role, SecurityManager, User, UserStatus};
pub use sequence::{Sequence, SequenceLibrary, SequenceOrder, SequenceParams, SequenceType};
