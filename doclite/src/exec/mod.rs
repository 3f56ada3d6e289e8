// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command execution engine
//!
//! Every parsed statement is resolved to an executor implementing
//! [`StatementExecutor`]. Executors are grouped by what they touch: schema and
//! security changes, record deletion, reads, live queries and transactions.

pub mod context;
pub mod error;
pub mod executor;
pub mod live_engine;
pub mod read_engine;
pub mod result;
pub mod schema_engine;
pub mod statement_base;
pub mod transaction_engine;
pub mod write_engine;

pub use context::{ExecutionContext, ExecutionStats};
pub use error::ExecutionError;
pub use executor::{executor_for, CommandDispatcher, DelegateExecutor};
pub use result::{CollectingListener, CountingListener, QueryResult, ResultListener, Row};
pub use statement_base::{OperationType, Permission, QuorumType, StatementExecutor};

use crate::ast::ClusterRef;
use crate::catalog::security::{Resource, ResourceGeneric};
use crate::catalog::{CatalogError, ClusterManager};

/// Resolve a cluster reference to an existing cluster id
pub(crate) fn resolve_cluster(clusters: &ClusterManager, cluster: &ClusterRef) -> Option<i32> {
    match cluster {
        ClusterRef::Id(id) => clusters.get(*id).map(|c| c.id),
        ClusterRef::Name(name) => clusters.id_of(name),
    }
}

pub(crate) fn require_cluster(clusters: &ClusterManager, cluster: &ClusterRef) -> Result<i32, CatalogError> {
    resolve_cluster(clusters, cluster).ok_or_else(|| CatalogError::not_found("Cluster", cluster.to_string()))
}

/// Security resource of one cluster, named after the cluster even when it is
/// referenced by id. An unknown id falls back to the generic cluster resource.
pub(crate) fn cluster_resource(clusters: &ClusterManager, cluster: &ClusterRef) -> Resource {
    let name = match cluster {
        ClusterRef::Name(name) => Some(name.as_str()),
        ClusterRef::Id(id) => clusters.name_of(*id),
    };
    match name {
        Some(name) => Resource::specific(ResourceGeneric::Cluster, name),
        None => Resource::generic(ResourceGeneric::Cluster),
    }
}

/// Names of the given cluster ids, skipping unknown ids
pub(crate) fn cluster_names(clusters: &ClusterManager, ids: &[i32]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| clusters.name_of(*id).map(str::to_string))
        .collect()
}
