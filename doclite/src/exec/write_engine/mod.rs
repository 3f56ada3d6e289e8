// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Write Engine - record deletion commands
//
// TRUNCATE CLASS, TRUNCATE CLUSTER and TRUNCATE RECORD. Every deleted record is
// removed from the indexes and reported to live subscribers once the command
// commits.

pub mod operations;

pub use operations::*;

use crate::catalog::CatalogError;
use crate::exec::ExecutionContext;
use crate::live::RecordChange;

/// Truncate the given clusters, returning the number of records removed
pub(crate) fn truncate_clusters(
    context: &mut ExecutionContext<'_>,
    cluster_ids: &[i32],
) -> Result<usize, CatalogError> {
    let mut deleted = 0;
    for &id in cluster_ids {
        if context.state().clusters.record_count(id) == 0 {
            continue;
        }
        let removed = context.state_mut().truncate_cluster(id)?;
        deleted += removed.len();
        for record in removed {
            context.record_change(RecordChange::deleted(record));
        }
    }
    context.stats_mut().records_deleted += deleted;
    Ok(deleted)
}
