// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! FIND REFERENCES executor
//!
//! Scans every record of the target clusters and reports, for each requested
//! record id, the records that link to it at any depth of lists and maps.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{FindReferencesStatement, ReferenceTarget};
use crate::catalog::security::{Resource, ResourceGeneric, PERMISSION_READ};
use crate::catalog::CatalogError;
use crate::db::state::EngineState;
use crate::exec::{
    cluster_names, CollectingListener, ExecutionContext, ExecutionError, OperationType, Permission,
    QueryResult, ResultListener, Row, StatementExecutor,
};
use crate::storage::{RecordId, Value};

/// Executor for FIND REFERENCES statements
pub struct FindReferencesExecutor {
    statement: FindReferencesStatement,
}

impl FindReferencesExecutor {
    pub fn new(statement: FindReferencesStatement) -> Self {
        Self { statement }
    }

    fn target_clusters(&self, state: &EngineState) -> Result<Vec<i32>, CatalogError> {
        if self.statement.targets.is_empty() {
            return Ok(state.clusters.ids());
        }
        let mut ids = BTreeSet::new();
        for target in &self.statement.targets {
            match target {
                ReferenceTarget::Class(name) => ids.extend(state.schema.cluster_ids(name, true)?),
                ReferenceTarget::Cluster(name) => {
                    let id = state
                        .clusters
                        .id_of(name)
                        .ok_or_else(|| CatalogError::not_found("Cluster", name.as_str()))?;
                    ids.insert(id);
                }
            }
        }
        Ok(ids.into_iter().collect())
    }
}

impl StatementExecutor for FindReferencesExecutor {
    fn syntax(&self) -> &'static str {
        "FIND REFERENCES <rid> | [<rid>, ...] [[<class> | CLUSTER:<name>, ...]]"
    }

    fn operation_type(&self) -> OperationType {
        OperationType::Read
    }

    fn operation_description(&self) -> String {
        format!("FIND REFERENCES to {} records", self.statement.rids.len())
    }

    fn is_idempotent(&self) -> bool {
        true
    }

    fn involved_clusters(&self, state: &EngineState) -> Vec<String> {
        self.target_clusters(state)
            .map(|ids| cluster_names(&state.clusters, &ids))
            .unwrap_or_default()
    }

    fn required_permission(&self, _state: &EngineState) -> Option<Permission> {
        Some(Permission::new(
            Resource::generic(ResourceGeneric::Cluster),
            PERMISSION_READ,
        ))
    }

    fn execute(&self, context: &mut ExecutionContext<'_>) -> Result<QueryResult, ExecutionError> {
        let state = context.state();
        let cluster_ids = self.target_clusters(state)?;

        let targets: BTreeSet<RecordId> = self.statement.rids.iter().copied().collect();
        let mut referrers: BTreeMap<RecordId, BTreeSet<RecordId>> =
            targets.iter().map(|rid| (*rid, BTreeSet::new())).collect();

        let mut scanned = 0;
        let mut links = Vec::new();
        for id in cluster_ids {
            let Some(cluster) = state.clusters.get(id) else {
                continue;
            };
            for record in cluster.records() {
                scanned += 1;
                links.clear();
                record.fields.values().for_each(|v| v.collect_links(&mut links));
                for link in &links {
                    if let Some(found) = referrers.get_mut(link) {
                        found.insert(record.rid);
                    }
                }
            }
        }
        log::debug!("FIND REFERENCES scanned {} records", scanned);
        context.stats_mut().records_scanned += scanned;

        let mut listener = CollectingListener::new();
        let mut emitted = BTreeSet::new();
        for rid in &self.statement.rids {
            if !emitted.insert(*rid) {
                continue;
            }
            let referred_by = referrers
                .remove(rid)
                .unwrap_or_default()
                .into_iter()
                .map(Value::Link)
                .collect::<Vec<_>>();
            let row = Row::new()
                .with("rid", Value::Link(*rid))
                .with("referredBy", Value::List(referred_by));
            if !listener.on_result(row) {
                break;
            }
        }
        listener.end();
        Ok(listener.result())
    }
}
