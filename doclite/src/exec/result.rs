// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command results and result accumulation helpers

use serde_json::json;
use std::time::Duration;

use crate::storage::Value;

/// One result row; columns keep their insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column append
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a column, replacing an existing one with the same name
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn columns(&self) -> &[(String, Value)] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.columns
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

/// Result of executing one command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub rows: Vec<Row>,
    /// Scalar outcome (count, id, flag) when the command has one
    pub value: Option<Value>,
    pub elapsed: Duration,
}

impl QueryResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_row(row: Row) -> Self {
        Self {
            rows: vec![row],
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The scalar value, or the only column of the only row
    pub fn single_value(&self) -> Option<&Value> {
        if let Some(value) = &self.value {
            return Some(value);
        }
        match self.rows.as_slice() {
            [row] if row.columns().len() == 1 => Some(&row.columns()[0].1),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.value.is_none()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "rows": self.rows.iter().map(Row::to_json).collect::<Vec<_>>(),
            "value": self.value.as_ref().map(Value::to_json),
            "elapsed_ms": self.elapsed.as_secs_f64() * 1000.0,
        })
    }
}

/// Receives rows as an executor produces them
pub trait ResultListener {
    /// Accept a row; returning false asks the producer to stop
    fn on_result(&mut self, row: Row) -> bool;

    /// Called once after the last row
    fn end(&mut self) {}

    fn result(self) -> QueryResult
    where
        Self: Sized;
}

/// Keeps every row, up to an optional limit
#[derive(Debug, Default)]
pub struct CollectingListener {
    rows: Vec<Row>,
    limit: Option<usize>,
    finished: bool,
}

impl CollectingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ResultListener for CollectingListener {
    fn on_result(&mut self, row: Row) -> bool {
        if let Some(limit) = self.limit {
            if self.rows.len() >= limit {
                return false;
            }
        }
        self.rows.push(row);
        self.limit.map(|l| self.rows.len() < l).unwrap_or(true)
    }

    fn end(&mut self) {
        self.finished = true;
    }

    fn result(self) -> QueryResult {
        QueryResult {
            rows: self.rows,
            value: None,
            elapsed: Duration::default(),
        }
    }
}

/// Counts rows without keeping them
#[derive(Debug, Default)]
pub struct CountingListener {
    count: usize,
}

impl CountingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl ResultListener for CountingListener {
    fn on_result(&mut self, _row: Row) -> bool {
        self.count += 1;
        true
    }

    fn result(self) -> QueryResult {
        QueryResult::new().with_value(self.count)
    }
}
