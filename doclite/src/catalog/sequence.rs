// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sequence library
//!
//! Named persisted counters. Names are stored upper-cased. ORDERED sequences
//! persist every value; CACHED sequences reserve a batch of `cache_size`
//! values ahead and persist only the reservation high-water mark, so values
//! handed out from a batch are lost when the database is reopened.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::{CatalogError, CatalogResult};

pub const DEFAULT_START: i64 = 0;
pub const DEFAULT_INCREMENT: i64 = 1;
pub const DEFAULT_CACHE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceType {
    Cached,
    Ordered,
}

impl FromStr for SequenceType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CACHED" => Ok(SequenceType::Cached),
            "ORDERED" => Ok(SequenceType::Ordered),
            other => Err(CatalogError::InvalidArgument(format!(
                "Unknown sequence type '{}'. Valid options: CACHED, ORDERED",
                other
            ))),
        }
    }
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceType::Cached => write!(f, "CACHED"),
            SequenceType::Ordered => write!(f, "ORDERED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SequenceOrder {
    #[default]
    Ascending,
    Descending,
}

/// Optional sequence attributes; `None` means "keep" on update and "default"
/// on create
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceParams {
    pub start: Option<i64>,
    pub increment: Option<i64>,
    pub cache_size: Option<i64>,
    pub limit: Option<i64>,
    /// Remove an existing limit
    pub no_limit: bool,
    pub order: Option<SequenceOrder>,
    pub cycle: Option<bool>,
}

impl SequenceParams {
    pub fn is_empty(&self) -> bool {
        *self == SequenceParams::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    pub sequence_type: SequenceType,
    pub start: i64,
    pub increment: i64,
    pub cache_size: i64,
    pub limit: Option<i64>,
    pub order: SequenceOrder,
    pub cycle: bool,
    value: i64,
    /// Last value covered by the current cache reservation
    reserved: i64,
}

impl Sequence {
    pub fn current(&self) -> i64 {
        self.value
    }

    fn step(&self, from: i64, times: i64) -> Option<i64> {
        let delta = self.increment.checked_mul(times)?;
        match self.order {
            SequenceOrder::Ascending => from.checked_add(delta),
            SequenceOrder::Descending => from.checked_sub(delta),
        }
    }

    fn passes_limit(&self, candidate: i64) -> bool {
        match (self.limit, self.order) {
            (Some(limit), SequenceOrder::Ascending) => candidate > limit,
            (Some(limit), SequenceOrder::Descending) => candidate < limit,
            (None, _) => false,
        }
    }

    fn limit_error(&self) -> CatalogError {
        CatalogError::SequenceLimitReached {
            name: self.name.clone(),
            limit: self.limit.unwrap_or(match self.order {
                SequenceOrder::Ascending => i64::MAX,
                SequenceOrder::Descending => i64::MIN,
            }),
        }
    }

    fn next(&mut self) -> CatalogResult<i64> {
        let candidate = match self.step(self.value, 1) {
            Some(v) if !self.passes_limit(v) => v,
            _ if self.cycle => self.start,
            _ => return Err(self.limit_error()),
        };

        if self.sequence_type == SequenceType::Cached && !self.within_reservation(candidate) {
            self.reserve_from(candidate);
        }
        self.value = candidate;
        Ok(candidate)
    }

    fn within_reservation(&self, candidate: i64) -> bool {
        match self.order {
            SequenceOrder::Ascending => candidate <= self.reserved && candidate > self.value,
            SequenceOrder::Descending => candidate >= self.reserved && candidate < self.value,
        }
    }

    fn reserve_from(&mut self, candidate: i64) {
        let mut end = self
            .step(candidate, self.cache_size - 1)
            .unwrap_or(candidate);
        if let Some(limit) = self.limit {
            if self.passes_limit(end) {
                end = limit;
            }
        }
        log::debug!(
            "Sequence '{}' reserved values {}..={}",
            self.name,
            candidate,
            end
        );
        self.reserved = end;
    }

    fn reset(&mut self) -> i64 {
        self.value = self.start;
        self.reserved = self.start;
        self.start
    }

    fn validate(&self) -> CatalogResult<()> {
        if self.increment <= 0 {
            return Err(CatalogError::InvalidArgument(format!(
                "Sequence increment must be positive, got {}",
                self.increment
            )));
        }
        if self.cache_size <= 0 {
            return Err(CatalogError::InvalidArgument(format!(
                "Sequence cache size must be positive, got {}",
                self.cache_size
            )));
        }
        if self.passes_limit(self.start) {
            return Err(CatalogError::InvalidArgument(format!(
                "Sequence start {} is beyond its limit {:?}",
                self.start, self.limit
            )));
        }
        Ok(())
    }
}

/// Library of all sequences of a database
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceLibrary {
    sequences: BTreeMap<String, Sequence>,
}

impl SequenceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_sequence(
        &mut self,
        name: &str,
        sequence_type: SequenceType,
        params: &SequenceParams,
    ) -> CatalogResult<&Sequence> {
        let key = name.to_uppercase();
        if self.sequences.contains_key(&key) {
            return Err(CatalogError::already_exists("Sequence", key));
        }
        if sequence_type == SequenceType::Ordered && params.cache_size.is_some() {
            return Err(CatalogError::InvalidArgument(
                "CACHE can only be used with CACHED sequences".to_string(),
            ));
        }

        let start = params.start.unwrap_or(DEFAULT_START);
        let sequence = Sequence {
            name: key.clone(),
            sequence_type,
            start,
            increment: params.increment.unwrap_or(DEFAULT_INCREMENT),
            cache_size: params.cache_size.unwrap_or(DEFAULT_CACHE),
            limit: if params.no_limit { None } else { params.limit },
            order: params.order.unwrap_or_default(),
            cycle: params.cycle.unwrap_or(false),
            value: start,
            reserved: start,
        };
        sequence.validate()?;

        log::info!("Creating {} sequence '{}'", sequence_type, key);
        Ok(self.sequences.entry(key).or_insert(sequence))
    }

    /// Apply changed attributes; returns whether anything changed
    pub fn update_sequence(&mut self, name: &str, params: &SequenceParams) -> CatalogResult<bool> {
        let sequence = self
            .sequences
            .get_mut(&name.to_uppercase())
            .ok_or_else(|| CatalogError::not_found("Sequence", name.to_uppercase()))?;

        if params.cache_size.is_some() && sequence.sequence_type == SequenceType::Ordered {
            return Err(CatalogError::InvalidArgument(
                "CACHE can only be used with CACHED sequences".to_string(),
            ));
        }

        let mut updated = sequence.clone();
        if let Some(start) = params.start {
            updated.start = start;
        }
        if let Some(increment) = params.increment {
            updated.increment = increment;
        }
        if let Some(cache_size) = params.cache_size {
            updated.cache_size = cache_size;
        }
        if params.no_limit {
            updated.limit = None;
        } else if let Some(limit) = params.limit {
            updated.limit = Some(limit);
        }
        if let Some(order) = params.order {
            updated.order = order;
        }
        if let Some(cycle) = params.cycle {
            updated.cycle = cycle;
        }
        updated.validate()?;

        if updated.start != sequence.start {
            updated.reset();
        } else if updated.cache_size != sequence.cache_size || updated.order != sequence.order {
            // the current reservation no longer matches the new shape
            updated.reserved = updated.value;
        }

        let changed = updated != *sequence;
        *sequence = updated;
        Ok(changed)
    }

    /// Drop a sequence; dropping an unknown sequence is not an error here
    pub fn drop_sequence(&mut self, name: &str) -> bool {
        let dropped = self.sequences.remove(&name.to_uppercase()).is_some();
        if dropped {
            log::info!("Dropped sequence '{}'", name.to_uppercase());
        }
        dropped
    }

    pub fn get(&self, name: &str) -> Option<&Sequence> {
        self.sequences.get(&name.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    fn get_mut(&mut self, name: &str) -> CatalogResult<&mut Sequence> {
        self.sequences
            .get_mut(&name.to_uppercase())
            .ok_or_else(|| CatalogError::not_found("Sequence", name.to_uppercase()))
    }

    pub fn next(&mut self, name: &str) -> CatalogResult<i64> {
        self.get_mut(name)?.next()
    }

    pub fn current(&self, name: &str) -> CatalogResult<i64> {
        self.get(name)
            .map(Sequence::current)
            .ok_or_else(|| CatalogError::not_found("Sequence", name.to_uppercase()))
    }

    /// Called after a snapshot is restored: cached values not yet handed out
    /// are skipped
    pub fn on_load(&mut self) {
        for sequence in self.sequences.values_mut() {
            if sequence.sequence_type == SequenceType::Cached {
                sequence.value = sequence.reserved;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SequenceParams {
        SequenceParams::default()
    }

    #[test]
    fn test_ordered_values() {
        let mut library = SequenceLibrary::new();
        library.create_sequence("mySeq", SequenceType::Ordered, &params()).unwrap();
        assert_eq!(library.len(), 1);
        assert!(library.get("MYSEQ").is_some());
        assert_eq!(library.current("MYSEQ").unwrap(), 0);
        assert_eq!(library.next("myseq").unwrap(), 1);
        assert_eq!(library.next("myseq").unwrap(), 2);
        assert_eq!(library.current("myseq").unwrap(), 2);
    }

    #[test]
    fn test_increment_applies() {
        let mut library = SequenceLibrary::new();
        let p = SequenceParams {
            increment: Some(30),
            ..params()
        };
        library.create_sequence("s", SequenceType::Cached, &p).unwrap();
        assert_eq!(library.next("s").unwrap(), 30);
        assert_eq!(library.next("s").unwrap(), 60);
        assert_eq!(library.next("s").unwrap(), 90);
    }

    #[test]
    fn test_upper_limit_cycles_to_start() {
        let mut library = SequenceLibrary::new();
        let p = SequenceParams {
            increment: Some(10),
            limit: Some(30),
            cycle: Some(true),
            ..params()
        };
        library.create_sequence("s", SequenceType::Ordered, &p).unwrap();
        let values: Vec<i64> = (0..4).map(|_| library.next("s").unwrap()).collect();
        assert_eq!(values, vec![10, 20, 30, 0]);
    }

    #[test]
    fn test_descending_limit_cycles_to_start() {
        let mut library = SequenceLibrary::new();
        let p = SequenceParams {
            start: Some(30),
            increment: Some(10),
            limit: Some(0),
            order: Some(SequenceOrder::Descending),
            cycle: Some(true),
            ..params()
        };
        library.create_sequence("s", SequenceType::Cached, &p).unwrap();
        assert_eq!(library.current("s").unwrap(), 30);
        let values: Vec<i64> = (0..4).map(|_| library.next("s").unwrap()).collect();
        assert_eq!(values, vec![20, 10, 0, 30]);
    }

    #[test]
    fn test_limit_without_cycle_fails() {
        let mut library = SequenceLibrary::new();
        let p = SequenceParams {
            limit: Some(2),
            ..params()
        };
        library.create_sequence("s", SequenceType::Ordered, &p).unwrap();
        library.next("s").unwrap();
        library.next("s").unwrap();
        assert!(matches!(
            library.next("s"),
            Err(CatalogError::SequenceLimitReached { limit: 2, .. })
        ));
        assert_eq!(library.current("s").unwrap(), 2);
    }

    #[test]
    fn test_cached_sequence_over_cache() {
        let mut library = SequenceLibrary::new();
        let p = SequenceParams {
            cache_size: Some(3),
            ..params()
        };
        library.create_sequence("s", SequenceType::Cached, &p).unwrap();
        let values: Vec<i64> = (0..4).map(|_| library.next("s").unwrap()).collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_cached_values_skip_after_reload() {
        let mut library = SequenceLibrary::new();
        let p = SequenceParams {
            cache_size: Some(5),
            ..params()
        };
        library.create_sequence("s", SequenceType::Cached, &p).unwrap();
        assert_eq!(library.next("s").unwrap(), 1);

        library.on_load();
        assert_eq!(library.next("s").unwrap(), 6);
    }

    #[test]
    fn test_duplicate_and_invalid_definitions() {
        let mut library = SequenceLibrary::new();
        library.create_sequence("s", SequenceType::Ordered, &params()).unwrap();
        assert!(library.create_sequence("S", SequenceType::Ordered, &params()).is_err());

        let ordered_with_cache = SequenceParams {
            cache_size: Some(10),
            ..params()
        };
        assert!(library
            .create_sequence("t", SequenceType::Ordered, &ordered_with_cache)
            .is_err());

        let zero_increment = SequenceParams {
            increment: Some(0),
            ..params()
        };
        assert!(library
            .create_sequence("u", SequenceType::Ordered, &zero_increment)
            .is_err());
    }

    #[test]
    fn test_update_start_resets_value() {
        let mut library = SequenceLibrary::new();
        library.create_sequence("s", SequenceType::Ordered, &params()).unwrap();
        library.next("s").unwrap();

        let p = SequenceParams {
            start: Some(100),
            ..params()
        };
        assert!(library.update_sequence("s", &p).unwrap());
        assert_eq!(library.current("s").unwrap(), 100);
        assert_eq!(library.next("s").unwrap(), 101);

        assert!(!library.update_sequence("s", &params()).unwrap());
        assert!(library.update_sequence("missing", &p).is_err());
    }

    #[test]
    fn test_drop_is_idempotent() {
        let mut library = SequenceLibrary::new();
        library.create_sequence("s", SequenceType::Ordered, &params()).unwrap();
        assert!(library.drop_sequence("S"));
        assert!(!library.drop_sequence("S"));
        assert!(library.is_empty());
    }
}
