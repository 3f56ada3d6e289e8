// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Live query subscriptions
//!
//! A subscriber registers interest in a class and receives record events for
//! that class and its subclasses over an unbounded channel. Tokens are
//! assigned monotonically starting at 1 and never reused.

use std::collections::BTreeMap;
use tokio::sync::mpsc::UnboundedSender;

use crate::catalog::Schema;
use crate::storage::Record;

/// Kind of change carried by a live event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Deleted,
}

/// A committed record change waiting to be delivered
#[derive(Debug, Clone, PartialEq)]
pub struct RecordChange {
    pub kind: ChangeKind,
    pub record: Record,
}

impl RecordChange {
    pub fn created(record: Record) -> Self {
        Self {
            kind: ChangeKind::Created,
            record,
        }
    }

    pub fn deleted(record: Record) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            record,
        }
    }
}

/// Message delivered to a live query subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    Created { token: i32, record: Record },
    Deleted { token: i32, record: Record },
    /// Final message after the subscription was cancelled
    Unsubscribed { token: i32 },
}

impl LiveEvent {
    pub fn token(&self) -> i32 {
        match self {
            LiveEvent::Created { token, .. }
            | LiveEvent::Deleted { token, .. }
            | LiveEvent::Unsubscribed { token } => *token,
        }
    }
}

struct Subscription {
    class_name: String,
    sender: UnboundedSender<LiveEvent>,
}

#[derive(Default)]
pub struct LiveQueryRegistry {
    next_token: i32,
    subscriptions: BTreeMap<i32, Subscription>,
}

impl LiveQueryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, class_name: &str, sender: UnboundedSender<LiveEvent>) -> i32 {
        self.next_token += 1;
        let token = self.next_token;
        log::debug!("Live query {} subscribed to class '{}'", token, class_name);
        self.subscriptions.insert(
            token,
            Subscription {
                class_name: class_name.to_string(),
                sender,
            },
        );
        token
    }

    /// Cancel a subscription; returns false when the token is unknown
    pub fn unsubscribe(&mut self, token: i32) -> bool {
        match self.subscriptions.remove(&token) {
            Some(subscription) => {
                // the receiver may already be gone
                let _ = subscription.sender.send(LiveEvent::Unsubscribed { token });
                log::debug!("Live query {} unsubscribed", token);
                true
            }
            None => {
                log::warn!("Live query token {} is not subscribed", token);
                false
            }
        }
    }

    pub fn is_subscribed(&self, token: i32) -> bool {
        self.subscriptions.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Deliver committed changes to every subscriber whose class matches
    pub fn dispatch(&mut self, changes: &[RecordChange], schema: &Schema) {
        if changes.is_empty() || self.subscriptions.is_empty() {
            return;
        }

        let mut closed = Vec::new();
        for (token, subscription) in &self.subscriptions {
            for change in changes {
                let matches = change
                    .record
                    .class_name
                    .as_deref()
                    .map(|class| schema.is_sub_class_of(class, &subscription.class_name))
                    .unwrap_or(false);
                if !matches {
                    continue;
                }
                let event = match change.kind {
                    ChangeKind::Created => LiveEvent::Created {
                        token: *token,
                        record: change.record.clone(),
                    },
                    ChangeKind::Deleted => LiveEvent::Deleted {
                        token: *token,
                        record: change.record.clone(),
                    },
                };
                if subscription.sender.send(event).is_err() {
                    closed.push(*token);
                    break;
                }
            }
        }

        for token in closed {
            log::warn!("Dropping live query {}: receiver closed", token);
            self.subscriptions.remove(&token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecordId;
    use tokio::sync::mpsc::unbounded_channel;

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.create_class("Person", &[], vec![1], false).unwrap();
        schema.create_class("Employee", &["Person"], vec![2], false).unwrap();
        schema.create_class("Invoice", &[], vec![3], false).unwrap();
        schema
    }

    fn record(cluster: i32, class: &str) -> Record {
        Record::new(RecordId::new(cluster, 0), Some(class.to_string()), BTreeMap::new())
    }

    #[test]
    fn test_tokens_are_monotonic() {
        let mut registry = LiveQueryRegistry::new();
        let (tx, _rx) = unbounded_channel();
        assert_eq!(registry.subscribe("Person", tx.clone()), 1);
        assert_eq!(registry.subscribe("Person", tx.clone()), 2);
        assert!(registry.unsubscribe(1));
        assert_eq!(registry.subscribe("Person", tx), 3);
        assert!(!registry.unsubscribe(1));
    }

    #[test]
    fn test_dispatch_is_polymorphic() {
        let schema = schema();
        let mut registry = LiveQueryRegistry::new();
        let (tx, mut rx) = unbounded_channel();
        let token = registry.subscribe("Person", tx);

        registry.dispatch(
            &[
                RecordChange::created(record(2, "Employee")),
                RecordChange::created(record(3, "Invoice")),
                RecordChange::deleted(record(1, "Person")),
            ],
            &schema,
        );

        assert!(matches!(rx.try_recv(), Ok(LiveEvent::Created { token: t, .. }) if t == token));
        assert!(matches!(rx.try_recv(), Ok(LiveEvent::Deleted { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_receivers_are_dropped() {
        let schema = schema();
        let mut registry = LiveQueryRegistry::new();
        let (tx, rx) = unbounded_channel();
        registry.subscribe("Person", tx);
        drop(rx);

        registry.dispatch(&[RecordChange::created(record(1, "Person"))], &schema);
        assert!(registry.is_empty());
    }
}
