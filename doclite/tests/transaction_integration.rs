// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Explicit transactions and TRANSACTIONAL commands

#[path = "testutils/mod.rs"]
mod testutils;

use doclite::{ExecutionError, Value};
use testutils::DbFixture;

#[test]
fn test_commit_publishes_changes() {
    let fixture = DbFixture::new();
    let other = fixture.db.root_session();

    fixture.assert_command_succeeds("BEGIN");
    assert!(fixture.db.in_transaction(&fixture.root));
    fixture.assert_command_succeeds("CREATE CLUSTER staged");
    fixture.db.create_class(&fixture.root, "Draft", &[], false).unwrap();
    fixture.insert("Draft", &[("title", Value::from("v1"))]);

    fixture.db.with_state(&other, |state| {
        assert!(state.clusters.id_of("staged").is_none());
        assert!(!state.schema.exists("Draft"));
    });

    fixture.assert_command_succeeds("COMMIT");
    assert!(!fixture.db.in_transaction(&fixture.root));
    fixture.db.with_state(&other, |state| {
        assert!(state.clusters.id_of("staged").is_some());
        assert!(state.schema.exists("Draft"));
    });
    assert_eq!(fixture.count_records("draft"), 1);
}

#[test]
fn test_rollback_discards_changes() {
    let fixture = DbFixture::new();
    fixture.populate("Doc", &[], 3);

    fixture.db.begin(&fixture.root).unwrap();
    let result = fixture.assert_command_succeeds("TRUNCATE CLASS Doc");
    assert_eq!(result.value, Some(Value::Integer(3)));
    assert_eq!(fixture.count_records("doc"), 0);
    fixture.db.rollback(&fixture.root).unwrap();

    assert_eq!(fixture.count_records("doc"), 3);
}

#[test]
fn test_other_sessions_are_blocked_from_writing() {
    let fixture = DbFixture::new();
    let other = fixture.db.root_session();
    fixture.db.begin(&fixture.root).unwrap();

    assert!(matches!(
        fixture.db.command(&other, "CREATE SEQUENCE s"),
        Err(ExecutionError::Transaction(_))
    ));
    assert!(matches!(
        fixture.db.create_class(&other, "Blocked", &[], false),
        Err(ExecutionError::Transaction(_))
    ));
    assert!(matches!(fixture.db.begin(&other), Err(ExecutionError::Transaction(_))));
    // reads of committed state still work
    fixture.db.command(&other, "FIND REFERENCES #0:0").unwrap();

    fixture.db.commit(&fixture.root).unwrap();
    fixture.db.command(&other, "CREATE SEQUENCE s").unwrap();
}

#[test]
fn test_control_errors() {
    let fixture = DbFixture::new();
    assert!(matches!(
        fixture.db.command(&fixture.root, "COMMIT"),
        Err(ExecutionError::Transaction(_))
    ));
    assert!(fixture.db.rollback(&fixture.root).is_err());

    fixture.db.begin(&fixture.root).unwrap();
    assert!(fixture.db.begin(&fixture.root).is_err());
    fixture.db.rollback(&fixture.root).unwrap();
}

#[test]
fn test_only_the_owner_can_end_a_transaction() {
    let fixture = DbFixture::new();
    let other = fixture.db.root_session();
    fixture.db.begin(&fixture.root).unwrap();
    fixture.assert_command_succeeds("CREATE CLUSTER pending");

    for sql in ["COMMIT", "ROLLBACK"] {
        match fixture.db.command(&other, sql) {
            Err(ExecutionError::Transaction(message)) => {
                assert!(message.contains("another session"), "{}", message)
            }
            other => panic!("expected transaction error for {}, got {:?}", sql, other),
        }
    }
    assert!(fixture.db.in_transaction(&fixture.root));

    fixture.db.commit(&fixture.root).unwrap();
    fixture
        .db
        .with_state(&other, |state| assert!(state.clusters.id_of("pending").is_some()));
}

#[test]
fn test_failed_command_inside_transaction_keeps_earlier_work() {
    let fixture = DbFixture::new();
    fixture.db.begin(&fixture.root).unwrap();
    fixture.assert_command_succeeds("CREATE CLUSTER first");
    fixture.assert_command_fails("CREATE CLUSTER FIRST");
    fixture.db.commit(&fixture.root).unwrap();

    fixture
        .db
        .with_state(&fixture.root, |state| assert!(state.clusters.id_of("first").is_some()));
}

#[test]
fn test_transactional_prefix() {
    let fixture = DbFixture::new();
    fixture.populate("Doc", &[], 2);

    let result = fixture.assert_command_succeeds("TRANSACTIONAL TRUNCATE CLUSTER doc");
    assert_eq!(result.value, Some(Value::Integer(2)));
    assert!(!fixture.db.in_transaction(&fixture.root));
    assert_eq!(fixture.count_records("doc"), 0);
}
