// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Authentication and permission checks for non-root sessions

#[path = "testutils/mod.rs"]
mod testutils;

use doclite::{CatalogError, ExecutionError, UserStatus, Value};
use testutils::DbFixture;

fn fixture_with_users() -> DbFixture {
    let fixture = DbFixture::new();
    fixture.assert_command_succeeds("CREATE USER rita IDENTIFIED BY 'read only' ROLE reader");
    fixture.assert_command_succeeds("CREATE USER walt IDENTIFIED BY w4lt ROLE [writer]");
    fixture
}

#[test]
fn test_authentication() {
    let fixture = fixture_with_users();
    let session = fixture.db.open_session("rita", "read only").unwrap();
    assert_eq!(session.user(), "rita");
    assert_eq!(session.roles(), &["reader".to_string()]);
    assert!(!session.is_root());

    assert!(matches!(
        fixture.db.open_session("rita", "wrong"),
        Err(ExecutionError::Catalog(CatalogError::Security(_)))
    ));
    assert!(fixture.db.open_session("nobody", "x").is_err());
}

#[test]
fn test_reader_cannot_change_schema() {
    let fixture = fixture_with_users();
    let reader = fixture.db.open_session("rita", "read only").unwrap();

    match fixture.db.command(&reader, "CREATE CLUSTER forbidden") {
        Err(ExecutionError::PermissionDenied {
            user,
            permission,
            resource,
        }) => {
            assert_eq!(user, "rita");
            assert_eq!(permission, "Create");
            assert_eq!(resource, "database.cluster");
        }
        other => panic!("expected permission denied, got {:?}", other),
    }
    fixture
        .db
        .with_state(&fixture.root, |state| assert!(state.clusters.id_of("forbidden").is_none()));

    // reads stay allowed
    fixture.db.command(&reader, "FIND REFERENCES #0:0").unwrap();
}

#[test]
fn test_grant_and_revoke() {
    let fixture = fixture_with_users();
    fixture.populate("Invoice", &[], 2);
    let reader = fixture.db.open_session("rita", "read only").unwrap();

    assert!(matches!(
        fixture.db.command(&reader, "TRUNCATE CLASS Invoice"),
        Err(ExecutionError::PermissionDenied { .. })
    ));

    fixture.assert_command_succeeds("GRANT DELETE ON database.class.Invoice TO reader");
    let result = fixture.db.command(&reader, "TRUNCATE CLASS Invoice").unwrap();
    assert_eq!(result.value, Some(Value::Integer(2)));

    fixture.assert_command_succeeds("REVOKE DELETE ON database.class.Invoice FROM reader");
    assert!(fixture.db.command(&reader, "TRUNCATE CLASS Invoice").is_err());
}

#[test]
fn test_writer_permissions() {
    let fixture = fixture_with_users();
    let writer = fixture.db.open_session("walt", "w4lt").unwrap();

    fixture.db.command(&writer, "CREATE CLUSTER scratch").unwrap();
    fixture.db.command(&writer, "TRUNCATE CLUSTER scratch").unwrap();
    assert!(matches!(
        fixture.db.command(&writer, "DROP USER rita"),
        Err(ExecutionError::PermissionDenied { .. })
    ));
    assert!(matches!(
        fixture.db.command(&writer, "CREATE FUNCTION f 'return 1'"),
        Err(ExecutionError::PermissionDenied { .. })
    ));
}

#[test]
fn test_writer_cannot_escalate_privileges() {
    let fixture = fixture_with_users();
    let writer = fixture.db.open_session("walt", "w4lt").unwrap();

    match fixture
        .db
        .command(&writer, "CREATE USER mallory IDENTIFIED BY pw ROLE admin")
    {
        Err(ExecutionError::PermissionDenied {
            permission,
            resource,
            ..
        }) => {
            assert_eq!(permission, "Create");
            assert_eq!(resource, "database.class.ouser");
        }
        other => panic!("expected permission denied, got {:?}", other),
    }
    assert!(fixture.db.open_session("mallory", "pw").is_err());

    for sql in [
        "GRANT ALL ON * TO writer",
        "REVOKE DELETE ON database.class.Invoice FROM reader",
    ] {
        assert!(
            matches!(
                fixture.db.command(&writer, sql),
                Err(ExecutionError::PermissionDenied { .. })
            ),
            "{} should be denied",
            sql
        );
    }
    // the writer role is unchanged
    assert!(matches!(
        fixture.db.command(&writer, "DROP USER rita"),
        Err(ExecutionError::PermissionDenied { .. })
    ));

    // granting user management explicitly opens it up
    fixture.assert_command_succeeds("GRANT CREATE ON database.class.OUser TO writer");
    fixture
        .db
        .command(&writer, "CREATE USER helper IDENTIFIED BY pw ROLE reader")
        .unwrap();
    assert!(fixture.db.open_session("helper", "pw").is_ok());
}

#[test]
fn test_specific_cluster_rule_applies_to_cluster_ids() {
    let fixture = fixture_with_users();
    fixture.populate("Secret", &[], 3);
    let secret_id = fixture
        .db
        .with_state(&fixture.root, |state| state.clusters.id_of("secret"))
        .unwrap();
    fixture.assert_command_succeeds("REVOKE DELETE ON database.cluster.secret FROM writer");
    let writer = fixture.db.open_session("walt", "w4lt").unwrap();

    let by_id = [
        format!("TRUNCATE CLUSTER {}", secret_id),
        format!("DROP CLUSTER {}", secret_id),
        format!("TRUNCATE RECORD #{}:0", secret_id),
    ];
    for sql in ["TRUNCATE CLUSTER secret".to_string()].iter().chain(by_id.iter()) {
        match fixture.db.command(&writer, sql) {
            Err(ExecutionError::PermissionDenied { resource, .. }) => {
                assert_eq!(resource, "database.cluster.secret", "{}", sql)
            }
            other => panic!("expected permission denied for {}, got {:?}", sql, other),
        }
    }
    let rid = doclite::RecordId::new(secret_id, 1);
    assert!(matches!(
        fixture.db.delete_record(&writer, &rid),
        Err(ExecutionError::PermissionDenied { .. })
    ));
    assert_eq!(fixture.count_records("secret"), 3);

    // other clusters keep the generic rule
    fixture.db.command(&writer, "CREATE CLUSTER scratch").unwrap();
    let scratch_id = fixture
        .db
        .with_state(&fixture.root, |state| state.clusters.id_of("scratch"))
        .unwrap();
    fixture
        .db
        .command(&writer, &format!("TRUNCATE CLUSTER {}", scratch_id))
        .unwrap();
}

#[test]
fn test_admin_user_management() {
    let fixture = fixture_with_users();
    let admin = fixture.db.open_session("admin", "admin").unwrap();

    fixture.db.command(&admin, "DROP USER walt").unwrap();
    assert!(fixture.db.open_session("walt", "w4lt").is_err());
    assert!(matches!(
        fixture.db.command(&admin, "DROP USER admin"),
        Err(ExecutionError::InvalidCommand(_))
    ));
}

#[test]
fn test_programmatic_api_checks_permissions() {
    let fixture = fixture_with_users();
    fixture.populate("Note", &[], 1);
    let reader = fixture.db.open_session("rita", "read only").unwrap();

    assert!(matches!(
        fixture.db.create_class(&reader, "Sneaky", &[], false),
        Err(ExecutionError::PermissionDenied { .. })
    ));
    assert!(matches!(
        fixture.db.insert(&reader, "Note", Default::default()),
        Err(ExecutionError::PermissionDenied { .. })
    ));
    let (token, _events) = fixture.db.subscribe_live(&reader, "Note").unwrap();
    assert!(token >= 0);
}

#[test]
fn test_custom_role_inherits_parent_rules() {
    let fixture = fixture_with_users();
    fixture.db.create_role(&fixture.root, "auditor", Some("reader")).unwrap();
    fixture.assert_command_succeeds("GRANT DELETE ON database.cluster.archive TO auditor");
    fixture.assert_command_succeeds("CREATE CLUSTER archive");
    fixture.assert_command_succeeds("CREATE USER ada IDENTIFIED BY pw ROLE auditor");
    let auditor = fixture.db.open_session("ada", "pw").unwrap();

    // read rules come from the reader parent
    fixture.db.command(&auditor, "FIND REFERENCES #0:0").unwrap();
    fixture.db.command(&auditor, "TRUNCATE CLUSTER archive").unwrap();
    assert!(matches!(
        fixture.db.command(&auditor, "CREATE CLUSTER other"),
        Err(ExecutionError::PermissionDenied { .. })
    ));

    assert!(matches!(
        fixture.db.create_role(&fixture.root, "Auditor", None),
        Err(ExecutionError::Catalog(CatalogError::AlreadyExists { .. }))
    ));
    let writer = fixture.db.open_session("walt", "w4lt").unwrap();
    assert!(matches!(
        fixture.db.create_role(&writer, "shadow", Some("admin")),
        Err(ExecutionError::PermissionDenied { .. })
    ));
}

#[test]
fn test_passwords_and_suspension() {
    let fixture = fixture_with_users();
    let writer = fixture.db.open_session("walt", "w4lt").unwrap();

    fixture.db.set_password(&writer, "walt", "n3w").unwrap();
    assert!(fixture.db.open_session("walt", "w4lt").is_err());
    let writer = fixture.db.open_session("walt", "n3w").unwrap();
    assert!(matches!(
        fixture.db.set_password(&writer, "rita", "x"),
        Err(ExecutionError::PermissionDenied { .. })
    ));
    assert!(fixture.db.set_password(&writer, "walt", "").is_err());

    assert!(matches!(
        fixture.db.set_user_status(&writer, "rita", UserStatus::Suspended),
        Err(ExecutionError::PermissionDenied { .. })
    ));
    fixture
        .db
        .set_user_status(&fixture.root, "walt", UserStatus::Suspended)
        .unwrap();
    assert!(fixture.db.open_session("walt", "n3w").is_err());
    // an open session of a suspended user is denied protected commands
    assert!(matches!(
        fixture.db.command(&writer, "CREATE CLUSTER late"),
        Err(ExecutionError::PermissionDenied { .. })
    ));

    fixture
        .db
        .set_user_status(&fixture.root, "walt", UserStatus::Active)
        .unwrap();
    assert!(fixture.db.open_session("walt", "n3w").is_ok());

    let admin = fixture.db.open_session("admin", "admin").unwrap();
    assert!(matches!(
        fixture.db.set_user_status(&admin, "admin", UserStatus::Suspended),
        Err(ExecutionError::InvalidCommand(_))
    ));
}
