//! # Grant Mapping Tests
//!
//! Verifies the deterministic translation from permission tokens to GRANT
//! statements: one statement per token, declaration order preserved, ALL as
//! a single database-level grant, and decode-time rejection of unknown
//! tokens.

use pg_operator::{DatabaseUser, Permission};

#[test]
fn connect_and_create_target_the_database() {
    assert_eq!(
        Permission::Connect.grant_statement("app", "reader"),
        "GRANT CONNECT ON DATABASE app TO reader"
    );
    assert_eq!(
        Permission::Create.grant_statement("app", "writer"),
        "GRANT CREATE ON DATABASE app TO writer"
    );
}

#[test]
fn usage_targets_the_public_schema() {
    assert_eq!(
        Permission::Usage.grant_statement("app", "reader"),
        "GRANT USAGE ON SCHEMA public TO reader"
    );
}

#[test]
fn dml_verbs_target_all_tables_in_public() {
    assert_eq!(
        Permission::Select.grant_statement("app", "reader"),
        "GRANT SELECT ON ALL TABLES IN SCHEMA public TO reader"
    );
    assert_eq!(
        Permission::Insert.grant_statement("app", "writer"),
        "GRANT INSERT ON ALL TABLES IN SCHEMA public TO writer"
    );
    assert_eq!(
        Permission::Update.grant_statement("app", "writer"),
        "GRANT UPDATE ON ALL TABLES IN SCHEMA public TO writer"
    );
    assert_eq!(
        Permission::Delete.grant_statement("app", "writer"),
        "GRANT DELETE ON ALL TABLES IN SCHEMA public TO writer"
    );
}

#[test]
fn all_is_a_single_database_level_grant() {
    // ALL maps to exactly one statement on the database, not one per verb
    assert_eq!(
        Permission::All.grant_statement("app", "admin"),
        "GRANT ALL PRIVILEGES ON DATABASE app TO admin"
    );
}

#[test]
fn declared_order_is_preserved() {
    let user: DatabaseUser = serde_json::from_value(serde_json::json!({
        "name": "reader",
        "permissions": ["CONNECT", "SELECT"]
    }))
    .unwrap();

    let statements: Vec<String> = user
        .permissions
        .iter()
        .map(|p| p.grant_statement("app", &user.name))
        .collect();

    assert_eq!(
        statements,
        vec![
            "GRANT CONNECT ON DATABASE app TO reader".to_string(),
            "GRANT SELECT ON ALL TABLES IN SCHEMA public TO reader".to_string(),
        ]
    );
}

#[test]
fn tokens_parse_case_sensitively() {
    assert_eq!("CONNECT".parse::<Permission>().unwrap(), Permission::Connect);
    assert_eq!("ALL".parse::<Permission>().unwrap(), Permission::All);
    assert!("connect".parse::<Permission>().is_err());
    assert!("GRANT".parse::<Permission>().is_err());
}

#[test]
fn unknown_token_error_names_the_token() {
    let err = "TRUNCATE".parse::<Permission>().unwrap_err();
    assert_eq!(err.to_string(), "unsupported permission: TRUNCATE");
}

#[test]
fn permission_serializes_as_declared_token() {
    assert_eq!(
        serde_json::to_value(Permission::Select).unwrap(),
        serde_json::json!("SELECT")
    );
    assert_eq!(
        serde_json::to_value(Permission::All).unwrap(),
        serde_json::json!("ALL")
    );
}
