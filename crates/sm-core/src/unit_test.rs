use super::*;
use crate::operation::{ColumnDef, TableDef};

fn key(s: &str) -> UnitKey {
    UnitKey::new(s).unwrap()
}

fn create_widgets() -> Operation {
    Operation::CreateTable(TableDef::new(
        "master",
        "widgets",
        vec![
            ColumnDef::new("id", "UUID"),
            ColumnDef::new("name", "VARCHAR"),
        ],
        vec!["id".to_string()],
    ))
}

#[test]
fn test_unit_key_accepts_timestamps() {
    let k = key("20250820131457");
    assert_eq!(k.as_str(), "20250820131457");
}

#[test]
fn test_unit_key_rejects_non_digits() {
    let result = UnitKey::new("2025-08-20");
    assert!(matches!(
        result.unwrap_err(),
        CoreError::InvalidOrderingKey { .. }
    ));
}

#[test]
fn test_unit_key_rejects_empty() {
    assert!(UnitKey::new("").is_err());
}

#[test]
fn test_unit_key_ordering_is_lexicographic() {
    assert!(key("20250820131457") < key("20250908190749"));
    assert!(key("20250922002511") < key("20260115205433"));
}

#[test]
fn test_auto_reversible_inverts_in_reverse_order() {
    let forward = vec![
        create_widgets(),
        Operation::AddColumn {
            schema: "master".to_string(),
            table: "widgets".to_string(),
            column: ColumnDef::new("price", "DECIMAL(18,2)").nullable(),
        },
    ];
    let unit = MigrationUnit::auto_reversible(
        key("20250820131457"),
        UnitName::new("initial_widgets"),
        forward,
    )
    .unwrap();

    assert!(!unit.is_irreversible());
    assert_eq!(unit.backward().len(), 2);
    // Last forward op is undone first
    assert!(matches!(unit.backward()[0], Operation::DropColumn { .. }));
    assert!(matches!(unit.backward()[1], Operation::DropTable(_)));
}

#[test]
fn test_auto_reversible_fails_on_raw_statement() {
    let forward = vec![Operation::RawStatement {
        sql: "UPDATE master.widgets SET name = upper(name)".to_string(),
        guard: None,
    }];
    let result = MigrationUnit::auto_reversible(
        key("20250820131457"),
        UnitName::new("uppercase_names"),
        forward,
    );
    assert!(matches!(
        result.unwrap_err(),
        CoreError::NotInvertible { index: 0, .. }
    ));
}

#[test]
fn test_irreversible_unit_has_empty_backward() {
    let unit = MigrationUnit::irreversible(
        key("20250922002511"),
        UnitName::new("consolidate_activity_logs"),
        vec![Operation::RawStatement {
            sql: "INSERT INTO master.audit_logs SELECT * FROM master.activity_logs".to_string(),
            guard: None,
        }],
    )
    .unwrap();

    assert!(unit.is_irreversible());
    assert!(unit.backward().is_empty());
}

#[test]
fn test_new_validates_operations() {
    let bad = Operation::AddColumn {
        schema: "master".to_string(),
        table: "".to_string(),
        column: ColumnDef::new("price", "DECIMAL(18,2)"),
    };
    let result = MigrationUnit::new(
        key("20250820131457"),
        UnitName::new("broken"),
        vec![bad],
        vec![],
    );
    assert!(result.is_err());
}
