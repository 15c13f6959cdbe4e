use super::*;

fn widgets_table() -> TableDef {
    TableDef::new(
        "master",
        "widgets",
        vec![
            ColumnDef::new("id", "UUID"),
            ColumnDef::new("name", "VARCHAR").nullable(),
        ],
        vec!["id".to_string()],
    )
}

#[test]
fn test_validate_create_table() {
    let op = Operation::CreateTable(widgets_table());
    assert!(op.validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_primary_key() {
    let mut def = widgets_table();
    def.primary_key.clear();
    let result = Operation::CreateTable(def).validate();
    assert!(matches!(
        result.unwrap_err(),
        CoreError::MissingPrimaryKey { .. }
    ));
}

#[test]
fn test_validate_rejects_empty_table_name() {
    let op = Operation::AddColumn {
        schema: "master".to_string(),
        table: "".to_string(),
        column: ColumnDef::new("price", "DECIMAL(18,2)"),
    };
    assert!(matches!(
        op.validate().unwrap_err(),
        CoreError::EmptyIdentifier { .. }
    ));
}

#[test]
fn test_validate_alter_requires_both_types() {
    let op = Operation::AlterColumnType {
        schema: "master".to_string(),
        table: "widgets".to_string(),
        column: "name".to_string(),
        from_type: "".to_string(),
        to_type: "TEXT".to_string(),
    };
    let err = op.validate().unwrap_err();
    assert!(matches!(err, CoreError::MissingTypeMetadata { ref which, .. } if which == "old"));
}

#[test]
fn test_invert_add_column_round_trip() {
    let op = Operation::AddColumn {
        schema: "master".to_string(),
        table: "widgets".to_string(),
        column: ColumnDef::new("price", "DECIMAL(18,2)").nullable(),
    };
    let inverse = op.invert().unwrap();
    assert!(matches!(inverse, Operation::DropColumn { .. }));
    // Inverting twice recovers the original operation
    assert_eq!(inverse.invert().unwrap(), op);
}

#[test]
fn test_invert_alter_column_swaps_types() {
    let op = Operation::AlterColumnType {
        schema: "master".to_string(),
        table: "widgets".to_string(),
        column: "name".to_string(),
        from_type: "VARCHAR".to_string(),
        to_type: "TEXT".to_string(),
    };
    match op.invert().unwrap() {
        Operation::AlterColumnType { from_type, to_type, .. } => {
            assert_eq!(from_type, "TEXT");
            assert_eq!(to_type, "VARCHAR");
        }
        other => panic!("expected AlterColumnType, got {other}"),
    }
}

#[test]
fn test_invert_create_table_is_drop_with_same_def() {
    let def = widgets_table();
    let inverse = Operation::CreateTable(def.clone()).invert().unwrap();
    assert_eq!(inverse, Operation::DropTable(def));
}

#[test]
fn test_invert_rename_swaps_names() {
    let op = Operation::RenameTable {
        schema: "master".to_string(),
        from: "tenants".to_string(),
        to: "tenant_registry".to_string(),
    };
    match op.invert().unwrap() {
        Operation::RenameTable { from, to, .. } => {
            assert_eq!(from, "tenant_registry");
            assert_eq!(to, "tenants");
        }
        other => panic!("expected RenameTable, got {other}"),
    }
}

#[test]
fn test_raw_statement_has_no_inverse() {
    let op = Operation::RawStatement {
        sql: "UPDATE master.tenants SET code = lower(code)".to_string(),
        guard: None,
    };
    assert!(op.invert().is_none());
}

#[test]
fn test_guard_accessor() {
    let guarded = Operation::RawStatement {
        sql: "CREATE TABLE master.audit_logs (id UUID PRIMARY KEY)".to_string(),
        guard: Some(Guard::table_absent("master", "audit_logs")),
    };
    assert!(guarded.guard().is_some());

    let structured = Operation::CreateTable(widgets_table());
    assert!(structured.guard().is_none());
}

#[test]
fn test_guard_table_present_query_shape() {
    let guard = Guard::table_present("master", "tenants");
    assert!(guard.query.contains("information_schema.tables"));
    assert!(guard.query.contains("table_schema = 'master'"));
    assert!(guard.query.contains("table_name = 'tenants'"));
}
