use super::*;
use crate::operation::{ForeignKeyDef, Guard, IndexDef, TableDef};

#[test]
fn test_add_column() {
    let op = Operation::AddColumn {
        schema: "master".to_string(),
        table: "widgets".to_string(),
        column: ColumnDef::new("price", "DECIMAL(18,2)").nullable(),
    };
    assert_eq!(
        to_sql(&op),
        "ALTER TABLE \"master\".\"widgets\" ADD COLUMN \"price\" DECIMAL(18,2)"
    );
}

#[test]
fn test_add_column_not_null_with_default() {
    let op = Operation::AddColumn {
        schema: "master".to_string(),
        table: "tenants".to_string(),
        column: ColumnDef::new("is_active", "BOOLEAN").default_value("TRUE"),
    };
    assert_eq!(
        to_sql(&op),
        "ALTER TABLE \"master\".\"tenants\" ADD COLUMN \"is_active\" BOOLEAN NOT NULL DEFAULT TRUE"
    );
}

#[test]
fn test_drop_column_ignores_type_metadata() {
    let op = Operation::DropColumn {
        schema: "master".to_string(),
        table: "widgets".to_string(),
        column: ColumnDef::new("price", "DECIMAL(18,2)"),
    };
    assert_eq!(
        to_sql(&op),
        "ALTER TABLE \"master\".\"widgets\" DROP COLUMN \"price\""
    );
}

#[test]
fn test_alter_column_type_uses_new_type() {
    let op = Operation::AlterColumnType {
        schema: "master".to_string(),
        table: "widgets".to_string(),
        column: "name".to_string(),
        from_type: "VARCHAR".to_string(),
        to_type: "TEXT".to_string(),
    };
    assert_eq!(
        to_sql(&op),
        "ALTER TABLE \"master\".\"widgets\" ALTER COLUMN \"name\" SET DATA TYPE TEXT"
    );
}

#[test]
fn test_create_table_with_composite_key() {
    let op = Operation::CreateTable(TableDef::new(
        "master",
        "user_tenants",
        vec![
            ColumnDef::new("user_id", "UUID"),
            ColumnDef::new("tenant_id", "UUID"),
        ],
        vec!["user_id".to_string(), "tenant_id".to_string()],
    ));
    assert_eq!(
        to_sql(&op),
        "CREATE TABLE \"master\".\"user_tenants\" (\"user_id\" UUID NOT NULL, \
         \"tenant_id\" UUID NOT NULL, PRIMARY KEY (\"user_id\", \"tenant_id\"))"
    );
}

#[test]
fn test_create_table_with_inline_foreign_key() {
    let op = Operation::CreateTable(
        TableDef::new(
            "master",
            "tenant_domains",
            vec![
                ColumnDef::new("id", "UUID"),
                ColumnDef::new("tenant_id", "UUID"),
            ],
            vec!["id".to_string()],
        )
        .foreign_key(
            vec!["tenant_id".to_string()],
            "master",
            "tenants",
            vec!["id".to_string()],
        ),
    );
    assert_eq!(
        to_sql(&op),
        "CREATE TABLE \"master\".\"tenant_domains\" (\"id\" UUID NOT NULL, \
         \"tenant_id\" UUID NOT NULL, PRIMARY KEY (\"id\"), \
         FOREIGN KEY (\"tenant_id\") REFERENCES \"master\".\"tenants\" (\"id\"))"
    );
}

#[test]
fn test_create_unique_index() {
    let op = Operation::CreateIndex(IndexDef {
        schema: "master".to_string(),
        table: "tenants".to_string(),
        name: "ix_tenants_code".to_string(),
        columns: vec!["code".to_string()],
        unique: true,
    });
    assert_eq!(
        to_sql(&op),
        "CREATE UNIQUE INDEX \"ix_tenants_code\" ON \"master\".\"tenants\" (\"code\")"
    );
}

#[test]
fn test_add_foreign_key() {
    let op = Operation::AddForeignKey(ForeignKeyDef {
        schema: "master".to_string(),
        table: "tenant_domains".to_string(),
        name: "fk_tenant_domains_tenants".to_string(),
        columns: vec!["tenant_id".to_string()],
        ref_schema: "master".to_string(),
        ref_table: "tenants".to_string(),
        ref_columns: vec!["id".to_string()],
    });
    assert_eq!(
        to_sql(&op),
        "ALTER TABLE \"master\".\"tenant_domains\" ADD CONSTRAINT \"fk_tenant_domains_tenants\" \
         FOREIGN KEY (\"tenant_id\") REFERENCES \"master\".\"tenants\" (\"id\")"
    );
}

#[test]
fn test_rename_table() {
    let op = Operation::RenameTable {
        schema: "master".to_string(),
        from: "tenants".to_string(),
        to: "tenant_registry".to_string(),
    };
    assert_eq!(
        to_sql(&op),
        "ALTER TABLE \"master\".\"tenants\" RENAME TO \"tenant_registry\""
    );
}

#[test]
fn test_raw_statement_passes_through_verbatim() {
    let sql = "UPDATE master.tenants SET code = lower(code)";
    let op = Operation::RawStatement {
        sql: sql.to_string(),
        guard: Some(Guard::table_present("master", "tenants")),
    };
    assert_eq!(to_sql(&op), sql);
}

#[test]
fn test_identifier_quoting_escapes_quotes() {
    let op = Operation::DropTable(TableDef::new(
        "master",
        "odd\"name",
        vec![ColumnDef::new("id", "UUID")],
        vec!["id".to_string()],
    ));
    assert_eq!(to_sql(&op), "DROP TABLE \"master\".\"odd\"\"name\"");
}
