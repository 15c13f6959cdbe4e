//! Per-tenant database migration history.
//!
//! Every tenant target runs the same ordered units against its own
//! `tenant` schema, tracked independently in that target's ledger.

use sm_core::operation::{ColumnDef, IndexDef, Operation, TableDef};
use sm_core::registry::Registry;
use sm_core::unit::{MigrationUnit, UnitKey, UnitName};
use sm_core::CoreResult;

const SCHEMA: &str = "tenant";

/// Initial tenant schema: companies and their users.
fn initial_tenant() -> CoreResult<MigrationUnit> {
    MigrationUnit::auto_reversible(
        UnitKey::new("20260115095252")?,
        UnitName::new("initial_tenant"),
        vec![
            Operation::CreateTable(TableDef::new(
                SCHEMA,
                "companies",
                vec![
                    ColumnDef::new("id", "UUID"),
                    ColumnDef::new("name", "VARCHAR"),
                    ColumnDef::new("tax_number", "VARCHAR").nullable(),
                    ColumnDef::new("created_at", "TIMESTAMP"),
                ],
                vec!["id".to_string()],
            )),
            Operation::CreateTable(
                TableDef::new(
                    SCHEMA,
                    "users",
                    vec![
                        ColumnDef::new("id", "UUID"),
                        ColumnDef::new("company_id", "UUID"),
                        ColumnDef::new("email", "VARCHAR"),
                        ColumnDef::new("display_name", "VARCHAR"),
                        ColumnDef::new("is_active", "BOOLEAN").default_value("TRUE"),
                        ColumnDef::new("created_at", "TIMESTAMP"),
                    ],
                    vec!["id".to_string()],
                )
                .foreign_key(
                    vec!["company_id".to_string()],
                    SCHEMA,
                    "companies",
                    vec!["id".to_string()],
                ),
            ),
            Operation::CreateIndex(IndexDef {
                schema: SCHEMA.to_string(),
                table: "users".to_string(),
                name: "ix_users_email".to_string(),
                columns: vec!["email".to_string()],
                unique: true,
            }),
        ],
    )
}

/// Branch support: a branches table and a branch link on users.
fn add_branches() -> CoreResult<MigrationUnit> {
    MigrationUnit::auto_reversible(
        UnitKey::new("20260203141210")?,
        UnitName::new("add_branches"),
        vec![
            Operation::CreateTable(
                TableDef::new(
                    SCHEMA,
                    "branches",
                    vec![
                        ColumnDef::new("id", "UUID"),
                        ColumnDef::new("company_id", "UUID"),
                        ColumnDef::new("name", "VARCHAR"),
                        ColumnDef::new("is_head_office", "BOOLEAN").default_value("FALSE"),
                    ],
                    vec!["id".to_string()],
                )
                .foreign_key(
                    vec!["company_id".to_string()],
                    SCHEMA,
                    "companies",
                    vec!["id".to_string()],
                ),
            ),
            Operation::AddColumn {
                schema: SCHEMA.to_string(),
                table: "users".to_string(),
                column: ColumnDef::new("branch_id", "UUID").nullable(),
            },
        ],
    )
}

/// The full tenant registry in ordering-key order.
pub fn registry() -> CoreResult<Registry> {
    Registry::new(vec![initial_tenant()?, add_branches()?])
}
