//! Catalog ("master") database migration history.
//!
//! Ordered units evolving the tenant catalog: the tenant registry itself,
//! tenant management entities, a casing-repair pass for tables stranded
//! under `Master`, a one-way activity-log consolidation, and module pricing.

use sm_core::operation::{ColumnDef, Guard, IndexDef, Operation, TableDef};
use sm_core::registry::Registry;
use sm_core::unit::{MigrationUnit, UnitKey, UnitName};
use sm_core::CoreResult;

const SCHEMA: &str = "master";

fn unit_key(key: &str) -> CoreResult<UnitKey> {
    UnitKey::new(key)
}

/// Initial catalog: tenants, their domains, and subscriptions.
fn initial_catalog() -> CoreResult<MigrationUnit> {
    MigrationUnit::auto_reversible(
        unit_key("20250820131457")?,
        UnitName::new("initial_catalog"),
        vec![
            Operation::CreateTable(TableDef::new(
                SCHEMA,
                "tenants",
                vec![
                    ColumnDef::new("id", "UUID"),
                    ColumnDef::new("code", "VARCHAR"),
                    ColumnDef::new("name", "VARCHAR"),
                    ColumnDef::new("connection_string", "VARCHAR"),
                    ColumnDef::new("is_active", "BOOLEAN").default_value("TRUE"),
                    ColumnDef::new("created_at", "TIMESTAMP"),
                ],
                vec!["id".to_string()],
            )),
            Operation::CreateIndex(IndexDef {
                schema: SCHEMA.to_string(),
                table: "tenants".to_string(),
                name: "ix_tenants_code".to_string(),
                columns: vec!["code".to_string()],
                unique: true,
            }),
            Operation::CreateTable(
                TableDef::new(
                    SCHEMA,
                    "tenant_domains",
                    vec![
                        ColumnDef::new("id", "UUID"),
                        ColumnDef::new("tenant_id", "UUID"),
                        ColumnDef::new("domain_name", "VARCHAR"),
                        ColumnDef::new("is_primary", "BOOLEAN").default_value("FALSE"),
                    ],
                    vec!["id".to_string()],
                )
                .foreign_key(
                    vec!["tenant_id".to_string()],
                    SCHEMA,
                    "tenants",
                    vec!["id".to_string()],
                ),
            ),
            Operation::CreateTable(
                TableDef::new(
                    SCHEMA,
                    "subscriptions",
                    vec![
                        ColumnDef::new("id", "UUID"),
                        ColumnDef::new("tenant_id", "UUID"),
                        ColumnDef::new("plan", "VARCHAR"),
                        ColumnDef::new("starts_at", "TIMESTAMP"),
                        ColumnDef::new("ends_at", "TIMESTAMP").nullable(),
                    ],
                    vec!["id".to_string()],
                )
                .foreign_key(
                    vec!["tenant_id".to_string()],
                    SCHEMA,
                    "tenants",
                    vec!["id".to_string()],
                ),
            ),
        ],
    )
}

/// Tenant management entities: settings, features, activity logs.
fn add_tenant_management() -> CoreResult<MigrationUnit> {
    MigrationUnit::auto_reversible(
        unit_key("20250908190749")?,
        UnitName::new("add_tenant_management"),
        vec![
            Operation::CreateTable(TableDef::new(
                SCHEMA,
                "tenant_settings",
                vec![
                    ColumnDef::new("id", "UUID"),
                    ColumnDef::new("tenant_id", "UUID"),
                    ColumnDef::new("setting_key", "VARCHAR"),
                    ColumnDef::new("setting_value", "VARCHAR").nullable(),
                ],
                vec!["id".to_string()],
            )),
            Operation::CreateTable(TableDef::new(
                SCHEMA,
                "tenant_features",
                vec![
                    ColumnDef::new("id", "UUID"),
                    ColumnDef::new("tenant_id", "UUID"),
                    ColumnDef::new("feature_code", "VARCHAR"),
                    ColumnDef::new("is_enabled", "BOOLEAN").default_value("FALSE"),
                ],
                vec!["id".to_string()],
            )),
            Operation::CreateTable(TableDef::new(
                SCHEMA,
                "tenant_activity_logs",
                vec![
                    ColumnDef::new("id", "UUID"),
                    ColumnDef::new("tenant_id", "UUID"),
                    ColumnDef::new("activity_type", "VARCHAR"),
                    ColumnDef::new("description", "VARCHAR").nullable(),
                    ColumnDef::new("created_at", "TIMESTAMP"),
                ],
                vec!["id".to_string()],
            )),
            Operation::AddColumn {
                schema: SCHEMA.to_string(),
                table: "tenants".to_string(),
                column: ColumnDef::new("contact_email", "VARCHAR").nullable(),
            },
        ],
    )
}

/// Repair pass for tables that earlier tooling created under `Master`
/// instead of `master`. The copy step skips once the destination table
/// already exists under `master`; the drop step skips once the
/// wrongly-cased source is gone. On backends with case-insensitive
/// schema names (DuckDB folds `Master` and `master` together) the whole
/// unit is a guarded no-op.
fn repair_schema_casing() -> CoreResult<MigrationUnit> {
    let mut forward = Vec::new();
    for table in ["tenant_features", "tenant_settings"] {
        forward.push(Operation::RawStatement {
            sql: format!(
                "CREATE TABLE {SCHEMA}.{table} AS SELECT * FROM \"Master\".\"{table}\""
            ),
            guard: Some(Guard::table_present(SCHEMA, table)),
        });
        forward.push(Operation::RawStatement {
            sql: format!("DROP TABLE \"Master\".\"{table}\""),
            guard: Some(Guard::table_absent("Master", table)),
        });
    }
    MigrationUnit::irreversible(
        unit_key("20250915120000")?,
        UnitName::new("repair_schema_casing"),
        forward,
    )
}

/// Consolidate tenant activity logs into the audit table and drop the
/// source. One-way by design; rollback is a documented manual procedure.
fn consolidate_activity_logs() -> CoreResult<MigrationUnit> {
    MigrationUnit::irreversible(
        unit_key("20250922002511")?,
        UnitName::new("consolidate_activity_logs"),
        vec![
            Operation::RawStatement {
                sql: format!(
                    "CREATE TABLE {SCHEMA}.audit_logs AS \
                     SELECT id, tenant_id, activity_type, description, created_at \
                     FROM {SCHEMA}.tenant_activity_logs"
                ),
                guard: Some(Guard::table_present(SCHEMA, "audit_logs")),
            },
            Operation::RawStatement {
                sql: format!("DROP TABLE {SCHEMA}.tenant_activity_logs"),
                guard: Some(Guard::table_absent(SCHEMA, "tenant_activity_logs")),
            },
        ],
    )
}

/// Module pricing support on subscriptions.
fn add_module_pricing() -> CoreResult<MigrationUnit> {
    MigrationUnit::auto_reversible(
        unit_key("20260129101603")?,
        UnitName::new("add_module_pricing"),
        vec![
            Operation::AddColumn {
                schema: SCHEMA.to_string(),
                table: "subscriptions".to_string(),
                column: ColumnDef::new("price_monthly", "DECIMAL(18,2)").nullable(),
            },
            Operation::AddColumn {
                schema: SCHEMA.to_string(),
                table: "subscriptions".to_string(),
                column: ColumnDef::new("currency", "VARCHAR").default_value("'TRY'"),
            },
            Operation::CreateTable(TableDef::new(
                SCHEMA,
                "module_pricings",
                vec![
                    ColumnDef::new("id", "UUID"),
                    ColumnDef::new("module_code", "VARCHAR"),
                    ColumnDef::new("price_monthly", "DECIMAL(18,2)"),
                    ColumnDef::new("currency", "VARCHAR").default_value("'TRY'"),
                ],
                vec!["id".to_string()],
            )),
        ],
    )
}

/// The full catalog registry in ordering-key order.
pub fn registry() -> CoreResult<Registry> {
    Registry::new(vec![
        initial_catalog()?,
        add_tenant_management()?,
        repair_schema_casing()?,
        consolidate_activity_logs()?,
        add_module_pricing()?,
    ])
}
