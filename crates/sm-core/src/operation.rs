//! Statement primitives: the atomic schema/data operations a migration unit
//! is composed of.
//!
//! Operations are pure data. Nothing here touches a database; the runner
//! renders each operation to one SQL statement (see [`crate::render`]) and
//! executes it inside the unit's transaction.

use crate::error::{CoreError, CoreResult};

/// Column description carried by table/column operations.
///
/// Holds enough metadata to regenerate the exact DDL, including on the
/// inverse path (a dropped column is re-added with the same type,
/// nullability, and default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Dialect type text, e.g. `VARCHAR`, `UUID`, `DECIMAL(18,2)`
    pub sql_type: String,

    /// Whether NULL values are permitted
    pub nullable: bool,

    /// Optional DEFAULT expression text
    pub default: Option<String>,
}

impl ColumnDef {
    /// A NOT NULL column with no default.
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: false,
            default: None,
        }
    }

    /// Mark the column as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attach a DEFAULT expression.
    pub fn default_value(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }
}

/// Foreign key clause embedded in a table definition.
///
/// Rides along with CREATE TABLE so constraints exist from the start on
/// backends that do not implement ALTER-based constraint addition (DuckDB
/// among them). Post-hoc constraint changes use
/// [`Operation::AddForeignKey`] / [`Operation::DropForeignKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyClause {
    pub columns: Vec<String>,
    pub ref_schema: String,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
}

/// Full table description, used by CREATE TABLE and carried by DROP TABLE so
/// the inverse can recreate the table's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnDef>,
    /// Primary key column names. Must be non-empty.
    pub primary_key: Vec<String>,
    /// Foreign keys created with the table.
    pub foreign_keys: Vec<ForeignKeyClause>,
}

impl TableDef {
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<ColumnDef>,
        primary_key: Vec<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns,
            primary_key,
            foreign_keys: Vec::new(),
        }
    }

    /// Attach a foreign key clause to the table definition.
    pub fn foreign_key(
        mut self,
        columns: Vec<String>,
        ref_schema: impl Into<String>,
        ref_table: impl Into<String>,
        ref_columns: Vec<String>,
    ) -> Self {
        self.foreign_keys.push(ForeignKeyClause {
            columns,
            ref_schema: ref_schema.into(),
            ref_table: ref_table.into(),
            ref_columns,
        });
        self
    }
}

/// Index description, shared by CREATE INDEX and DROP INDEX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Foreign key description, shared by ADD and DROP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub schema: String,
    pub table: String,
    /// Constraint name. Uniqueness within a schema is the unit author's
    /// invariant; the engine surfaces driver conflicts, it does not dedupe.
    pub name: String,
    pub columns: Vec<String>,
    pub ref_schema: String,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
}

/// Idempotency guard for a raw statement.
///
/// The query must return a single boolean: `true` means the change already
/// exists and the statement is skipped (the unit is still recorded as
/// applied). This is how partially-applied, out-of-band fixes are made
/// re-entrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    /// Boolean query evaluated before the statement runs.
    pub query: String,
}

impl Guard {
    /// Guard on an arbitrary boolean query.
    pub fn query(sql: impl Into<String>) -> Self {
        Self { query: sql.into() }
    }

    /// Satisfied when `schema.table` already exists.
    pub fn table_present(schema: &str, table: &str) -> Self {
        Self {
            query: format!(
                "SELECT COUNT(*) > 0 FROM information_schema.tables \
                 WHERE table_schema = '{schema}' AND table_name = '{table}'"
            ),
        }
    }

    /// Satisfied when `schema.table` does NOT exist.
    ///
    /// Used by move/consolidate steps whose source table may already be gone.
    pub fn table_absent(schema: &str, table: &str) -> Self {
        Self {
            query: format!(
                "SELECT COUNT(*) = 0 FROM information_schema.tables \
                 WHERE table_schema = '{schema}' AND table_name = '{table}'"
            ),
        }
    }

    /// Satisfied when the column already exists on `schema.table`.
    pub fn column_present(schema: &str, table: &str, column: &str) -> Self {
        Self {
            query: format!(
                "SELECT COUNT(*) > 0 FROM information_schema.columns \
                 WHERE table_schema = '{schema}' AND table_name = '{table}' \
                 AND column_name = '{column}'"
            ),
        }
    }
}

/// One atomic schema/data operation.
///
/// Tagged variant with exhaustive matching in rendering and inversion; no
/// dynamic dispatch over operation kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    AddColumn {
        schema: String,
        table: String,
        column: ColumnDef,
    },
    /// Carries the full column definition so the inverse can re-add it.
    DropColumn {
        schema: String,
        table: String,
        column: ColumnDef,
    },
    /// Both old and new type metadata are required so the inverse can be
    /// synthesized by swapping them.
    AlterColumnType {
        schema: String,
        table: String,
        column: String,
        from_type: String,
        to_type: String,
    },
    CreateTable(TableDef),
    /// Carries the full table definition so the inverse can recreate the
    /// table's shape. Rollback restores shape, never prior data.
    DropTable(TableDef),
    CreateIndex(IndexDef),
    DropIndex(IndexDef),
    AddForeignKey(ForeignKeyDef),
    DropForeignKey(ForeignKeyDef),
    RenameTable {
        schema: String,
        from: String,
        to: String,
    },
    RenameSchema {
        from: String,
        to: String,
    },
    /// Dialect-native escape hatch for statements the structured variants
    /// cannot express, with an optional idempotency guard.
    RawStatement {
        sql: String,
        guard: Option<Guard>,
    },
}

fn require(value: &str, what: impl Into<String>) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::EmptyIdentifier { what: what.into() });
    }
    Ok(())
}

impl Operation {
    /// Check the operation carries everything needed to render exact DDL.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            Operation::AddColumn { schema, table, column }
            | Operation::DropColumn { schema, table, column } => {
                require(schema, "schema name")?;
                require(table, format!("table name in {}", self.kind()))?;
                require(&column.name, format!("column name on {schema}.{table}"))?;
                require(&column.sql_type, format!("column type for {}", column.name))?;
                Ok(())
            }
            Operation::AlterColumnType {
                schema,
                table,
                column,
                from_type,
                to_type,
            } => {
                require(schema, "schema name")?;
                require(table, "table name in ALTER COLUMN TYPE")?;
                require(column, format!("column name on {schema}.{table}"))?;
                if from_type.trim().is_empty() {
                    return Err(CoreError::MissingTypeMetadata {
                        column: column.clone(),
                        which: "old".to_string(),
                    });
                }
                if to_type.trim().is_empty() {
                    return Err(CoreError::MissingTypeMetadata {
                        column: column.clone(),
                        which: "new".to_string(),
                    });
                }
                Ok(())
            }
            Operation::CreateTable(def) | Operation::DropTable(def) => {
                require(&def.schema, "schema name")?;
                require(&def.name, format!("table name in {}", self.kind()))?;
                for col in &def.columns {
                    require(&col.name, format!("column name on {}.{}", def.schema, def.name))?;
                    require(&col.sql_type, format!("column type for {}", col.name))?;
                }
                if def.primary_key.is_empty() {
                    return Err(CoreError::MissingPrimaryKey {
                        schema: def.schema.clone(),
                        table: def.name.clone(),
                    });
                }
                for fk in &def.foreign_keys {
                    require(&fk.ref_schema, "referenced schema name")?;
                    require(
                        &fk.ref_table,
                        format!("referenced table on {}.{}", def.schema, def.name),
                    )?;
                    if fk.columns.is_empty() || fk.columns.iter().any(|c| c.trim().is_empty()) {
                        return Err(CoreError::EmptyIdentifier {
                            what: format!("foreign key column on {}.{}", def.schema, def.name),
                        });
                    }
                }
                Ok(())
            }
            Operation::CreateIndex(def) | Operation::DropIndex(def) => {
                require(&def.schema, "schema name")?;
                require(&def.table, "table name in index operation")?;
                require(&def.name, format!("index name on {}.{}", def.schema, def.table))?;
                if def.columns.iter().any(|c| c.trim().is_empty()) {
                    return Err(CoreError::EmptyIdentifier {
                        what: format!("index column on {}.{}", def.schema, def.table),
                    });
                }
                Ok(())
            }
            Operation::AddForeignKey(def) | Operation::DropForeignKey(def) => {
                require(&def.schema, "schema name")?;
                require(&def.table, "table name in foreign key operation")?;
                require(&def.name, format!("constraint name on {}.{}", def.schema, def.table))?;
                require(&def.ref_schema, "referenced schema name")?;
                require(&def.ref_table, "referenced table name")?;
                Ok(())
            }
            Operation::RenameTable { schema, from, to } => {
                require(schema, "schema name")?;
                require(from, "old table name in RENAME TABLE")?;
                require(to, "new table name in RENAME TABLE")?;
                Ok(())
            }
            Operation::RenameSchema { from, to } => {
                require(from, "old schema name in RENAME SCHEMA")?;
                require(to, "new schema name in RENAME SCHEMA")?;
                Ok(())
            }
            Operation::RawStatement { sql, .. } => {
                require(sql, "raw statement text")?;
                Ok(())
            }
        }
    }

    /// Synthesize the inverse operation, or `None` for raw statements.
    ///
    /// Every structured variant carries enough metadata to invert; raw
    /// statements are one-way unless the author supplies an explicit
    /// backward statement.
    pub fn invert(&self) -> Option<Operation> {
        match self {
            Operation::AddColumn { schema, table, column } => Some(Operation::DropColumn {
                schema: schema.clone(),
                table: table.clone(),
                column: column.clone(),
            }),
            Operation::DropColumn { schema, table, column } => Some(Operation::AddColumn {
                schema: schema.clone(),
                table: table.clone(),
                column: column.clone(),
            }),
            Operation::AlterColumnType {
                schema,
                table,
                column,
                from_type,
                to_type,
            } => Some(Operation::AlterColumnType {
                schema: schema.clone(),
                table: table.clone(),
                column: column.clone(),
                from_type: to_type.clone(),
                to_type: from_type.clone(),
            }),
            Operation::CreateTable(def) => Some(Operation::DropTable(def.clone())),
            Operation::DropTable(def) => Some(Operation::CreateTable(def.clone())),
            Operation::CreateIndex(def) => Some(Operation::DropIndex(def.clone())),
            Operation::DropIndex(def) => Some(Operation::CreateIndex(def.clone())),
            Operation::AddForeignKey(def) => Some(Operation::DropForeignKey(def.clone())),
            Operation::DropForeignKey(def) => Some(Operation::AddForeignKey(def.clone())),
            Operation::RenameTable { schema, from, to } => Some(Operation::RenameTable {
                schema: schema.clone(),
                from: to.clone(),
                to: from.clone(),
            }),
            Operation::RenameSchema { from, to } => Some(Operation::RenameSchema {
                from: to.clone(),
                to: from.clone(),
            }),
            Operation::RawStatement { .. } => None,
        }
    }

    /// Short human-readable kind for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::AddColumn { .. } => "ADD COLUMN",
            Operation::DropColumn { .. } => "DROP COLUMN",
            Operation::AlterColumnType { .. } => "ALTER COLUMN TYPE",
            Operation::CreateTable(_) => "CREATE TABLE",
            Operation::DropTable(_) => "DROP TABLE",
            Operation::CreateIndex(_) => "CREATE INDEX",
            Operation::DropIndex(_) => "DROP INDEX",
            Operation::AddForeignKey(_) => "ADD FOREIGN KEY",
            Operation::DropForeignKey(_) => "DROP FOREIGN KEY",
            Operation::RenameTable { .. } => "RENAME TABLE",
            Operation::RenameSchema { .. } => "RENAME SCHEMA",
            Operation::RawStatement { .. } => "RAW STATEMENT",
        }
    }

    /// The idempotency guard, if this is a guarded raw statement.
    pub fn guard(&self) -> Option<&Guard> {
        match self {
            Operation::RawStatement { guard, .. } => guard.as_ref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::AddColumn { schema, table, column } => {
                write!(f, "ADD COLUMN {}.{}.{}", schema, table, column.name)
            }
            Operation::DropColumn { schema, table, column } => {
                write!(f, "DROP COLUMN {}.{}.{}", schema, table, column.name)
            }
            Operation::AlterColumnType { schema, table, column, .. } => {
                write!(f, "ALTER COLUMN TYPE {}.{}.{}", schema, table, column)
            }
            Operation::CreateTable(def) => write!(f, "CREATE TABLE {}.{}", def.schema, def.name),
            Operation::DropTable(def) => write!(f, "DROP TABLE {}.{}", def.schema, def.name),
            Operation::CreateIndex(def) => write!(f, "CREATE INDEX {}.{}", def.schema, def.name),
            Operation::DropIndex(def) => write!(f, "DROP INDEX {}.{}", def.schema, def.name),
            Operation::AddForeignKey(def) => {
                write!(f, "ADD FOREIGN KEY {} ON {}.{}", def.name, def.schema, def.table)
            }
            Operation::DropForeignKey(def) => {
                write!(f, "DROP FOREIGN KEY {} ON {}.{}", def.name, def.schema, def.table)
            }
            Operation::RenameTable { schema, from, to } => {
                write!(f, "RENAME TABLE {}.{} -> {}", schema, from, to)
            }
            Operation::RenameSchema { from, to } => write!(f, "RENAME SCHEMA {} -> {}", from, to),
            Operation::RawStatement { sql, .. } => {
                let head: String = sql.chars().take(40).collect();
                write!(f, "RAW {}", head.trim())
            }
        }
    }
}

#[cfg(test)]
#[path = "operation_test.rs"]
mod tests;
