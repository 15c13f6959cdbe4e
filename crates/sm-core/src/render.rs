//! DDL rendering: one operation, exactly one SQL statement.
//!
//! Identifiers are double-quoted so schema and table casing survives the
//! round trip to the database. The original system's history shows what
//! happens otherwise: tables silently created under `Master` in one unit and
//! `master` in the next.

use crate::operation::{ColumnDef, Operation};

/// Double-quote an identifier, escaping embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `"schema"."name"`
fn qualified(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}

/// Render a column clause for CREATE TABLE / ADD COLUMN.
fn column_clause(col: &ColumnDef) -> String {
    let mut clause = format!("{} {}", quote_ident(&col.name), col.sql_type);
    if !col.nullable {
        clause.push_str(" NOT NULL");
    }
    if let Some(default) = &col.default {
        clause.push_str(" DEFAULT ");
        clause.push_str(default);
    }
    clause
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| quote_ident(n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Translate an operation to its single DDL/DML statement.
pub fn to_sql(op: &Operation) -> String {
    match op {
        Operation::AddColumn { schema, table, column } => format!(
            "ALTER TABLE {} ADD COLUMN {}",
            qualified(schema, table),
            column_clause(column)
        ),
        Operation::DropColumn { schema, table, column } => format!(
            "ALTER TABLE {} DROP COLUMN {}",
            qualified(schema, table),
            quote_ident(&column.name)
        ),
        Operation::AlterColumnType {
            schema,
            table,
            column,
            to_type,
            ..
        } => format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {}",
            qualified(schema, table),
            quote_ident(column),
            to_type
        ),
        Operation::CreateTable(def) => {
            let mut clauses: Vec<String> = def.columns.iter().map(column_clause).collect();
            clauses.push(format!("PRIMARY KEY ({})", quoted_list(&def.primary_key)));
            for fk in &def.foreign_keys {
                clauses.push(format!(
                    "FOREIGN KEY ({}) REFERENCES {} ({})",
                    quoted_list(&fk.columns),
                    qualified(&fk.ref_schema, &fk.ref_table),
                    quoted_list(&fk.ref_columns)
                ));
            }
            format!(
                "CREATE TABLE {} ({})",
                qualified(&def.schema, &def.name),
                clauses.join(", ")
            )
        }
        Operation::DropTable(def) => {
            format!("DROP TABLE {}", qualified(&def.schema, &def.name))
        }
        Operation::CreateIndex(def) => format!(
            "CREATE {}INDEX {} ON {} ({})",
            if def.unique { "UNIQUE " } else { "" },
            quote_ident(&def.name),
            qualified(&def.schema, &def.table),
            quoted_list(&def.columns)
        ),
        Operation::DropIndex(def) => {
            format!("DROP INDEX {}", qualified(&def.schema, &def.name))
        }
        Operation::AddForeignKey(def) => format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            qualified(&def.schema, &def.table),
            quote_ident(&def.name),
            quoted_list(&def.columns),
            qualified(&def.ref_schema, &def.ref_table),
            quoted_list(&def.ref_columns)
        ),
        Operation::DropForeignKey(def) => format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            qualified(&def.schema, &def.table),
            quote_ident(&def.name)
        ),
        Operation::RenameTable { schema, from, to } => format!(
            "ALTER TABLE {} RENAME TO {}",
            qualified(schema, from),
            quote_ident(to)
        ),
        Operation::RenameSchema { from, to } => format!(
            "ALTER SCHEMA {} RENAME TO {}",
            quote_ident(from),
            quote_ident(to)
        ),
        Operation::RawStatement { sql, .. } => sql.clone(),
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
