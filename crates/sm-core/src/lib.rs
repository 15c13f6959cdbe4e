//! sm-core - Core library for Stratum
//!
//! Pure data for the migration engine: statement primitives and their DDL
//! rendering, migration units, the unit registry, migration targets, and
//! deployment configuration. Nothing in this crate talks to a database.

pub mod config;
pub mod error;
pub(crate) mod newtype_string;
pub mod operation;
pub mod registry;
pub mod render;
pub mod target;
pub mod unit;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use operation::{
    ColumnDef, ForeignKeyClause, ForeignKeyDef, Guard, IndexDef, Operation, TableDef,
};
pub use registry::Registry;
pub use target::{Target, TargetId, TargetKind, TargetResolver};
pub use unit::{MigrationUnit, UnitKey, UnitName};
