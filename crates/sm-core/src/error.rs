//! Error types for sm-core

use thiserror::Error;

/// Core error type for Stratum
#[derive(Error, Debug)]
pub enum CoreError {
    /// M001: An operation carries an empty identifier
    #[error("[M001] Empty identifier: {what}")]
    EmptyIdentifier { what: String },

    /// M002: CREATE TABLE without a primary key column set
    #[error("[M002] Table '{schema}.{table}' has no primary key columns")]
    MissingPrimaryKey { schema: String, table: String },

    /// M003: ALTER COLUMN TYPE missing old or new type metadata
    #[error("[M003] Column '{column}' type change is missing {which} type metadata")]
    MissingTypeMetadata { column: String, which: String },

    /// M004: Two migration units share an ordering key
    #[error("[M004] Duplicate ordering key '{key}' (units '{first}' and '{second}')")]
    DuplicateOrderingKey {
        key: String,
        first: String,
        second: String,
    },

    /// M005: Ordering key is not a sortable digit string
    #[error("[M005] Invalid ordering key '{key}': {reason}")]
    InvalidOrderingKey { key: String, reason: String },

    /// M006: Two logical schema names normalize to the same physical name
    #[error("[M006] Schema name collision in '{database}': '{first}' and '{second}' both normalize to '{physical}'")]
    SchemaNameCollision {
        database: String,
        first: String,
        second: String,
        physical: String,
    },

    /// M007: A forward operation has no synthesizable inverse
    #[error("[M007] Operation {index} of unit '{unit}' is not invertible: {operation}")]
    NotInvertible {
        unit: String,
        index: usize,
        operation: String,
    },

    /// M008: Referenced unit is not in the registry
    #[error("[M008] Unknown migration unit '{key}'")]
    UnknownUnit { key: String },

    /// M009: Two targets share an identifier
    #[error("[M009] Duplicate target id '{id}'")]
    DuplicateTarget { id: String },

    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// C003: IO error
    #[error("[C003] IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
