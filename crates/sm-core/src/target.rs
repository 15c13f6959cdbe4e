//! Migration targets and the schema target resolver.
//!
//! A target is one isolated database/schema namespace: the catalog database
//! or one tenant database. Each target owns its own applied-migration
//! ledger; targets never share history.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::newtype_string::define_newtype_string;
use serde::Serialize;
use std::collections::HashMap;

define_newtype_string! {
    /// Stable identifier for a target, e.g. `catalog` or a tenant code.
    pub struct TargetId;
}

/// Which schema line a target follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// The single catalog ("master") database
    Catalog,
    /// One per-tenant database
    Tenant,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Catalog => write!(f, "catalog"),
            TargetKind::Tenant => write!(f, "tenant"),
        }
    }
}

/// A resolved physical migration target.
#[derive(Debug, Clone)]
pub struct Target {
    pub id: TargetId,
    pub kind: TargetKind,
    /// Physical (normalized) schema name operations run against
    pub schema: String,
    /// Database file path, or `:memory:`
    pub database: String,
}

/// Normalize a logical schema name to its physical form.
///
/// Lowercasing is the whole normalization. The catalog's history contains
/// units that wrote `Master` and units that wrote `master`, leaving tables
/// stranded across two namespaces; every schema name passes through here
/// before any DDL is rendered against it.
pub fn normalize_schema(logical: &str) -> String {
    logical.to_lowercase()
}

/// Maps logical targets from config to physical databases and schemas.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    targets: Vec<Target>,
}

impl TargetResolver {
    /// Build the target set from a deployment config.
    ///
    /// Fails with [`CoreError::SchemaNameCollision`] if two distinct logical
    /// schema names within the same database normalize to the same physical
    /// name, and with [`CoreError::DuplicateTarget`] on repeated target ids.
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let mut targets = Vec::with_capacity(1 + config.tenants.len());
        // (database, physical schema) -> logical schema first seen
        let mut seen_schemas: HashMap<(String, String), String> = HashMap::new();
        let mut seen_ids: HashMap<String, ()> = HashMap::new();

        let mut add = |id: &str, kind: TargetKind, database: &str, logical: &str| -> CoreResult<Target> {
            if seen_ids.insert(id.to_string(), ()).is_some() {
                return Err(CoreError::DuplicateTarget { id: id.to_string() });
            }
            let physical = normalize_schema(logical);
            let slot = (database.to_string(), physical.clone());
            if let Some(first) = seen_schemas.get(&slot) {
                if first != logical {
                    return Err(CoreError::SchemaNameCollision {
                        database: database.to_string(),
                        first: first.clone(),
                        second: logical.to_string(),
                        physical,
                    });
                }
            } else {
                seen_schemas.insert(slot, logical.to_string());
            }
            Ok(Target {
                id: TargetId::new(id),
                kind,
                schema: physical,
                database: database.to_string(),
            })
        };

        targets.push(add(
            &config.catalog.id,
            TargetKind::Catalog,
            &config.catalog.database,
            &config.catalog.schema,
        )?);
        for tenant in &config.tenants {
            targets.push(add(
                &tenant.id,
                TargetKind::Tenant,
                &tenant.database,
                &tenant.schema,
            )?);
        }

        Ok(Self { targets })
    }

    /// All targets, catalog first.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Resolve a target by id.
    pub fn resolve(&self, id: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// The catalog target.
    pub fn catalog(&self) -> &Target {
        // Config always carries a catalog entry, so position 0 exists.
        &self.targets[0]
    }

    /// All tenant targets.
    pub fn tenants(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.kind == TargetKind::Tenant)
    }
}

#[cfg(test)]
#[path = "target_test.rs"]
mod tests;
