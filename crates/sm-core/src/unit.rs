//! Migration units: named, timestamp-ordered pairs of forward/backward
//! operation sequences.
//!
//! Units are immutable once constructed. A unit with an empty backward
//! sequence is irreversible and the runner refuses to revert it without an
//! explicit force flag. Reversal restores schema shape only; data dropped or
//! transformed by a forward step is not restored.

use crate::error::{CoreError, CoreResult};
use crate::newtype_string::define_newtype_string;
use crate::operation::Operation;
use serde::Serialize;
use std::str::FromStr;

define_newtype_string! {
    /// Human-readable unit name, e.g. `initial_catalog`.
    pub struct UnitName;
}

/// Sortable ordering key for a migration unit.
///
/// Digits only, conventionally a `YYYYMMDDHHMMSS` timestamp. Lexicographic
/// order over keys is the one and only application order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitKey(String);

impl UnitKey {
    /// Parse and validate an ordering key.
    pub fn new(key: impl Into<String>) -> CoreResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(CoreError::InvalidOrderingKey {
                key,
                reason: "key is empty".to_string(),
            });
        }
        if !key.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidOrderingKey {
                key,
                reason: "key must contain only digits".to_string(),
            });
        }
        Ok(Self(key))
    }

    /// Return the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UnitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UnitKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitKey::new(s)
    }
}

/// One versioned schema/data change: identity plus ordered forward and
/// backward operation sequences.
#[derive(Debug, Clone)]
pub struct MigrationUnit {
    key: UnitKey,
    name: UnitName,
    forward: Vec<Operation>,
    backward: Vec<Operation>,
}

impl MigrationUnit {
    /// Build a unit from explicit forward and backward sequences.
    ///
    /// The backward sequence is conventionally the inverse of the forward
    /// sequence in reverse order, but the author owns that pairing; only
    /// per-operation validity is checked here.
    pub fn new(
        key: UnitKey,
        name: UnitName,
        forward: Vec<Operation>,
        backward: Vec<Operation>,
    ) -> CoreResult<Self> {
        for op in forward.iter().chain(backward.iter()) {
            op.validate()?;
        }
        Ok(Self {
            key,
            name,
            forward,
            backward,
        })
    }

    /// Build a unit whose backward sequence is synthesized by inverting the
    /// forward operations in reverse order.
    ///
    /// Fails with [`CoreError::NotInvertible`] if any forward operation has
    /// no synthesizable inverse (raw statements).
    pub fn auto_reversible(
        key: UnitKey,
        name: UnitName,
        forward: Vec<Operation>,
    ) -> CoreResult<Self> {
        let mut backward = Vec::with_capacity(forward.len());
        for (index, op) in forward.iter().enumerate().rev() {
            let inverse = op.invert().ok_or_else(|| CoreError::NotInvertible {
                unit: name.as_str().to_string(),
                index,
                operation: op.to_string(),
            })?;
            backward.push(inverse);
        }
        Self::new(key, name, forward, backward)
    }

    /// Build an explicitly irreversible unit (empty backward sequence).
    ///
    /// Used for one-way data transformations, e.g. consolidating one table's
    /// rows into another and dropping the source.
    pub fn irreversible(key: UnitKey, name: UnitName, forward: Vec<Operation>) -> CoreResult<Self> {
        Self::new(key, name, forward, Vec::new())
    }

    pub fn key(&self) -> &UnitKey {
        &self.key
    }

    pub fn name(&self) -> &UnitName {
        &self.name
    }

    /// Ordered operation sequence to apply.
    pub fn forward(&self) -> &[Operation] {
        &self.forward
    }

    /// Ordered operation sequence to undo. Empty for irreversible units.
    pub fn backward(&self) -> &[Operation] {
        &self.backward
    }

    /// A unit with no backward operations cannot be reverted without force.
    pub fn is_irreversible(&self) -> bool {
        self.backward.is_empty()
    }
}

#[cfg(test)]
#[path = "unit_test.rs"]
mod tests;
