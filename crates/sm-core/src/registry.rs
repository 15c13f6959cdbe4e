//! The known-unit registry.
//!
//! An immutable, passed-in value constructed once per run invocation.
//! Construction sorts units by ordering key and fails fast on key
//! collisions, so every later consumer can rely on strict ascending order.

use crate::error::{CoreError, CoreResult};
use crate::unit::{MigrationUnit, UnitKey};

/// Ordered, immutable set of all known migration units for one schema line.
#[derive(Debug, Clone)]
pub struct Registry {
    units: Vec<MigrationUnit>,
}

impl Registry {
    /// Build a registry, sorting by key and rejecting duplicate keys.
    pub fn new(mut units: Vec<MigrationUnit>) -> CoreResult<Self> {
        units.sort_by(|a, b| a.key().cmp(b.key()));
        for pair in units.windows(2) {
            if pair[0].key() == pair[1].key() {
                return Err(CoreError::DuplicateOrderingKey {
                    key: pair[0].key().to_string(),
                    first: pair[0].name().to_string(),
                    second: pair[1].name().to_string(),
                });
            }
        }
        Ok(Self { units })
    }

    /// All units in ascending key order.
    pub fn units(&self) -> &[MigrationUnit] {
        &self.units
    }

    /// Look up a unit by its ordering key.
    pub fn get(&self, key: &UnitKey) -> Option<&MigrationUnit> {
        self.units.iter().find(|u| u.key() == key)
    }

    /// Whether the registry knows the given key.
    pub fn contains(&self, key: &UnitKey) -> bool {
        self.get(key).is_some()
    }

    /// The highest ordering key, if the registry is non-empty.
    pub fn latest_key(&self) -> Option<&UnitKey> {
        self.units.last().map(|u| u.key())
    }

    /// Units ordered strictly after `last`, or all units when `last` is
    /// `None`. With a strict-prefix history this is exactly the pending set.
    pub fn pending_after<'a>(
        &'a self,
        last: Option<&'a UnitKey>,
    ) -> impl Iterator<Item = &'a MigrationUnit> {
        self.units
            .iter()
            .filter(move |u| last.map_or(true, |k| u.key() > k))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
