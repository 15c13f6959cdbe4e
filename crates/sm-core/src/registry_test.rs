use super::*;
use crate::operation::{ColumnDef, Operation, TableDef};
use crate::unit::UnitName;

fn unit(key: &str, name: &str) -> MigrationUnit {
    MigrationUnit::auto_reversible(
        UnitKey::new(key).unwrap(),
        UnitName::new(name),
        vec![Operation::CreateTable(TableDef::new(
            "master",
            name,
            vec![ColumnDef::new("id", "UUID")],
            vec!["id".to_string()],
        ))],
    )
    .unwrap()
}

#[test]
fn test_registry_sorts_by_key() {
    let registry = Registry::new(vec![
        unit("20260115205433", "later"),
        unit("20250820131457", "earlier"),
        unit("20250908190749", "middle"),
    ])
    .unwrap();

    let keys: Vec<&str> = registry.units().iter().map(|u| u.key().as_str()).collect();
    assert_eq!(
        keys,
        vec!["20250820131457", "20250908190749", "20260115205433"]
    );
}

#[test]
fn test_registry_rejects_duplicate_keys() {
    let result = Registry::new(vec![
        unit("20250820131457", "first"),
        unit("20250820131457", "second"),
    ]);
    assert!(matches!(
        result.unwrap_err(),
        CoreError::DuplicateOrderingKey { .. }
    ));
}

#[test]
fn test_lookup_and_latest() {
    let registry = Registry::new(vec![
        unit("20250820131457", "a"),
        unit("20250908190749", "b"),
    ])
    .unwrap();

    let key = UnitKey::new("20250908190749").unwrap();
    assert_eq!(registry.get(&key).unwrap().name().as_str(), "b");
    assert!(registry.contains(&key));
    assert_eq!(registry.latest_key().unwrap(), &key);
    assert!(!registry.contains(&UnitKey::new("20990101000000").unwrap()));
}

#[test]
fn test_pending_after() {
    let registry = Registry::new(vec![
        unit("20250820131457", "a"),
        unit("20250908190749", "b"),
        unit("20250922002511", "c"),
    ])
    .unwrap();

    let last = UnitKey::new("20250820131457").unwrap();
    let pending: Vec<&str> = registry
        .pending_after(Some(&last))
        .map(|u| u.key().as_str())
        .collect();
    assert_eq!(pending, vec!["20250908190749", "20250922002511"]);

    assert_eq!(registry.pending_after(None).count(), 3);
}

#[test]
fn test_empty_registry() {
    let registry = Registry::new(vec![]).unwrap();
    assert!(registry.is_empty());
    assert!(registry.latest_key().is_none());
}
