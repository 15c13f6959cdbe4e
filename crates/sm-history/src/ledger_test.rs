use super::*;
use chrono::TimeZone;
use sm_core::operation::{ColumnDef, Operation, TableDef};
use sm_core::unit::{MigrationUnit, UnitName};
use sm_db::DuckDbBackend;

fn key(s: &str) -> UnitKey {
    UnitKey::new(s).unwrap()
}

fn applied_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 52, 52).unwrap()
}

fn registry(keys: &[&str]) -> Registry {
    let units = keys
        .iter()
        .map(|k| {
            MigrationUnit::auto_reversible(
                key(k),
                UnitName::new(format!("unit_{k}")),
                vec![Operation::CreateTable(TableDef::new(
                    "master",
                    format!("t{k}"),
                    vec![ColumnDef::new("id", "UUID")],
                    vec!["id".to_string()],
                ))],
            )
            .unwrap()
        })
        .collect();
    Registry::new(units).unwrap()
}

#[tokio::test]
async fn test_ensure_is_idempotent() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new();
    ledger.ensure(&db).await.unwrap();
    ledger.ensure(&db).await.unwrap();
    assert!(db.relation_exists("sm_meta.schema_migrations").await.unwrap());
}

#[tokio::test]
async fn test_record_and_applied_ordering() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new();
    ledger.ensure(&db).await.unwrap();

    // Insert out of key order; applied() must come back sorted
    ledger
        .record(&db, "catalog", &key("20250908190749"), applied_at())
        .await
        .unwrap();
    ledger
        .record(&db, "catalog", &key("20250820131457"), applied_at())
        .await
        .unwrap();

    let applied = ledger.applied(&db, "catalog").await.unwrap();
    assert_eq!(
        applied,
        vec![key("20250820131457"), key("20250908190749")]
    );
}

#[tokio::test]
async fn test_targets_are_isolated() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new();
    ledger.ensure(&db).await.unwrap();

    ledger
        .record(&db, "catalog", &key("20250820131457"), applied_at())
        .await
        .unwrap();

    assert_eq!(ledger.applied(&db, "catalog").await.unwrap().len(), 1);
    assert!(ledger.applied(&db, "acme").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new();
    ledger.ensure(&db).await.unwrap();

    ledger
        .record(&db, "catalog", &key("20250820131457"), applied_at())
        .await
        .unwrap();
    ledger
        .remove(&db, "catalog", &key("20250820131457"))
        .await
        .unwrap();

    assert!(ledger.applied(&db, "catalog").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_record_rolls_back_with_transaction() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new();
    ledger.ensure(&db).await.unwrap();

    db.begin().await.unwrap();
    ledger
        .record(&db, "catalog", &key("20250820131457"), applied_at())
        .await
        .unwrap();
    db.rollback().await.unwrap();

    assert!(ledger.applied(&db, "catalog").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_entry_surfaces() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new();
    ledger.ensure(&db).await.unwrap();

    db.execute(
        "INSERT INTO sm_meta.schema_migrations VALUES ('not-a-key', TIMESTAMP '2026-01-15 09:52:52', 'catalog')",
    )
    .await
    .unwrap();

    let result = ledger.applied(&db, "catalog").await;
    assert!(matches!(
        result.unwrap_err(),
        HistoryError::CorruptEntry { .. }
    ));
}

#[test]
fn test_no_drift_on_prefix() {
    let registry = registry(&["20250820131457", "20250908190749", "20250922002511"]);
    let applied = vec![key("20250820131457"), key("20250908190749")];
    assert!(missing_predecessors(&registry, &applied).is_empty());
}

#[test]
fn test_no_drift_on_empty_history() {
    let registry = registry(&["20250820131457"]);
    assert!(missing_predecessors(&registry, &[]).is_empty());
}

#[test]
fn test_gap_is_drift() {
    let registry = registry(&["20250820131457", "20250908190749", "20250922002511"]);
    // Later unit applied while an earlier one is missing
    let applied = vec![key("20250820131457"), key("20250922002511")];
    assert_eq!(
        missing_predecessors(&registry, &applied),
        vec![key("20250908190749")]
    );
}
