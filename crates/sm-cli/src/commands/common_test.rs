use super::*;
use sm_core::target::TargetKind;
use std::fs;

fn global_for(config_path: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        config: config_path.display().to_string(),
    }
}

#[test]
fn test_load_resolves_targets() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("stratum.yml");
    fs::write(
        &config_path,
        r#"
name: acme-saas
catalog:
  database: ":memory:"
tenants:
  - id: acme
    database: ":memory:"
  - id: globex
    database: ":memory:"
"#,
    )
    .unwrap();

    let ctx = AppContext::load(&global_for(&config_path)).unwrap();
    assert_eq!(ctx.resolver.targets().len(), 3);
    assert_eq!(ctx.resolver.catalog().schema, "master");
    assert!(ctx.resolve("acme").is_ok());
}

#[test]
fn test_resolve_unknown_target_lists_known_ids() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("stratum.yml");
    fs::write(
        &config_path,
        r#"
name: acme-saas
catalog:
  database: ":memory:"
tenants:
  - id: acme
    database: ":memory:"
"#,
    )
    .unwrap();

    let ctx = AppContext::load(&global_for(&config_path)).unwrap();
    let err = ctx.resolve("initech").unwrap_err().to_string();
    assert!(err.contains("initech"));
    assert!(err.contains("acme"));
}

#[test]
fn test_load_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = AppContext::load(&global_for(&dir.path().join("absent.yml")));
    assert!(result.is_err());
}

#[test]
fn test_runner_for_uses_configured_retry() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("stratum.yml");
    fs::write(
        &config_path,
        r#"
name: acme-saas
catalog:
  database: ":memory:"
retry:
  max_attempts: 5
  base_delay_ms: 10
"#,
    )
    .unwrap();

    let ctx = AppContext::load(&global_for(&config_path)).unwrap();
    assert_eq!(ctx.config.retry.max_attempts, 5);
    let runner = ctx.runner_for(TargetKind::Catalog).unwrap();
    assert_eq!(runner.registry().len(), 5);
}
