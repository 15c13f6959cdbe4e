//! Reconcile command implementation

use anyhow::Result;
use sm_runner::CancelToken;

use crate::cli::{GlobalArgs, ReconcileArgs};
use crate::commands::common::{cancel_on_ctrl_c, open_database, AppContext};

/// Execute the reconcile command
pub async fn execute(args: &ReconcileArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let target = ctx.resolve(&args.target)?;
    let runner = ctx.runner_for(target.kind)?;

    let cancel = CancelToken::new();
    cancel_on_ctrl_c(cancel.clone());

    if global.verbose {
        eprintln!(
            "[verbose] Reconciling target '{}' ({}, schema '{}')",
            target.id, target.database, target.schema
        );
    }
    let db = open_database(target)?;
    let report = runner.reconcile(&db, target, &cancel).await?;

    if report.applied.is_empty() {
        println!("  ✓ {} has no missing units", report.target);
    } else {
        println!(
            "  ✓ {} filled {} missing unit(s): {}",
            report.target,
            report.applied.len(),
            report
                .applied
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if report.skipped_guards > 0 {
        println!(
            "    {} guarded statement(s) skipped as already applied",
            report.skipped_guards
        );
    }
    if report.cancelled {
        println!("    run cancelled before completion");
    }
    Ok(())
}
