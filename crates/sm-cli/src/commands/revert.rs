//! Revert command implementation

use anyhow::{Context, Result};
use sm_core::unit::UnitKey;
use sm_runner::{CancelToken, RevertOptions};

use crate::cli::{GlobalArgs, RevertArgs};
use crate::commands::common::{cancel_on_ctrl_c, open_database, AppContext};

/// Execute the revert command
pub async fn execute(args: &RevertArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let target = ctx.resolve(&args.target)?;
    let runner = ctx.runner_for(target.kind)?;

    let down_to = args
        .down_to
        .as_deref()
        .map(UnitKey::new)
        .transpose()
        .context("Invalid --down-to value")?;

    let cancel = CancelToken::new();
    cancel_on_ctrl_c(cancel.clone());
    let opts = RevertOptions {
        down_to,
        force: args.force,
        cancel,
    };

    if global.verbose {
        eprintln!(
            "[verbose] Reverting target '{}' ({}, schema '{}')",
            target.id, target.database, target.schema
        );
    }
    let db = open_database(target)?;
    let report = runner.revert(&db, target, &opts).await?;

    if report.reverted.is_empty() {
        println!("  ✓ {} nothing to revert", report.target);
    } else {
        println!(
            "  ✓ {} reverted {} unit(s), now at {}",
            report.target,
            report.reverted.len(),
            report
                .last_applied
                .as_ref()
                .map(|k| k.as_str())
                .unwrap_or("<none>")
        );
    }
    if report.cancelled {
        println!("    run cancelled before completion");
    }
    Ok(())
}
