//! Apply command implementation

use anyhow::{Context, Result};
use sm_core::target::{Target, TargetKind};
use sm_core::unit::UnitKey;
use sm_runner::{ApplyOptions, ApplyReport, CancelToken, Runner};

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::commands::common::{cancel_on_ctrl_c, open_database, AppContext, ExitCode};

/// Execute the apply command
pub async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;

    let up_to = args
        .up_to
        .as_deref()
        .map(UnitKey::new)
        .transpose()
        .context("Invalid --up-to value")?;

    let cancel = CancelToken::new();
    cancel_on_ctrl_c(cancel.clone());
    let opts = ApplyOptions {
        up_to,
        cancel: cancel.clone(),
    };

    if args.all {
        // Catalog first: tenant provisioning reads the catalog, so its
        // schema must be current before any tenant is touched.
        let catalog_runner = ctx.runner_for(TargetKind::Catalog)?;
        let tenant_runner = ctx.runner_for(TargetKind::Tenant)?;

        let mut failures = 0;
        for target in ctx.resolver.targets() {
            if cancel.is_cancelled() {
                println!("  - {} skipped (cancelled)", target.id);
                continue;
            }
            let runner = match target.kind {
                TargetKind::Catalog => &catalog_runner,
                TargetKind::Tenant => &tenant_runner,
            };
            match apply_target(runner, target, &opts, global).await {
                Ok(report) => print_report(&report),
                Err(e) => {
                    failures += 1;
                    eprintln!("  ✗ {} failed: {:#}", target.id, e);
                }
            }
        }
        if failures > 0 {
            eprintln!("\n{failures} target(s) failed");
            return Err(ExitCode(1).into());
        }
        return Ok(());
    }

    let id = args
        .target
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Specify --target <id> or --all"))?;
    let target = ctx.resolve(id)?;
    let runner = ctx.runner_for(target.kind)?;
    let report = apply_target(&runner, target, &opts, global).await?;
    print_report(&report);
    Ok(())
}

async fn apply_target(
    runner: &Runner,
    target: &Target,
    opts: &ApplyOptions,
    global: &GlobalArgs,
) -> Result<ApplyReport> {
    if global.verbose {
        eprintln!(
            "[verbose] Applying to target '{}' ({}, schema '{}')",
            target.id, target.database, target.schema
        );
    }
    let db = open_database(target)?;
    let report = runner.apply(&db, target, opts).await?;
    Ok(report)
}

fn print_report(report: &ApplyReport) {
    if report.applied.is_empty() {
        println!("  ✓ {} up to date", report.target);
    } else {
        println!(
            "  ✓ {} applied {} unit(s), now at {}",
            report.target,
            report.applied.len(),
            report
                .last_applied
                .as_ref()
                .map(|k| k.as_str())
                .unwrap_or("<none>")
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
}
