//! Status command implementation

use anyhow::Result;
use sm_core::target::{Target, TargetKind};
use sm_runner::{Runner, TargetStatus};

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{open_database, AppContext};

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let catalog_runner = ctx.runner_for(TargetKind::Catalog)?;
    let tenant_runner = ctx.runner_for(TargetKind::Tenant)?;

    let targets: Vec<&Target> = match args.target.as_deref() {
        Some(id) => vec![ctx.resolve(id)?],
        None => ctx.resolver.targets().iter().collect(),
    };

    let mut statuses = Vec::with_capacity(targets.len());
    for target in targets {
        let runner: &Runner = match target.kind {
            TargetKind::Catalog => &catalog_runner,
            TargetKind::Tenant => &tenant_runner,
        };
        let db = open_database(target)?;
        statuses.push(runner.status(&db, target).await?);
    }

    match args.output {
        OutputFormat::Table => print_table(&statuses),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&statuses)?),
    }
    Ok(())
}

fn print_table(statuses: &[TargetStatus]) {
    let target_width = statuses
        .iter()
        .map(|s| s.target.len())
        .max()
        .unwrap_or(6)
        .max(6);

    println!(
        "{:<target_width$}  {:<14}  {:>7}  {}",
        "TARGET", "LAST APPLIED", "PENDING", "STATE"
    );
    for status in statuses {
        let last = status
            .last_applied
            .as_ref()
            .map(|k| k.as_str())
            .unwrap_or("-");
        let state = if status.drifted {
            "drifted"
        } else if status.pending_count > 0 {
            "pending"
        } else {
            "current"
        };
        println!(
            "{:<target_width$}  {:<14}  {:>7}  {}",
            status.target, last, status.pending_count, state
        );
    }
}
