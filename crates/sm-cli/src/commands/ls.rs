//! List command implementation

use anyhow::Result;
use serde::Serialize;
use sm_core::target::TargetKind;

use crate::cli::{GlobalArgs, LsArgs, OutputFormat};
use crate::units;

/// One migration unit as displayed by `sm ls`.
#[derive(Debug, Serialize)]
struct UnitInfo {
    kind: String,
    key: String,
    name: String,
    operations: usize,
    reversible: bool,
}

/// Execute the ls command
pub async fn execute(args: &LsArgs, _global: &GlobalArgs) -> Result<()> {
    let mut units_info = Vec::new();
    for kind in [TargetKind::Catalog, TargetKind::Tenant] {
        let registry = units::registry_for(kind)?;
        for unit in registry.units() {
            units_info.push(UnitInfo {
                kind: kind.to_string(),
                key: unit.key().to_string(),
                name: unit.name().to_string(),
                operations: unit.forward().len(),
                reversible: !unit.is_irreversible(),
            });
        }
    }

    match args.output {
        OutputFormat::Table => print_table(&units_info),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&units_info)?),
    }
    Ok(())
}

fn print_table(units: &[UnitInfo]) {
    let name_width = units.iter().map(|u| u.name.len()).max().unwrap_or(4).max(4);

    println!(
        "{:<7}  {:<14}  {:<name_width$}  {:>3}  {}",
        "KIND", "KEY", "NAME", "OPS", "REVERSIBLE"
    );
    for unit in units {
        println!(
            "{:<7}  {:<14}  {:<name_width$}  {:>3}  {}",
            unit.kind,
            unit.key,
            unit.name,
            unit.operations,
            if unit.reversible { "yes" } else { "no" }
        );
    }
}
