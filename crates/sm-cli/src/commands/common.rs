//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sm_core::config::Config;
use sm_core::target::{Target, TargetKind, TargetResolver};
use sm_db::DuckDbBackend;
use sm_runner::{CancelToken, RetryPolicy, Runner};
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;
use crate::units;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is a control-flow mechanism, not a
        // user-facing error.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Loaded deployment state shared by every command.
pub(crate) struct AppContext {
    pub config: Config,
    pub resolver: TargetResolver,
}

impl AppContext {
    /// Load the config named by `--config` and resolve its targets.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let config = Config::load(Path::new(&global.config))
            .with_context(|| format!("Failed to load config from {}", global.config))?;
        let resolver = TargetResolver::from_config(&config).context("Invalid target layout")?;
        if global.verbose {
            eprintln!(
                "[verbose] Loaded deployment '{}' with {} target(s)",
                config.name,
                resolver.targets().len()
            );
        }
        Ok(Self { config, resolver })
    }

    /// Resolve a target id or fail with the known ids listed.
    pub fn resolve(&self, id: &str) -> Result<&Target> {
        self.resolver.resolve(id).ok_or_else(|| {
            let known: Vec<&str> = self
                .resolver
                .targets()
                .iter()
                .map(|t| t.id.as_str())
                .collect();
            anyhow::anyhow!("Unknown target '{}'. Known targets: {}", id, known.join(", "))
        })
    }

    /// Build a runner over the registry for `kind`, using the configured
    /// retry policy.
    pub fn runner_for(&self, kind: TargetKind) -> Result<Runner> {
        let registry = units::registry_for(kind)
            .with_context(|| format!("Invalid {kind} migration registry"))?;
        Ok(Runner::with_retry(
            registry,
            RetryPolicy::from_config(&self.config.retry),
        ))
    }
}

/// Open the target's database file (or in-memory database).
pub(crate) fn open_database(target: &Target) -> Result<DuckDbBackend> {
    DuckDbBackend::new(&target.database)
        .with_context(|| format!("Failed to open database for target '{}'", target.id))
}

/// Cancel `token` on the first Ctrl-C. The in-flight unit still completes;
/// the run stops at the next between-units check.
pub(crate) fn cancel_on_ctrl_c(token: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupt received, stopping after the current unit...");
            token.cancel();
        }
    });
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
