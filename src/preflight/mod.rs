//! Preflight checks.
//!
//! Validates host tools and source-tree inputs before a build.
//! Run with `chipsec-build preflight` to check everything is ready.

mod host_tools;
mod sources;
mod types;

use anyhow::{bail, Result};

use crate::config::Config;

pub use types::{CheckResult, CheckStatus, PreflightReport};

/// Run all preflight checks.
pub fn run_preflight(config: &Config) -> PreflightReport {
    let caps = config.capabilities();
    let mut checks = Vec::new();

    println!("Running preflight checks for {}...\n", caps.category());

    println!("Checking host tools...");
    checks.extend(host_tools::check_host_tools(config, &caps));

    println!("Checking source tree...");
    checks.extend(sources::check_sources(&config.source_root, &caps));

    println!();

    PreflightReport { checks }
}

/// Run preflight and bail if any checks fail.
pub fn run_preflight_or_fail(config: &Config) -> Result<()> {
    let report = run_preflight(config);
    report.print();

    if !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed. Fix the issues above before building.",
            report.fail_count()
        );
    }

    println!("All preflight checks passed!\n");
    Ok(())
}
