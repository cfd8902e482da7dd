//! Install command - stages sources, builds, and installs into a prefix.

use anyhow::{Context, Result};

use crate::build::{BuildContext, CcBuilder};
use crate::commands::build_ext::print_report;
use crate::config::Config;
use crate::install::{InstallOptions, Installer};
use crate::process::Make;

/// Execute the install command.
pub fn cmd_install(config: &Config, options: InstallOptions) -> Result<()> {
    let ctx = BuildContext::from_config(config);
    let compiler = CcBuilder::new(&config.cc, config.cflags.clone());
    let make = Make::new(&config.make);

    println!("Installing into {}...", options.prefix.display());
    let report = Installer::new(&ctx, &compiler, &make)
        .run(&options, &config.build_lib)
        .context("install failed")?;

    println!("  Staged {} python source files", report.staged_sources);
    print_report(&report.build);
    println!(
        "  Installed {} files, record at {}",
        report.files.len(),
        report.record_path.display()
    );
    Ok(())
}
