//! Build-ext command - builds compiled extensions and the kernel driver.

use anyhow::{Context, Result};

use crate::build::{BuildContext, BuildExt, BuildReport, CcBuilder};
use crate::config::Config;
use crate::install::BuildExtOptions;
use crate::process::Make;

/// Execute the build-ext command.
pub fn cmd_build_ext(config: &Config, options: BuildExtOptions) -> Result<()> {
    let resolved = options.finalize(None, &config.build_lib);
    let ctx = BuildContext::from_config(config);
    let compiler = CcBuilder::new(&config.cc, config.cflags.clone());
    let make = Make::new(&config.make);

    println!(
        "Building extensions for {} ({})...",
        ctx.capabilities.category(),
        if resolved.inplace {
            "in place".to_string()
        } else {
            resolved.build_lib.display().to_string()
        }
    );

    let report = BuildExt::new(&ctx, &compiler, &make)
        .build_extensions(&resolved.build_lib, resolved.inplace, resolved.skip_driver)
        .context("build_ext failed")?;

    print_report(&report);
    Ok(())
}

pub(crate) fn print_report(report: &BuildReport) {
    for ext in &report.extensions {
        println!("  [OK] {}", ext.display());
    }
    match &report.driver {
        Some(driver) => println!("  [OK] {} (sha256 {})", driver.path.display(), driver.sha256),
        None => println!("  [SKIP] kernel driver"),
    }
}
