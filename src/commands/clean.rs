//! Clean command - removes build artifacts.

use anyhow::Result;

use crate::clean;
use crate::config::Config;

/// Clean target for the clean command.
pub enum CleanTarget {
    /// Leftover driver staging only (default)
    Staging,
    /// The whole build-output tree
    All,
    /// Artifacts of in-place builds in the source tree
    InPlace,
}

/// Execute the clean command.
pub fn cmd_clean(config: &Config, target: CleanTarget) -> Result<()> {
    match target {
        CleanTarget::Staging => {
            clean::clean_build(&config.build_lib, &config.source_root)?;
        }
        CleanTarget::All => {
            clean::clean_all(&config.build_lib, &config.source_root)?;
        }
        CleanTarget::InPlace => {
            clean::clean_inplace(&config.source_root, &config.capabilities())?;
        }
    }
    Ok(())
}
