//! Sources command - lists files a source distribution needs for native builds.

use anyhow::Result;

use crate::config::Config;
use crate::manifest::source_files;

/// Execute the sources command.
pub fn cmd_sources(config: &Config) -> Result<()> {
    for file in source_files(&config.capabilities(), &config.source_root)? {
        println!("{}", file);
    }
    Ok(())
}
