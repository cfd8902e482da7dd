//! Show command - displays information.

use anyhow::Result;

use crate::build::declared_extensions;
use crate::config::Config;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration
    Config,
    /// Show detected platform capabilities
    Platform,
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget, config: &Config) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::Platform => {
            let caps = config.capabilities();
            println!("Platform: {}", caps.category());
            println!("  Driver build: {}", yes_no(caps.supports_driver_build()));
            println!("  Platform extension: {}", yes_no(caps.has_platform_extension()));
            match caps.platform_payload_root() {
                Some(root) => println!("  Payload directory: {}", root.display()),
                None => println!("  Payload directory: none"),
            }
            for ext in declared_extensions(&caps) {
                println!("  Extension: {} <- {}", ext.name, ext.sources.join(", "));
            }
        }
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
