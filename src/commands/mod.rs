//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `build_ext` - Build compiled extensions and the kernel driver
//! - `install` - Stage, build and install into a prefix
//! - `manifest` - Print, save or check the package manifest
//! - `sources` - List native-build sources for a source distribution
//! - `clean` - Clean build artifacts
//! - `show` - Display information
//! - `preflight` - Run preflight checks

pub mod build_ext;
pub mod clean;
pub mod install;
pub mod manifest;
mod preflight;
mod sources;
pub mod show;

pub use build_ext::cmd_build_ext;
pub use clean::cmd_clean;
pub use install::cmd_install;
pub use manifest::cmd_manifest;
pub use preflight::cmd_preflight;
pub use show::cmd_show;
pub use sources::cmd_sources;
