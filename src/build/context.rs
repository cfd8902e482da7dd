//! Build context shared by the extension build, the driver build and the
//! manifest.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::platform::PlatformCapabilities;

/// Where the sources live and what the platform builds.
///
/// Capabilities are computed once and every consumer reads the same value.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Live source tree
    pub source_root: PathBuf,
    pub capabilities: PlatformCapabilities,
}

impl BuildContext {
    pub fn new(source_root: &Path, capabilities: PlatformCapabilities) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            capabilities,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.source_root, config.capabilities())
    }
}
