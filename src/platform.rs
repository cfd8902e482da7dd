//! Host platform classification.
//!
//! Both the driver build and the manifest branch on the host OS. They share
//! one [`PlatformCapabilities`] value computed up front so the two can never
//! disagree about what platform they are on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::layout;

/// The closed set of platform categories the packaging cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformCategory {
    Windows,
    Linux,
    Other,
}

impl PlatformCategory {
    /// Classify an OS identifier, case-insensitively.
    ///
    /// Anything that isn't windows or linux is `Other`; that is a supported
    /// outcome ("no native extras"), not an error.
    pub fn from_os_id(os_id: &str) -> Self {
        match os_id.trim().to_ascii_lowercase().as_str() {
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }

    /// Classify the OS this binary is running on.
    pub fn current() -> Self {
        Self::from_os_id(std::env::consts::OS)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PlatformCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What native pieces the host platform builds and ships.
///
/// Only constructible through [`PlatformCapabilities::for_category`] so the
/// fields always agree with the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCapabilities {
    category: PlatformCategory,
    supports_driver_build: bool,
    has_platform_extension: bool,
    platform_payload_root: Option<PathBuf>,
}

impl PlatformCapabilities {
    pub fn for_category(category: PlatformCategory) -> Self {
        match category {
            PlatformCategory::Linux => Self {
                category,
                supports_driver_build: true,
                has_platform_extension: true,
                platform_payload_root: Some(PathBuf::from(layout::LINUX_PAYLOAD_DIR)),
            },
            PlatformCategory::Windows => Self {
                category,
                supports_driver_build: false,
                has_platform_extension: false,
                platform_payload_root: Some(PathBuf::from(layout::WINDOWS_PAYLOAD_DIR)),
            },
            PlatformCategory::Other => Self {
                category,
                supports_driver_build: false,
                has_platform_extension: false,
                platform_payload_root: None,
            },
        }
    }

    /// Capabilities of the host.
    pub fn detect() -> Self {
        Self::for_category(PlatformCategory::current())
    }

    /// Capabilities for an explicit OS identifier (e.g. from `CHIPSEC_PLATFORM`).
    pub fn detect_from(os_id: &str) -> Self {
        Self::for_category(PlatformCategory::from_os_id(os_id))
    }

    pub fn category(&self) -> PlatformCategory {
        self.category
    }

    /// The kernel driver is built on this platform.
    pub fn supports_driver_build(&self) -> bool {
        self.supports_driver_build
    }

    /// A compiled helper extension is declared on this platform.
    pub fn has_platform_extension(&self) -> bool {
        self.has_platform_extension
    }

    /// Source-relative directory of platform tool binaries, if any.
    pub fn platform_payload_root(&self) -> Option<&PathBuf> {
        self.platform_payload_root.as_ref()
    }
}
