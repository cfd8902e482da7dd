//! Fixed source-tree layout.
//!
//! Paths are relative to the source root and use `/` separators.

/// Kernel driver sources, copied into the build tree before `make` runs.
pub const DRIVER_SOURCE_DIR: &str = "drivers/linux";

/// Staging parent under the build-output tree. Removed after every driver build.
pub const STAGING_PARENT: &str = "drivers";

/// Driver binary produced by `make`, relative to the staging directory.
pub const DRIVER_ARTIFACT: &str = "chipsec.ko";

/// Where the driver binary lands, under either the source or build-output tree.
pub const LINUX_HELPER_DIR: &str = "chipsec/helper/linux";

pub const LINUX_PAYLOAD_DIR: &str = "chipsec_tools/compression/linux";
pub const WINDOWS_PAYLOAD_DIR: &str = "chipsec_tools/compression/win";

/// Compiled helper declared on linux.
pub const LINUX_EXTENSION_NAME: &str = "chipsec.helper.linux.cores";
pub const LINUX_EXTENSION_SOURCE: &str = "chipsec/helper/linux/cores.c";

pub const WINDOWS_HELPER_PACKAGE: &str = "chipsec.helper.win";
pub const WINDOWS_HELPER_PATTERN: &str = "win7_amd64/*.sys";
pub const WINDOWS_REQUIREMENT: &str = "pywin32";

pub const VERSION_FILE: &str = "chipsec/VERSION";
pub const README_FILE: &str = "README";
pub const MANUAL_FILE: &str = "chipsec-manual.pdf";

/// Default build-output tree, relative to the source root.
pub const DEFAULT_BUILD_LIB: &str = "build/lib";

/// Install record written at the root of an install prefix.
pub const INSTALL_RECORD: &str = "install-record.json";
