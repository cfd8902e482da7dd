//! Package manifest composition.
//!
//! The manifest says what goes into the installable package: package-data
//! patterns, payload directories to ship verbatim, compiled extensions, and
//! extra install-time requirements. Platform-specific parts are driven by
//! [`PlatformCapabilities`] alone.
//!
//! Composition must be reproducible: two runs over the same tree on the same
//! platform produce byte-identical JSON. Every map is a `BTreeMap`, every
//! enumerated file list comes from a sorted walk, and all paths are rendered
//! source-relative with `/` separators.

pub mod metadata;
pub mod packages;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::build::context::BuildContext;
use crate::build::extension::{declared_extensions, ExtensionTarget};
use crate::common::{list_files, to_manifest_path};
use crate::error::{EnumerationError, PackageError};
use crate::layout;
use crate::platform::{PlatformCapabilities, PlatformCategory};

pub use metadata::PackageMetadata;
pub use packages::{find_packages, source_files};

/// Top-level modules shipped outside any package.
pub const PY_MODULES: &[&str] = &["chipsec_main", "chipsec_util"];

/// A directory-shaped payload: files installed under `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFiles {
    /// Destination relative to the install prefix (empty for the prefix itself)
    pub destination: String,
    /// Source-relative file paths
    pub files: Vec<String>,
}

/// Declarative description of the package contents for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub platform: PlatformCategory,
    /// Dotted package names
    pub packages: Vec<String>,
    pub py_modules: Vec<String>,
    /// Package name ("" for every package) -> glob patterns relative to the package
    pub package_data: BTreeMap<String, Vec<String>>,
    pub data_files: Vec<DataFiles>,
    pub ext_modules: Vec<ExtensionTarget>,
    pub install_requires: Vec<String>,
}

impl PackageManifest {
    /// Manifest with no packages discovered and no platform additions.
    pub fn base(platform: PlatformCategory) -> Self {
        let mut package_data = BTreeMap::new();
        package_data.insert(
            String::new(),
            strings(&["*.ini", "*.cfg", "*.json"]),
        );
        package_data.insert("chipsec".to_string(), strings(&["VERSION", "WARNING.txt"]));
        package_data.insert("chipsec.cfg".to_string(), strings(&["*.xml", "*.xsd"]));

        Self {
            platform,
            packages: Vec::new(),
            py_modules: strings(PY_MODULES),
            package_data,
            data_files: vec![DataFiles {
                destination: String::new(),
                files: strings(&[layout::MANUAL_FILE]),
            }],
            ext_modules: Vec::new(),
            install_requires: Vec::new(),
        }
    }

    /// Pretty JSON, newline-terminated.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Save manifest to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        crate::common::write_file_with_dirs(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    /// Load manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Names of the top-level fields that differ from `other`, in
    /// serialization order.
    pub fn differences(&self, other: &Self) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.platform != other.platform {
            changed.push("platform");
        }
        if self.packages != other.packages {
            changed.push("packages");
        }
        if self.py_modules != other.py_modules {
            changed.push("py_modules");
        }
        if self.package_data != other.package_data {
            changed.push("package_data");
        }
        if self.data_files != other.data_files {
            changed.push("data_files");
        }
        if self.ext_modules != other.ext_modules {
            changed.push("ext_modules");
        }
        if self.install_requires != other.install_requires {
            changed.push("install_requires");
        }
        changed
    }

    /// Package-data patterns that apply to `package`, shared ones first.
    pub fn patterns_for(&self, package: &str) -> Vec<&str> {
        let shared = self.package_data.get("").into_iter().flatten();
        let own = if package.is_empty() {
            None
        } else {
            self.package_data.get(package)
        };
        shared
            .chain(own.into_iter().flatten())
            .map(String::as_str)
            .collect()
    }
}

/// Compose the manifest for `capabilities` over the tree at `source_root`.
///
/// Payload directories named by the platform must exist: a missing one is an
/// error, never an empty file list.
pub fn compose(
    capabilities: &PlatformCapabilities,
    source_root: &Path,
) -> Result<PackageManifest, EnumerationError> {
    let mut manifest = PackageManifest::base(capabilities.category());
    manifest.packages = find_packages(source_root)?;

    match capabilities.category() {
        PlatformCategory::Windows => {
            manifest.package_data.insert(
                layout::WINDOWS_HELPER_PACKAGE.to_string(),
                strings(&[layout::WINDOWS_HELPER_PATTERN]),
            );
            manifest
                .install_requires
                .push(layout::WINDOWS_REQUIREMENT.to_string());
        }
        PlatformCategory::Linux => {}
        PlatformCategory::Other => return Ok(manifest),
    }

    if let Some(payload) = capabilities.platform_payload_root() {
        manifest.data_files.push(payload_entry(source_root, payload)?);
    }
    manifest.ext_modules = declared_extensions(capabilities);

    Ok(manifest)
}

/// Compose from a build context.
pub fn compose_for(ctx: &BuildContext) -> Result<PackageManifest, EnumerationError> {
    compose(&ctx.capabilities, &ctx.source_root)
}

/// Metadata plus manifest: everything the install step needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub metadata: PackageMetadata,
    pub manifest: PackageManifest,
}

impl Package {
    /// Load metadata first, so missing static inputs fail before anything
    /// else is read.
    pub fn assemble(ctx: &BuildContext) -> Result<Self, PackageError> {
        let metadata = PackageMetadata::load(&ctx.source_root)?;
        let manifest = compose_for(ctx)?;
        Ok(Self { metadata, manifest })
    }
}

fn payload_entry(source_root: &Path, payload: &Path) -> Result<DataFiles, EnumerationError> {
    let files = list_files(&source_root.join(payload))?
        .iter()
        .map(|f| to_manifest_path(source_root, f))
        .collect();
    Ok(DataFiles {
        destination: to_manifest_path(Path::new(""), payload),
        files,
    })
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
