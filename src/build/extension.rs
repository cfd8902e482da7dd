//! Baseline compiled-extension build.
//!
//! Runs before the driver build. A failure here aborts the whole step, so
//! the driver is never built on top of a broken extension build.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::module_to_path;
use crate::error::BuildError;
use crate::layout;
use crate::platform::{PlatformCapabilities, PlatformCategory};
use crate::process::Cmd;

/// A compiled extension module declared by the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionTarget {
    /// Dotted module name (`chipsec.helper.linux.cores`)
    pub name: String,
    /// Source files, relative to the source root
    pub sources: Vec<String>,
}

impl ExtensionTarget {
    pub fn new(name: &str, sources: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Output file relative to the destination root.
    pub fn output_path(&self, category: PlatformCategory) -> PathBuf {
        let ext = match category {
            PlatformCategory::Windows => "pyd",
            _ => "so",
        };
        PathBuf::from(format!("{}.{}", module_to_path(&self.name), ext))
    }
}

/// Extension targets declared for a platform.
pub fn declared_extensions(capabilities: &PlatformCapabilities) -> Vec<ExtensionTarget> {
    if capabilities.has_platform_extension() {
        vec![ExtensionTarget::new(
            layout::LINUX_EXTENSION_NAME,
            &[layout::LINUX_EXTENSION_SOURCE],
        )]
    } else {
        Vec::new()
    }
}

/// Compiles one extension target.
pub trait ExtensionBuilder {
    /// Compile `target` from `source_root` into `output` (an absolute file path).
    fn build(
        &self,
        target: &ExtensionTarget,
        source_root: &Path,
        output: &Path,
    ) -> Result<(), BuildError>;
}

/// Builds extensions with the system C compiler.
#[derive(Debug, Clone)]
pub struct CcBuilder {
    cc: String,
    cflags: Vec<String>,
}

impl CcBuilder {
    pub fn new(cc: impl Into<String>, cflags: Vec<String>) -> Self {
        Self {
            cc: cc.into(),
            cflags,
        }
    }
}

impl ExtensionBuilder for CcBuilder {
    fn build(
        &self,
        target: &ExtensionTarget,
        source_root: &Path,
        output: &Path,
    ) -> Result<(), BuildError> {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)
                .map_err(BuildError::io(format!("creating {}", parent.display())))?;
        }

        let result = Cmd::new(&self.cc)
            .args(["-shared", "-fPIC"])
            .args(&self.cflags)
            .arg("-o")
            .arg_path(output)
            .args(&target.sources)
            .dir(source_root)
            .run()
            .map_err(|source| BuildError::Baseline {
                target: target.name.clone(),
                source,
            })?;

        if !result.stderr_trimmed().is_empty() {
            tracing::warn!(target = %target.name, "{}", result.stderr_trimmed());
        }
        Ok(())
    }
}

/// Build every declared extension into `dest_root`.
///
/// Returns the absolute paths of the built modules.
pub fn build_declared(
    builder: &dyn ExtensionBuilder,
    capabilities: &PlatformCapabilities,
    source_root: &Path,
    dest_root: &Path,
) -> Result<Vec<PathBuf>, BuildError> {
    let mut built = Vec::new();
    for target in declared_extensions(capabilities) {
        let output = dest_root.join(target.output_path(capabilities.category()));
        tracing::info!(target = %target.name, output = %output.display(), "building extension");
        builder.build(&target, source_root, &output)?;
        built.push(output);
    }
    Ok(built)
}
