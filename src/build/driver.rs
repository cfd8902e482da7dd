//! Extension build with the out-of-tree kernel driver.
//!
//! On linux the driver sources are copied into `<output>/drivers/linux`,
//! built there with `make -C`, and the resulting `chipsec.ko` is copied into
//! the helper directory of either the live source tree (in-place builds) or
//! the build-output tree. The staging parent `<output>/drivers` is removed
//! afterwards, so it may neither hold the live source tree nor sit in or
//! over its driver sources.

use std::path::{Path, PathBuf};

use crate::build::context::BuildContext;
use crate::build::extension::{build_declared, ExtensionBuilder};
use crate::common::{
    copy_file_with_dirs, copy_tree, overlaps_source_tree, prepare_work_dir, sha256_file, ScopedDir,
};
use crate::error::BuildError;
use crate::layout;
use crate::process::ExternalTool;
use crate::timing::Timer;

/// The driver binary after it has been placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedDriver {
    pub path: PathBuf,
    pub sha256: String,
}

/// What a `build_extensions` run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub extensions: Vec<PathBuf>,
    pub driver: Option<PlacedDriver>,
}

/// The build-extensions step.
pub struct BuildExt<'a> {
    ctx: &'a BuildContext,
    extensions: &'a dyn ExtensionBuilder,
    tool: &'a dyn ExternalTool,
}

impl<'a> BuildExt<'a> {
    pub fn new(
        ctx: &'a BuildContext,
        extensions: &'a dyn ExtensionBuilder,
        tool: &'a dyn ExternalTool,
    ) -> Self {
        Self {
            ctx,
            extensions,
            tool,
        }
    }

    /// Build the declared extensions, then the driver where applicable.
    ///
    /// Steps run strictly in order and the first failure aborts the rest.
    pub fn build_extensions(
        &self,
        output_root: &Path,
        in_place: bool,
        skip_driver: bool,
    ) -> Result<BuildReport, BuildError> {
        let caps = &self.ctx.capabilities;
        let source_root = &self.ctx.source_root;

        let ext_dest = if in_place { source_root.as_path() } else { output_root };
        let t = Timer::start("extensions", ext_dest);
        let extensions = build_declared(self.extensions, caps, source_root, ext_dest)?;
        t.finish();

        if !caps.supports_driver_build() || skip_driver {
            tracing::debug!(
                platform = %caps.category(),
                skip_driver,
                "driver build not applicable"
            );
            return Ok(BuildReport {
                extensions,
                driver: None,
            });
        }

        let t = Timer::start("driver", output_root);
        let driver = self.build_driver(output_root, in_place)?;
        t.finish();

        Ok(BuildReport {
            extensions,
            driver: Some(driver),
        })
    }

    fn build_driver(&self, output_root: &Path, in_place: bool) -> Result<PlacedDriver, BuildError> {
        let source_root = &self.ctx.source_root;
        let driver_src = source_root.join(layout::DRIVER_SOURCE_DIR);
        if !driver_src.is_dir() {
            return Err(BuildError::DriverSourceMissing { path: driver_src });
        }

        let staging_parent = output_root.join(layout::STAGING_PARENT);
        let overlaps = overlaps_source_tree(&staging_parent, source_root)
            .map_err(BuildError::io(format!("resolving {}", staging_parent.display())))?;
        if overlaps {
            return Err(BuildError::StagingOverlapsSource {
                path: staging_parent,
            });
        }

        let staging_guard = ScopedDir::new(staging_parent.clone());
        let staging = prepare_work_dir(staging_guard.path(), "linux")
            .map_err(BuildError::io(format!("preparing {}", staging_guard.path().display())))?;
        let copied = copy_tree(&driver_src, &staging)
            .map_err(BuildError::io(format!("staging {}", driver_src.display())))?;
        tracing::info!(files = copied, staging = %staging.display(), "staged driver sources");

        let output = self
            .tool
            .invoke(&staging, &[])
            .map_err(|source| BuildError::ExternalToolFailed {
                staging: staging.clone(),
                source,
            })?;
        tracing::debug!(stdout = %output.stdout_trimmed(), "driver build output");

        let artifact = staging.join(layout::DRIVER_ARTIFACT);
        if !artifact.is_file() {
            return Err(BuildError::ArtifactMissing { path: artifact });
        }

        let dest_root = if in_place {
            source_root.as_path()
        } else {
            output_root
        };
        let dest = dest_root
            .join(layout::LINUX_HELPER_DIR)
            .join(layout::DRIVER_ARTIFACT);
        copy_file_with_dirs(&artifact, &dest)
            .map_err(BuildError::io(format!("copying driver to {}", dest.display())))?;
        let sha256 = sha256_file(&dest)
            .map_err(BuildError::io(format!("hashing {}", dest.display())))?;
        tracing::info!(dest = %dest.display(), %sha256, "placed driver");

        staging_guard
            .remove()
            .map_err(BuildError::io(format!("removing {}", staging_parent.display())))?;

        Ok(PlacedDriver { path: dest, sha256 })
    }
}
