//! Build artifact cleaning.

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::build::extension::declared_extensions;
use crate::common::{overlaps_source_tree, remove_dir_if_exists};
use crate::layout;
use crate::platform::PlatformCapabilities;

/// Remove a leftover driver staging area under the build-output tree.
///
/// A successful build removes it already; this only matters after an
/// interrupted one.
pub fn clean_build(build_lib: &Path, source_root: &Path) -> Result<bool> {
    let staging = build_lib.join(layout::STAGING_PARENT);
    refuse_source_overlap(&staging, source_root)?;
    let removed = remove_dir_if_exists(&staging)?;
    if removed {
        println!("Removed {}", staging.display());
    } else {
        println!("No staging area to clean.");
    }
    Ok(removed)
}

/// Remove the whole build-output tree.
pub fn clean_all(build_lib: &Path, source_root: &Path) -> Result<bool> {
    refuse_source_overlap(build_lib, source_root)?;
    if build_lib.exists() {
        println!("Removing {}...", build_lib.display());
    }
    let removed = remove_dir_if_exists(build_lib)?;
    println!("Clean complete.");
    Ok(removed)
}

fn refuse_source_overlap(dir: &Path, source_root: &Path) -> Result<()> {
    if overlaps_source_tree(dir, source_root)? {
        bail!(
            "Refusing to remove {}: it overlaps the source tree at {}. Check CHIPSEC_BUILD_LIB.",
            dir.display(),
            source_root.display()
        );
    }
    Ok(())
}

/// Remove artifacts an in-place build left in the live source tree: the
/// driver binary and the compiled extension modules.
///
/// Returns the number of files removed.
pub fn clean_inplace(source_root: &Path, capabilities: &PlatformCapabilities) -> Result<usize> {
    let mut targets = vec![source_root
        .join(layout::LINUX_HELPER_DIR)
        .join(layout::DRIVER_ARTIFACT)];
    targets.extend(
        declared_extensions(capabilities)
            .iter()
            .map(|ext| source_root.join(ext.output_path(capabilities.category()))),
    );

    let mut removed = 0;
    for target in targets {
        if target.is_file() {
            fs::remove_file(&target)?;
            println!("Removed {}", target.display());
            removed += 1;
        }
    }

    if removed == 0 {
        println!("No in-place artifacts to clean.");
    }
    Ok(removed)
}
