//! Python package discovery and the source-distribution file list.

use std::path::Path;

use walkdir::WalkDir;

use crate::build::extension::declared_extensions;
use crate::common::{list_files, to_manifest_path};
use crate::error::EnumerationError;
use crate::layout;
use crate::platform::PlatformCapabilities;

const INIT_FILE: &str = "__init__.py";

/// Find every package under `source_root`, as sorted dotted names.
///
/// A directory is a package if it holds `__init__.py`; the walk does not
/// descend into non-package directories, so build trees and checkouts of
/// other projects are never picked up. `tests` and its subpackages are
/// excluded.
pub fn find_packages(source_root: &Path) -> Result<Vec<String>, EnumerationError> {
    if !source_root.is_dir() {
        return Err(EnumerationError::Missing {
            path: source_root.to_path_buf(),
        });
    }

    let walker = WalkDir::new(source_root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let hidden = e.file_name().to_string_lossy().starts_with('.');
            e.file_type().is_dir() && !hidden && e.path().join(INIT_FILE).is_file()
        });

    let mut packages = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| EnumerationError::Walk {
            path: source_root.to_path_buf(),
            source,
        })?;
        let name = to_manifest_path(source_root, entry.path()).replace('/', ".");
        if name == "tests" || name.starts_with("tests.") {
            continue;
        }
        packages.push(name);
    }
    packages.sort();
    Ok(packages)
}

/// Files a source distribution must carry for the native builds.
///
/// Declared extension sources first, then on linux every file of the driver
/// source tree in walk order.
pub fn source_files(
    capabilities: &PlatformCapabilities,
    source_root: &Path,
) -> Result<Vec<String>, EnumerationError> {
    let mut files: Vec<String> = declared_extensions(capabilities)
        .into_iter()
        .flat_map(|target| target.sources)
        .collect();

    if capabilities.supports_driver_build() {
        let driver_src = source_root.join(layout::DRIVER_SOURCE_DIR);
        files.extend(
            list_files(&driver_src)?
                .iter()
                .map(|f| to_manifest_path(source_root, f)),
        );
    }
    Ok(files)
}
