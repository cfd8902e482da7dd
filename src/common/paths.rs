//! Path helpers for manifest entries.

use std::path::{Component, Path};

/// Render `path` relative to `root` with `/` separators.
///
/// Manifest entries are compared byte-for-byte across runs and hosts, so
/// they never carry the checkout location or a platform separator. Paths
/// outside `root` are rendered as given.
pub fn to_manifest_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Dotted module name to a relative path (`a.b.c` -> `a/b/c`).
pub fn module_to_path(module: &str) -> String {
    module.replace('.', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_to_manifest_path_strips_root() {
        let root = PathBuf::from("/src/chipsec");
        let path = root.join("chipsec_tools").join("compression").join("linux").join("lzma");
        assert_eq!(
            to_manifest_path(&root, &path),
            "chipsec_tools/compression/linux/lzma"
        );
    }

    #[test]
    fn test_module_to_path() {
        assert_eq!(module_to_path("chipsec.helper.linux.cores"), "chipsec/helper/linux/cores");
        assert_eq!(module_to_path("chipsec"), "chipsec");
    }
}
