//! Shared filesystem utilities.

pub mod files;
pub mod paths;
pub mod temp;

pub use files::{copy_file_with_dirs, copy_tree, list_files, sha256_file, write_file_with_dirs};
pub use paths::{module_to_path, to_manifest_path};
pub use temp::{overlaps_source_tree, prepare_work_dir, remove_dir_if_exists, ScopedDir};
