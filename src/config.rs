//! Configuration management for chipsec-build.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over .env file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::layout;
use crate::platform::PlatformCapabilities;

/// chipsec-build configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Live source tree (default: base directory)
    pub source_root: PathBuf,
    /// Build-output tree (default: <source_root>/build/lib)
    pub build_lib: PathBuf,
    /// Program used to build the kernel driver
    pub make: String,
    /// C compiler for the helper extension
    pub cc: String,
    /// Extra compiler flags
    pub cflags: Vec<String>,
    /// OS identifier used for platform decisions
    pub platform_id: String,
}

impl Config {
    /// Load configuration from `<base_dir>/.env` and the environment.
    pub fn load(base_dir: &Path) -> Self {
        let mut env_vars = HashMap::new();

        let env_path = base_dir.join(".env");
        if env_path.exists() {
            match dotenvy::from_path_iter(&env_path) {
                Ok(iter) => {
                    for item in iter {
                        match item {
                            Ok((key, value)) => {
                                env_vars.insert(key, value);
                            }
                            Err(e) => {
                                tracing::warn!(path = %env_path.display(), error = %e, "skipping malformed .env line");
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %env_path.display(), error = %e, "could not read .env");
                }
            }
        }

        // Environment variables override .env file
        env_vars.extend(std::env::vars());

        Self::from_vars(base_dir, &env_vars)
    }

    /// Build a config from an explicit variable map.
    pub fn from_vars(base_dir: &Path, vars: &HashMap<String, String>) -> Self {
        let resolve = |s: &str, against: &Path| {
            let path = PathBuf::from(s);
            if path.is_absolute() {
                path
            } else {
                against.join(path)
            }
        };

        let source_root = vars
            .get("CHIPSEC_SOURCE_ROOT")
            .map(|s| resolve(s, base_dir))
            .unwrap_or_else(|| base_dir.to_path_buf());

        let build_lib = vars
            .get("CHIPSEC_BUILD_LIB")
            .map(|s| resolve(s, base_dir))
            .unwrap_or_else(|| source_root.join(layout::DEFAULT_BUILD_LIB));

        let make = vars
            .get("MAKE")
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| "make".to_string());

        let cc = vars
            .get("CC")
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| "cc".to_string());

        let cflags = vars
            .get("CFLAGS")
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let platform_id = vars
            .get("CHIPSEC_PLATFORM")
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| std::env::consts::OS.to_string());

        Self {
            source_root,
            build_lib,
            make,
            cc,
            cflags,
            platform_id,
        }
    }

    /// Platform capabilities for the configured OS identifier.
    pub fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities::detect_from(&self.platform_id)
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  CHIPSEC_SOURCE_ROOT: {}", self.source_root.display());
        println!("  CHIPSEC_BUILD_LIB: {}", self.build_lib.display());
        println!("  MAKE: {}", self.make);
        println!("  CC: {}", self.cc);
        println!("  CFLAGS: {}", self.cflags.join(" "));
        println!(
            "  CHIPSEC_PLATFORM: {} ({})",
            self.platform_id,
            self.capabilities().category()
        );
        if self.source_root.join(layout::VERSION_FILE).exists() {
            println!("  Source tree: FOUND");
        } else {
            println!("  Source tree: NOT FOUND (no {})", layout::VERSION_FILE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformCategory;
    use serial_test::serial;
    use std::fs;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let base = Path::new("/work/chipsec");
        let config = Config::from_vars(base, &HashMap::new());

        assert_eq!(config.source_root, base);
        assert_eq!(config.build_lib, base.join("build/lib"));
        assert_eq!(config.make, "make");
        assert_eq!(config.cc, "cc");
        assert!(config.cflags.is_empty());
        assert_eq!(config.platform_id, std::env::consts::OS);
    }

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let base = Path::new("/work");
        let config = Config::from_vars(
            base,
            &vars(&[("CHIPSEC_SOURCE_ROOT", "chipsec"), ("CHIPSEC_BUILD_LIB", "/tmp/out")]),
        );
        assert_eq!(config.source_root, PathBuf::from("/work/chipsec"));
        assert_eq!(config.build_lib, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_build_lib_follows_source_root() {
        let config = Config::from_vars(Path::new("/work"), &vars(&[("CHIPSEC_SOURCE_ROOT", "/src")]));
        assert_eq!(config.build_lib, PathBuf::from("/src/build/lib"));
    }

    #[test]
    fn test_cflags_split_on_whitespace() {
        let config = Config::from_vars(Path::new("/"), &vars(&[("CFLAGS", " -O2   -Wall ")]));
        assert_eq!(config.cflags, vec!["-O2", "-Wall"]);
    }

    #[test]
    fn test_platform_override() {
        let config = Config::from_vars(Path::new("/"), &vars(&[("CHIPSEC_PLATFORM", "Windows")]));
        assert_eq!(config.capabilities().category(), PlatformCategory::Windows);
    }

    #[test]
    fn test_blank_make_falls_back_to_default() {
        let config = Config::from_vars(Path::new("/"), &vars(&[("MAKE", "  ")]));
        assert_eq!(config.make, "make");
    }

    #[test]
    #[serial]
    fn test_load_reads_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".env"),
            "# build settings\n\nCC=\"clang\"\n",
        )
        .unwrap();

        std::env::remove_var("CC");
        let config = Config::load(dir.path());
        assert_eq!(config.cc, "clang");
        assert_eq!(config.source_root, dir.path());
    }

    #[test]
    #[serial]
    fn test_environment_overrides_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "MAKE=gmake\n").unwrap();

        std::env::set_var("MAKE", "bmake");
        let config = Config::load(dir.path());
        std::env::remove_var("MAKE");

        assert_eq!(config.make, "bmake");
    }
}
