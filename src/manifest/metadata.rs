//! Package metadata read from the source tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigurationError;
use crate::layout;

const CLASSIFIERS: &[&str] = &[
    "Development Status :: 5 - Production/Stable",
    "Environment :: Console",
    "License :: OSI Approved :: GNU General Public License v2 (GPLv2)",
    "Natural Language :: English",
    "Operating System :: Microsoft :: Windows",
    "Operating System :: POSIX :: Linux",
    "Operating System :: MacOS :: MacOS X",
    "Programming Language :: Python :: 2",
    "Programming Language :: Python :: 2.6",
    "Programming Language :: Python :: 2.7",
    "Topic :: Security",
    "Topic :: System :: Hardware",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub long_description: String,
    pub author: String,
    pub author_email: String,
    pub url: String,
    pub download_url: String,
    pub license: String,
    pub platforms: Vec<String>,
    pub classifiers: Vec<String>,
    /// Script name -> `module:function`
    pub console_scripts: BTreeMap<String, String>,
}

impl PackageMetadata {
    /// Read the version file and readme from `source_root`.
    pub fn load(source_root: &Path) -> Result<Self, ConfigurationError> {
        let version = read_required(&source_root.join(layout::VERSION_FILE))?
            .trim()
            .to_string();
        let long_description = read_required(&source_root.join(layout::README_FILE))?;

        let console_scripts = ["chipsec_util", "chipsec_main"]
            .iter()
            .map(|name| (name.to_string(), format!("{}:main", name)))
            .collect();

        Ok(Self {
            name: "chipsec".to_string(),
            version,
            description: "CHIPSEC: Platform Security Assessment Framework".to_string(),
            long_description,
            author: "CHIPSEC Team".to_string(),
            author_email: "chipsec@intel.com".to_string(),
            url: "https://github.com/chipsec/chipsec".to_string(),
            download_url: "https://github.com/chipsec/chipsec".to_string(),
            license: "GNU General Public License v2 (GPLv2)".to_string(),
            platforms: vec!["any".to_string()],
            classifiers: CLASSIFIERS.iter().map(|c| c.to_string()).collect(),
            console_scripts,
        })
    }
}

fn read_required(path: &Path) -> Result<String, ConfigurationError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigurationError::MissingFile {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Err(ConfigurationError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source_tree(version: &str, readme: Option<&str>) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("chipsec")).unwrap();
        fs::write(dir.path().join("chipsec/VERSION"), version).unwrap();
        if let Some(readme) = readme {
            fs::write(dir.path().join("README"), readme).unwrap();
        }
        dir
    }

    #[test]
    fn test_version_is_trimmed() {
        let dir = source_tree("1.2.3\n", Some("CHIPSEC\n"));
        let meta = PackageMetadata::load(dir.path()).unwrap();
        assert_eq!(meta.version, "1.2.3");
        assert_eq!(meta.long_description, "CHIPSEC\n");
        assert_eq!(meta.console_scripts["chipsec_main"], "chipsec_main:main");
    }

    #[test]
    fn test_missing_readme_is_configuration_error() {
        let dir = source_tree("1.2.3", None);
        let err = PackageMetadata::load(dir.path()).unwrap_err();
        match err {
            ConfigurationError::MissingFile { path, .. } => assert!(path.ends_with("README")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_version_is_rejected() {
        let dir = source_tree("  \n", Some("x"));
        let err = PackageMetadata::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyFile { .. }));
    }
}
