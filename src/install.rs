//! The install verb.
//!
//! Install stages python sources into the build-output tree, runs the
//! extension build with the install's `skip_driver` setting, then copies the
//! build tree and data files into the prefix and records what it wrote.
//!
//! `skip_driver` is captured here and handed to the extension build as a
//! plain argument. An unset flag resolves to `false`.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::build::context::BuildContext;
use crate::build::driver::{BuildExt, BuildReport};
use crate::build::extension::ExtensionBuilder;
use crate::common::{
    copy_file_with_dirs, copy_tree, module_to_path, sha256_file, to_manifest_path,
    write_file_with_dirs,
};
use crate::error::InstallError;
use crate::layout;
use crate::manifest::{Package, PackageManifest, PackageMetadata};
use crate::process::ExternalTool;
use crate::timing::Timer;

/// Options given to the install verb.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Install prefix
    pub prefix: PathBuf,
    /// Build-output tree; falls back to the configured default
    pub build_lib: Option<PathBuf>,
    /// `None` when the flag was not given
    pub skip_driver: Option<bool>,
}

/// Options given to the build-extensions verb, before resolution.
#[derive(Debug, Clone, Default)]
pub struct BuildExtOptions {
    pub build_lib: Option<PathBuf>,
    pub inplace: bool,
    pub skip_driver: Option<bool>,
}

/// Build-extensions options with every value decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBuildExt {
    pub build_lib: PathBuf,
    pub inplace: bool,
    pub skip_driver: bool,
}

impl BuildExtOptions {
    /// Fill unset values from the install that triggered this build, if any,
    /// then from defaults.
    pub fn finalize(self, install: Option<&InstallOptions>, default_build_lib: &Path) -> ResolvedBuildExt {
        let skip_driver = self
            .skip_driver
            .or_else(|| install.and_then(|i| i.skip_driver))
            .unwrap_or(false);
        let build_lib = self
            .build_lib
            .or_else(|| install.and_then(|i| i.build_lib.clone()))
            .unwrap_or_else(|| default_build_lib.to_path_buf());

        ResolvedBuildExt {
            build_lib,
            inplace: self.inplace,
            skip_driver,
        }
    }
}

/// One installed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Relative to the prefix, `/`-separated
    pub path: String,
    pub sha256: String,
    pub size: u64,
}

/// Written to `<prefix>/install-record.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallRecord {
    pub name: String,
    pub version: String,
    pub files: Vec<RecordEntry>,
    pub manifest: PackageManifest,
}

#[derive(Debug)]
pub struct InstallReport {
    pub build: BuildReport,
    pub staged_sources: usize,
    pub record_path: PathBuf,
    pub files: Vec<RecordEntry>,
}

pub struct Installer<'a> {
    ctx: &'a BuildContext,
    extensions: &'a dyn ExtensionBuilder,
    tool: &'a dyn ExternalTool,
}

impl<'a> Installer<'a> {
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

    pub fn run(
        &self,
        options: &InstallOptions,
        default_build_lib: &Path,
    ) -> Result<InstallReport, InstallError> {
        let package = Package::assemble(self.ctx)?;
        let build = BuildExtOptions::default().finalize(Some(options), default_build_lib);
        tracing::info!(
            version = %package.metadata.version,
            platform = %package.manifest.platform,
            skip_driver = build.skip_driver,
            "installing"
        );

        let t = Timer::start("build_py", &build.build_lib);
        let staged_sources = build_py(&package.manifest, &self.ctx.source_root, &build.build_lib)?;
        t.finish();

        let build_report = BuildExt::new(self.ctx, self.extensions, self.tool).build_extensions(
            &build.build_lib,
            build.inplace,
            build.skip_driver,
        )?;

        let t = Timer::start("install", &options.prefix);
        let lib_dir = options.prefix.join("lib");
        copy_tree(&build.build_lib, &lib_dir)
            .map_err(InstallError::io(format!("copying build tree into {}", lib_dir.display())))?;
        let mut installed = collect_files(&lib_dir)?;
        installed.extend(install_data(&package.manifest, &self.ctx.source_root, &options.prefix)?);
        t.finish();

        let files = record_entries(&options.prefix, installed)?;
        let record_path = options.prefix.join(layout::INSTALL_RECORD);
        write_record(&record_path, &package.metadata, &package.manifest, &files)?;

        Ok(InstallReport {
            build: build_report,
            staged_sources,
            record_path,
            files,
        })
    }
}

/// Copy python sources and package data into the build tree.
///
/// Returns the number of files staged.
pub fn build_py(
    manifest: &PackageManifest,
    source_root: &Path,
    build_lib: &Path,
) -> Result<usize, InstallError> {
    let mut staged = 0;

    for package in &manifest.packages {
        let rel = module_to_path(package);
        let pkg_src = source_root.join(&rel);
        let pkg_dst = build_lib.join(&rel);
        let data = package_data_globs(&manifest.patterns_for(package))?;

        for entry in WalkDir::new(&pkg_src).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| InstallError::Io {
                context: format!("walking {}", pkg_src.display()),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_rel = to_manifest_path(&pkg_src, entry.path());
            let is_module = entry.depth() == 1 && file_rel.ends_with(".py");
            if is_module || data.is_match(&file_rel) {
                let dst = pkg_dst.join(&file_rel);
                copy_file_with_dirs(entry.path(), &dst)
                    .map_err(InstallError::io(format!("staging {}", entry.path().display())))?;
                staged += 1;
            }
        }
    }

    for module in &manifest.py_modules {
        let file = format!("{}.py", module_to_path(module));
        let src = source_root.join(&file);
        if !src.is_file() {
            tracing::warn!(module = %module, "module file not found, skipping");
            continue;
        }
        copy_file_with_dirs(&src, &build_lib.join(&file))
            .map_err(InstallError::io(format!("staging {}", src.display())))?;
        staged += 1;
    }

    Ok(staged)
}

/// Copy each data-file entry into `<prefix>/<destination>`.
pub fn install_data(
    manifest: &PackageManifest,
    source_root: &Path,
    prefix: &Path,
) -> Result<Vec<PathBuf>, InstallError> {
    let mut installed = Vec::new();
    for entry in &manifest.data_files {
        let dest_dir = prefix.join(&entry.destination);
        for file in &entry.files {
            let src = source_root.join(file);
            let name = src.file_name().ok_or_else(|| InstallError::Io {
                context: format!("data file entry '{}' has no file name", file),
                source: std::io::ErrorKind::InvalidInput.into(),
            })?;
            let dst = dest_dir.join(name);
            copy_file_with_dirs(&src, &dst)
                .map_err(InstallError::io(format!("installing data file {}", src.display())))?;
            installed.push(dst);
        }
    }
    Ok(installed)
}

fn package_data_globs(patterns: &[&str]) -> Result<GlobSet, InstallError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| InstallError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| InstallError::Pattern {
        pattern: patterns.join(","),
        source,
    })
}

fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, InstallError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| InstallError::Io {
            context: format!("walking {}", dir.display()),
            source: e.into(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn record_entries(prefix: &Path, files: Vec<PathBuf>) -> Result<Vec<RecordEntry>, InstallError> {
    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        let size = fs::metadata(&file)
            .map_err(InstallError::io(format!("reading {}", file.display())))?
            .len();
        let sha256 =
            sha256_file(&file).map_err(InstallError::io(format!("hashing {}", file.display())))?;
        entries.push(RecordEntry {
            path: to_manifest_path(prefix, &file),
            sha256,
            size,
        });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries.dedup_by(|a, b| a.path == b.path);
    Ok(entries)
}

fn write_record(
    path: &Path,
    metadata: &PackageMetadata,
    manifest: &PackageManifest,
    files: &[RecordEntry],
) -> Result<(), InstallError> {
    let record = InstallRecord {
        name: metadata.name.clone(),
        version: metadata.version.clone(),
        files: files.to_vec(),
        manifest: manifest.clone(),
    };
    let json = serde_json::to_string_pretty(&record).map_err(|e| InstallError::Io {
        context: "serializing install record".to_string(),
        source: e.into(),
    })?;
    write_file_with_dirs(path, json)
        .map_err(InstallError::io(format!("writing {}", path.display())))
}
