//! Manifest command - prints, saves, or checks the package manifest.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::build::BuildContext;
use crate::config::Config;
use crate::manifest::{self, PackageManifest};

/// What the manifest command does with the composed manifest.
pub enum ManifestAction<'a> {
    Print,
    Save(&'a Path),
    /// Compare against a previously saved manifest
    Check(&'a Path),
}

/// Execute the manifest command.
pub fn cmd_manifest(config: &Config, action: ManifestAction<'_>) -> Result<()> {
    let ctx = BuildContext::from_config(config);
    let manifest = manifest::compose_for(&ctx).context("composing manifest")?;

    match action {
        ManifestAction::Print => print!("{}", manifest.to_json()?),
        ManifestAction::Save(path) => {
            manifest.save(path)?;
            println!("Manifest written to {}", path.display());
        }
        ManifestAction::Check(path) => {
            let saved = PackageManifest::load(path)
                .with_context(|| format!("loading {}", path.display()))?;
            let changed = manifest.differences(&saved);
            if !changed.is_empty() {
                bail!(
                    "Manifest at {} is out of date (changed: {})",
                    path.display(),
                    changed.join(", ")
                );
            }
            println!("Manifest at {} is up to date.", path.display());
        }
    }
    Ok(())
}
