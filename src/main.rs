//! chipsec-build - builds and packages chipsec.
//!
//! Builds the compiled helper extension and, on linux, the chipsec kernel
//! driver, then composes the platform-specific package manifest.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use chipsec_build::commands;
use chipsec_build::commands::manifest::ManifestAction;
use chipsec_build::config::Config;
use chipsec_build::install::{BuildExtOptions, InstallOptions};

#[derive(Parser)]
#[command(name = "chipsec-build")]
#[command(about = "chipsec build and packaging pipeline")]
#[command(
    after_help = "QUICK START:\n  chipsec-build preflight           Check tools and source tree\n  chipsec-build build-ext --inplace  Build helper and driver into the source tree\n  chipsec-build install --prefix P   Build and install into P\n  chipsec-build clean                Remove leftover staging"
)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build compiled extensions and the kernel driver
    BuildExt {
        /// Build-output tree (default: CHIPSEC_BUILD_LIB)
        #[arg(long)]
        build_lib: Option<PathBuf>,
        /// Place artifacts into the live source tree
        #[arg(long)]
        inplace: bool,
        /// Do not build the kernel driver
        #[arg(long)]
        skip_driver: bool,
    },

    /// Stage sources, build, and install into a prefix
    Install {
        /// Install prefix
        #[arg(long)]
        prefix: PathBuf,
        /// Build-output tree (default: CHIPSEC_BUILD_LIB)
        #[arg(long)]
        build_lib: Option<PathBuf>,
        /// Do not build the kernel driver
        #[arg(long)]
        skip_driver: bool,
    },

    /// Print the package manifest as JSON
    Manifest {
        /// Write to a file instead of stdout
        #[arg(short, long, conflicts_with = "check")]
        output: Option<PathBuf>,
        /// Fail if a saved manifest no longer matches the source tree
        #[arg(long)]
        check: Option<PathBuf>,
    },

    /// List native-build sources a source distribution must carry
    Sources,

    /// Run preflight checks
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },

    /// Clean build artifacts (default: leftover driver staging)
    Clean {
        /// Remove the whole build-output tree
        #[arg(long, conflicts_with = "inplace")]
        all: bool,
        /// Remove artifacts of in-place builds from the source tree
        #[arg(long)]
        inplace: bool,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show detected platform capabilities
    Platform,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let base_dir = std::env::current_dir()?;
    let config = Config::load(&base_dir);

    match cli.command {
        Commands::BuildExt {
            build_lib,
            inplace,
            skip_driver,
        } => {
            let options = BuildExtOptions {
                build_lib,
                inplace,
                skip_driver: skip_driver.then_some(true),
            };
            commands::cmd_build_ext(&config, options)?;
        }

        Commands::Install {
            prefix,
            build_lib,
            skip_driver,
        } => {
            let options = InstallOptions {
                prefix,
                build_lib,
                skip_driver: skip_driver.then_some(true),
            };
            commands::cmd_install(&config, options)?;
        }

        Commands::Manifest { output, check } => {
            let action = match (output.as_deref(), check.as_deref()) {
                (_, Some(path)) => ManifestAction::Check(path),
                (Some(path), None) => ManifestAction::Save(path),
                (None, None) => ManifestAction::Print,
            };
            commands::cmd_manifest(&config, action)?;
        }

        Commands::Sources => {
            commands::cmd_sources(&config)?;
        }

        Commands::Preflight { strict } => {
            commands::cmd_preflight(&config, strict)?;
        }

        Commands::Clean { all, inplace } => {
            let target = if all {
                commands::clean::CleanTarget::All
            } else if inplace {
                commands::clean::CleanTarget::InPlace
            } else {
                commands::clean::CleanTarget::Staging
            };
            commands::cmd_clean(&config, target)?;
        }

        Commands::Show { what } => {
            let target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Platform => commands::show::ShowTarget::Platform,
            };
            commands::cmd_show(target, &config)?;
        }
    }

    Ok(())
}
