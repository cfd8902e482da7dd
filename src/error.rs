//! Error types for the build and packaging pipeline.
//!
//! Every variant here is fatal: nothing in the pipeline retries or recovers
//! locally. Command handlers wrap these in `anyhow` for display.

use std::path::PathBuf;
use thiserror::Error;

use crate::process::CommandResult;

/// Static inputs (version file, readme) are missing or malformed.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("required file {} could not be read", .path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("required file {} is empty", .path.display())]
    EmptyFile { path: PathBuf },
}

/// A payload directory could not be enumerated.
#[derive(Debug, Error)]
pub enum EnumerationError {
    #[error("payload directory {} does not exist", .path.display())]
    Missing { path: PathBuf },

    #[error("payload path {} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to walk {}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// The external process could not be run or exited unsuccessfully.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to execute '{program}'. Is it installed?")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' failed (exit code {code}){}", format_output(.output))]
    NonZeroExit {
        program: String,
        code: i32,
        output: CommandResult,
    },
}

impl ToolError {
    /// Captured output of the failed run, if the process ran at all.
    pub fn output(&self) -> Option<&CommandResult> {
        match self {
            Self::Spawn { .. } => None,
            Self::NonZeroExit { output, .. } => Some(output),
        }
    }
}

/// Errors from the extension and driver build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("baseline extension build failed for {target}")]
    Baseline {
        target: String,
        #[source]
        source: ToolError,
    },

    #[error("driver sources not found at {}", .path.display())]
    DriverSourceMissing { path: PathBuf },

    #[error("staging directory {} would overlap the source tree", .path.display())]
    StagingOverlapsSource { path: PathBuf },

    #[error("driver build failed in {}", .staging.display())]
    ExternalToolFailed {
        staging: PathBuf,
        #[source]
        source: ToolError,
    },

    #[error("external tool reported success but {} was not produced", .path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| Self::Io { context, source }
    }

    /// Captured diagnostic output from whichever tool failed.
    pub fn tool_output(&self) -> Option<&CommandResult> {
        match self {
            Self::Baseline { source, .. } | Self::ExternalToolFailed { source, .. } => {
                source.output()
            }
            _ => None,
        }
    }
}

/// Errors while assembling the package description.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Enumeration(#[from] EnumerationError),
}

/// Errors from the install pipeline.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("invalid package-data pattern '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| Self::Io { context, source }
    }
}

fn format_output(output: &CommandResult) -> String {
    let stdout = output.stdout_trimmed();
    let stderr = output.stderr_trimmed();
    match (stdout.is_empty(), stderr.is_empty()) {
        (true, true) => String::new(),
        (false, true) => format!(":\n{}", stdout),
        (true, false) => format!(":\n{}", stderr),
        (false, false) => format!(":\n{}\n{}", stdout, stderr),
    }
}
