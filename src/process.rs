//! External process execution.
//!
//! All child processes go through [`Cmd`], which always captures stdout and
//! stderr so that a failing tool's diagnostics can be handed back to the
//! user verbatim. There is no timeout: a hung tool blocks the caller until it
//! exits or the whole process is interrupted.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crate::error::ToolError;

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit status of the command.
    pub status: ExitStatus,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

impl CommandResult {
    /// Returns true if the command exited successfully.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get the exit code, or -1 if terminated by signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// Builder for configuring command execution.
#[derive(Debug, Clone)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    /// If true, don't fail on non-zero exit.
    allow_fail: bool,
}

impl Cmd {
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_string(),
            args: Vec::new(),
            current_dir: None,
            allow_fail: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string()));
        self
    }

    /// Add a path as an argument.
    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.to_string_lossy().into_owned());
        self
    }

    /// Set the working directory.
    pub fn dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    /// Allow non-zero exit codes without failing.
    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    /// Command line as it would be typed, for logging.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command to completion and capture its output.
    pub fn run(self) -> Result<CommandResult, ToolError> {
        tracing::debug!(command = %self.display(), dir = ?self.current_dir, "running");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| ToolError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let result = CommandResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !self.allow_fail && !result.success() {
            return Err(ToolError::NonZeroExit {
                program: self.program,
                code: result.code(),
                output: result,
            });
        }

        Ok(result)
    }
}

/// An out-of-process build tool run against a directory.
///
/// The driver build only cares about pass/fail plus captured output, so this
/// is the seam tests use to stand in for `make`.
pub trait ExternalTool {
    fn invoke(&self, working_dir: &Path, tool_args: &[String])
        -> Result<CommandResult, ToolError>;
}

/// `make`, or whatever program `MAKE` names.
#[derive(Debug, Clone)]
pub struct Make {
    program: String,
}

impl Make {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Make {
    fn default() -> Self {
        Self::new("make")
    }
}

impl ExternalTool for Make {
    fn invoke(
        &self,
        working_dir: &Path,
        tool_args: &[String],
    ) -> Result<CommandResult, ToolError> {
        Cmd::new(&self.program)
            .arg("-C")
            .arg_path(working_dir)
            .args(tool_args)
            .run()
    }
}

/// Check if a program can be found on PATH.
pub fn exists(program: &str) -> bool {
    which::which(program).is_ok()
}
