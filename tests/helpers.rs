//! Shared test utilities for chipsec-build tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use chipsec_build::build::{BuildContext, ExtensionBuilder, ExtensionTarget};
use chipsec_build::error::{BuildError, ToolError};
use chipsec_build::platform::PlatformCapabilities;
use chipsec_build::process::{Cmd, CommandResult, ExternalTool};

/// Test environment with a mock chipsec source tree and an empty
/// build-output directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Live source tree
    pub source_root: PathBuf,
    /// Build-output tree (not created)
    pub build_lib: PathBuf,
    /// Install prefix (not created)
    pub prefix: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path();

        let source_root = base.join("src");
        create_mock_source_tree(&source_root);

        Self {
            build_lib: base.join("build/lib"),
            prefix: base.join("prefix"),
            source_root,
            _temp_dir: temp_dir,
        }
    }

    pub fn context(&self, os_id: &str) -> BuildContext {
        BuildContext::new(&self.source_root, PlatformCapabilities::detect_from(os_id))
    }

    /// Staging parent the driver build uses under the build-output tree.
    pub fn staging_parent(&self) -> PathBuf {
        self.build_lib.join("drivers")
    }
}

/// Create a minimal chipsec source tree.
pub fn create_mock_source_tree(root: &Path) {
    let files: &[(&str, &str)] = &[
        ("chipsec/VERSION", "1.2.5\n"),
        ("README", "CHIPSEC: Platform Security Assessment Framework\n"),
        ("chipsec-manual.pdf", "%PDF-1.4\n"),
        ("chipsec_main.py", "def main(): pass\n"),
        ("chipsec_util.py", "def main(): pass\n"),
        ("chipsec/__init__.py", ""),
        ("chipsec/WARNING.txt", "warning\n"),
        ("chipsec/chipset.py", "# chipset\n"),
        ("chipsec/cfg/__init__.py", ""),
        ("chipsec/cfg/common.xml", "<configuration/>\n"),
        ("chipsec/helper/__init__.py", ""),
        ("chipsec/helper/linux/__init__.py", ""),
        ("chipsec/helper/linux/helper.py", "# linux helper\n"),
        ("chipsec/helper/linux/cores.c", "int cores(void) { return 1; }\n"),
        ("chipsec/helper/win/__init__.py", ""),
        ("chipsec/helper/win/win7_amd64/chipsec_hlpr.sys", "sys\n"),
        ("chipsec/helper/win/win7_x86/chipsec_hlpr.sys", "sys\n"),
        ("drivers/linux/Makefile", "obj-m += chipsec.o\n"),
        ("drivers/linux/chipsec_km.c", "/* driver */\n"),
        ("drivers/linux/include/chipsec.h", "/* header */\n"),
        ("chipsec_tools/compression/linux/LzmaCompress", "bin\n"),
        ("chipsec_tools/compression/linux/TianoCompress", "bin\n"),
        ("chipsec_tools/compression/win/TianoCompress.exe", "exe\n"),
        ("tests/__init__.py", ""),
    ];

    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create mock dir");
        fs::write(&path, content).expect("Failed to write mock file");
    }
}

/// What [`FakeMake`] does when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MakeOutcome {
    /// Exit 0 and write `chipsec.ko` into the working directory
    Produce,
    /// Exit 0 without writing anything
    NoArtifact,
    /// Exit 2 with a diagnostic on stderr
    Fail,
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct MakeCall {
    pub working_dir: PathBuf,
    pub args: Vec<String>,
    /// Whether the staged Makefile was present at invocation time
    pub saw_makefile: bool,
}

/// Stands in for `make`; records every invocation.
pub struct FakeMake {
    outcome: MakeOutcome,
    pub calls: RefCell<Vec<MakeCall>>,
}

impl FakeMake {
    pub fn new(outcome: MakeOutcome) -> Self {
        Self {
            outcome,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

pub const FAKE_DRIVER: &str = "fake kernel module\n";
pub const FAKE_DIAGNOSTIC: &str = "chipsec_km.c:1: error: boom";

impl ExternalTool for FakeMake {
    fn invoke(&self, working_dir: &Path, tool_args: &[String]) -> Result<CommandResult, ToolError> {
        self.calls.borrow_mut().push(MakeCall {
            working_dir: working_dir.to_path_buf(),
            args: tool_args.to_vec(),
            saw_makefile: working_dir.join("Makefile").is_file(),
        });

        match self.outcome {
            MakeOutcome::Produce => {
                fs::write(working_dir.join("chipsec.ko"), FAKE_DRIVER)
                    .expect("Failed to write fake driver");
                Cmd::new("true").run()
            }
            MakeOutcome::NoArtifact => Cmd::new("true").run(),
            MakeOutcome::Fail => Cmd::new("sh")
                .arg("-c")
                .arg(format!("echo '{}' >&2; exit 2", FAKE_DIAGNOSTIC))
                .dir(working_dir)
                .run(),
        }
    }
}

/// Stands in for the C compiler; writes a placeholder module.
pub struct FakeCompiler {
    fail: bool,
    pub built: RefCell<Vec<String>>,
}

impl FakeCompiler {
    pub fn ok() -> Self {
        Self {
            fail: false,
            built: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            built: RefCell::new(Vec::new()),
        }
    }
}

impl ExtensionBuilder for FakeCompiler {
    fn build(
        &self,
        target: &ExtensionTarget,
        _source_root: &Path,
        output: &Path,
    ) -> Result<(), BuildError> {
        if self.fail {
            let source = Cmd::new("false").run().unwrap_err();
            return Err(BuildError::Baseline {
                target: target.name.clone(),
                source,
            });
        }
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        fs::write(output, "compiled\n").unwrap();
        self.built.borrow_mut().push(target.name.clone());
        Ok(())
    }
}

/// Assert a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.is_file(), "Expected file to exist: {}", path.display());
}

/// Assert a path does not exist.
pub fn assert_missing(path: &Path) {
    assert!(!path.exists(), "Expected path to be absent: {}", path.display());
}
