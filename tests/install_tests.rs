//! Integration tests for the install pipeline.

mod helpers;

use chipsec_build::error::{BuildError, InstallError, PackageError};
use chipsec_build::install::{InstallOptions, InstallRecord, Installer};
use helpers::{
    assert_file_exists, assert_missing, FakeCompiler, FakeMake, MakeOutcome, TestEnv,
};
use std::fs;

fn options(env: &TestEnv, skip_driver: Option<bool>) -> InstallOptions {
    InstallOptions {
        prefix: env.prefix.clone(),
        build_lib: None,
        skip_driver,
    }
}

#[test]
fn test_install_with_skip_driver() {
    let env = TestEnv::new();
    let ctx = env.context("linux");
    let make = FakeMake::new(MakeOutcome::Produce);
    let compiler = FakeCompiler::ok();

    let report = Installer::new(&ctx, &compiler, &make)
        .run(&options(&env, Some(true)), &env.build_lib)
        .unwrap();

    assert_eq!(make.call_count(), 0);
    assert!(report.build.driver.is_none());
    assert_missing(&env.prefix.join("lib/chipsec/helper/linux/chipsec.ko"));
    assert_file_exists(&env.prefix.join("lib/chipsec/helper/linux/cores.so"));
}

#[test]
fn test_install_unset_skip_driver_builds_driver() {
    let env = TestEnv::new();
    let ctx = env.context("linux");
    let make = FakeMake::new(MakeOutcome::Produce);

    let report = Installer::new(&ctx, &FakeCompiler::ok(), &make)
        .run(&options(&env, None), &env.build_lib)
        .unwrap();

    assert_eq!(make.call_count(), 1);
    assert!(report.build.driver.is_some());
    assert_file_exists(&env.prefix.join("lib/chipsec/helper/linux/chipsec.ko"));
    assert_missing(&env.build_lib.join("drivers"));
}

#[test]
fn test_install_stages_python_sources_and_data() {
    let env = TestEnv::new();
    let ctx = env.context("linux");

    let report = Installer::new(&ctx, &FakeCompiler::ok(), &FakeMake::new(MakeOutcome::Produce))
        .run(&options(&env, None), &env.build_lib)
        .unwrap();

    let lib = env.prefix.join("lib");
    assert_file_exists(&lib.join("chipsec/__init__.py"));
    assert_file_exists(&lib.join("chipsec/chipset.py"));
    assert_file_exists(&lib.join("chipsec/VERSION"));
    assert_file_exists(&lib.join("chipsec/cfg/common.xml"));
    assert_file_exists(&lib.join("chipsec_main.py"));
    assert_file_exists(&lib.join("chipsec_util.py"));
    // Sources of the compiled extension are not shipped
    assert_missing(&lib.join("chipsec/helper/linux/cores.c"));
    // Windows driver binaries only ship on windows
    assert_missing(&lib.join("chipsec/helper/win/win7_amd64/chipsec_hlpr.sys"));
    assert_missing(&lib.join("tests"));

    assert_file_exists(&env.prefix.join("chipsec-manual.pdf"));
    assert_file_exists(&env.prefix.join("chipsec_tools/compression/linux/LzmaCompress"));
    assert_missing(&env.prefix.join("chipsec_tools/compression/win"));

    assert!(report.staged_sources > 0);
}

#[test]
fn test_windows_install_ships_helper_binaries() {
    let env = TestEnv::new();
    let ctx = env.context("windows");

    Installer::new(&ctx, &FakeCompiler::ok(), &FakeMake::new(MakeOutcome::Produce))
        .run(&options(&env, None), &env.build_lib)
        .unwrap();

    let lib = env.prefix.join("lib");
    assert_file_exists(&lib.join("chipsec/helper/win/win7_amd64/chipsec_hlpr.sys"));
    assert_missing(&lib.join("chipsec/helper/win/win7_x86/chipsec_hlpr.sys"));
    assert_file_exists(&env.prefix.join("chipsec_tools/compression/win/TianoCompress.exe"));
}

#[test]
fn test_install_record() {
    let env = TestEnv::new();
    let ctx = env.context("linux");

    let report = Installer::new(&ctx, &FakeCompiler::ok(), &FakeMake::new(MakeOutcome::Produce))
        .run(&options(&env, None), &env.build_lib)
        .unwrap();

    let json = fs::read_to_string(&report.record_path).unwrap();
    let record: InstallRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(record.name, "chipsec");
    assert_eq!(record.version, "1.2.5");
    assert_eq!(record.files, report.files);

    let paths: Vec<&str> = record.files.iter().map(|f| f.path.as_str()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
    assert!(paths.contains(&"lib/chipsec/helper/linux/chipsec.ko"));
    assert!(paths.contains(&"chipsec-manual.pdf"));

    let manual = record
        .files
        .iter()
        .find(|f| f.path == "chipsec-manual.pdf")
        .unwrap();
    assert_eq!(manual.size, "%PDF-1.4\n".len() as u64);
    assert_eq!(manual.sha256.len(), 64);
}

#[test]
fn test_install_missing_version_fails_before_build() {
    let env = TestEnv::new();
    fs::remove_file(env.source_root.join("chipsec/VERSION")).unwrap();
    let ctx = env.context("linux");
    let make = FakeMake::new(MakeOutcome::Produce);
    let compiler = FakeCompiler::ok();

    let err = Installer::new(&ctx, &compiler, &make)
        .run(&options(&env, None), &env.build_lib)
        .unwrap_err();

    assert!(matches!(err, InstallError::Package(PackageError::Configuration(_))));
    assert_eq!(make.call_count(), 0);
    assert!(compiler.built.borrow().is_empty());
    assert_missing(&env.build_lib);
}

#[test]
fn test_install_surfaces_tool_failure() {
    let env = TestEnv::new();
    let ctx = env.context("linux");

    let err = Installer::new(&ctx, &FakeCompiler::ok(), &FakeMake::new(MakeOutcome::Fail))
        .run(&options(&env, None), &env.build_lib)
        .unwrap_err();

    match err {
        InstallError::Build(build) => {
            assert!(matches!(build, BuildError::ExternalToolFailed { .. }));
            assert!(build.tool_output().is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!env.prefix.join(chipsec_build::layout::INSTALL_RECORD).exists());
}
