//! Source-tree input checks.

use std::path::Path;

use crate::layout;
use crate::platform::PlatformCapabilities;

use super::types::CheckResult;

pub fn check_sources(source_root: &Path, caps: &PlatformCapabilities) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for (name, rel) in [("Version file", layout::VERSION_FILE), ("Readme", layout::README_FILE)] {
        let path = source_root.join(rel);
        match std::fs::read_to_string(&path) {
            Ok(content) if !content.trim().is_empty() => results.push(CheckResult::pass(name)),
            Ok(_) => results.push(CheckResult::fail(name, &format!("{} is empty", rel))),
            Err(e) => results.push(CheckResult::fail(name, &format!("{}: {}", rel, e))),
        }
    }

    if !source_root.join(layout::MANUAL_FILE).is_file() {
        results.push(CheckResult::warn(
            "Manual",
            &format!("{} not found - install will fail when copying data files", layout::MANUAL_FILE),
        ));
    } else {
        results.push(CheckResult::pass("Manual"));
    }

    if caps.supports_driver_build() {
        let makefile = source_root.join(layout::DRIVER_SOURCE_DIR).join("Makefile");
        if makefile.is_file() {
            results.push(CheckResult::pass("Driver sources"));
        } else {
            results.push(CheckResult::fail(
                "Driver sources",
                &format!("{}/Makefile not found (or use --skip-driver)", layout::DRIVER_SOURCE_DIR),
            ));
        }
    }

    if caps.has_platform_extension() {
        let src = source_root.join(layout::LINUX_EXTENSION_SOURCE);
        if src.is_file() {
            results.push(CheckResult::pass("Extension source"));
        } else {
            results.push(CheckResult::fail(
                "Extension source",
                &format!("{} not found", layout::LINUX_EXTENSION_SOURCE),
            ));
        }
    }

    match caps.platform_payload_root() {
        Some(payload) if source_root.join(payload).is_dir() => {
            results.push(CheckResult::pass_with("Platform payload", &payload.display().to_string()));
        }
        Some(payload) => results.push(CheckResult::fail(
            "Platform payload",
            &format!("{} not found - manifest composition will fail", payload.display()),
        )),
        None => results.push(CheckResult::skip("Platform payload", "none for this platform")),
    }

    results
}
