//! Host tool availability checks.

use crate::config::Config;
use crate::platform::PlatformCapabilities;
use crate::process::{self, Cmd};

use super::types::CheckResult;

/// Check the compiler and driver build tool, where the platform needs them.
pub fn check_host_tools(config: &Config, caps: &PlatformCapabilities) -> Vec<CheckResult> {
    let mut results = Vec::new();

    if caps.has_platform_extension() {
        results.push(check_tool_exists(
            &config.cc,
            "Required to compile the helper extension (set CC to override)",
        ));
    } else {
        results.push(CheckResult::skip("C compiler", "no compiled extension on this platform"));
    }

    if caps.supports_driver_build() {
        results.push(check_tool_exists(
            &config.make,
            "Required to build the kernel driver (set MAKE to override, or use --skip-driver)",
        ));
    } else {
        results.push(CheckResult::skip("make", "no kernel driver on this platform"));
    }

    results
}

fn check_tool_exists(tool: &str, purpose: &str) -> CheckResult {
    if !process::exists(tool) {
        return CheckResult::fail(tool, &format!("Not found in PATH. {}", purpose));
    }
    match tool_version(tool) {
        Some(version) => CheckResult::pass_with(tool, &version),
        None => CheckResult::pass(tool),
    }
}

/// First line of `<tool> --version`. Tools that reject the flag report nothing.
fn tool_version(tool: &str) -> Option<String> {
    let result = Cmd::new(tool).arg("--version").allow_fail().run().ok()?;
    if !result.success() {
        return None;
    }
    result
        .stdout_trimmed()
        .lines()
        .next()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preflight::CheckStatus;
    use std::collections::HashMap;
    use std::path::Path;

    fn config(make: &str, platform: &str) -> Config {
        let vars: HashMap<String, String> = [("MAKE", make), ("CC", "sh"), ("CHIPSEC_PLATFORM", platform)]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(Path::new("/"), &vars)
    }

    #[test]
    fn test_missing_make_fails_on_linux() {
        let config = config("nonexistent_make_12345", "linux");
        let results = check_host_tools(&config, &config.capabilities());
        assert_eq!(results[0].status, CheckStatus::Pass);
        assert_eq!(results[1].status, CheckStatus::Fail);
    }

    #[test]
    fn test_version_line_reported_when_available() {
        // echo prints either its version or the flag itself
        assert!(tool_version("echo").is_some());
        assert_eq!(tool_version("nonexistent_program_12345"), None);
        assert_eq!(tool_version("false"), None);
        let result = check_tool_exists("false", "x");
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.details.is_none());
    }

    #[test]
    fn test_tools_skipped_elsewhere() {
        let config = config("nonexistent_make_12345", "windows");
        let results = check_host_tools(&config, &config.capabilities());
        assert!(results.iter().all(|r| r.status == CheckStatus::Skip));
    }
}
