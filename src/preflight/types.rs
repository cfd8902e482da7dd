//! Preflight check types and report.

use std::fmt;

/// Result of a single preflight check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Build will fail.
    Fail,
    Warn,
    /// Not applicable to this platform.
    Skip,
}

impl CheckStatus {
    fn label(self) -> (&'static str, &'static str) {
        match self {
            Self::Pass => ("✓", "PASS"),
            Self::Fail => ("✗", "FAIL"),
            Self::Warn => ("⚠", "WARN"),
            Self::Skip => ("○", "SKIP"),
        }
    }
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, details: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            status,
            details: details.map(str::to_string),
        }
    }

    pub fn pass(name: &str) -> Self {
        Self::new(name, CheckStatus::Pass, None)
    }

    pub fn pass_with(name: &str, details: &str) -> Self {
        Self::new(name, CheckStatus::Pass, Some(details))
    }

    pub fn fail(name: &str, details: &str) -> Self {
        Self::new(name, CheckStatus::Fail, Some(details))
    }

    pub fn warn(name: &str, details: &str) -> Self {
        Self::new(name, CheckStatus::Warn, Some(details))
    }

    pub fn skip(name: &str, details: &str) -> Self {
        Self::new(name, CheckStatus::Skip, Some(details))
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (icon, label) = self.status.label();
        write!(f, "{} [{}] {}", icon, label, self.name)?;
        if let Some(details) = &self.details {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

/// Results of all preflight checks.
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// Returns true if no check failed.
    pub fn all_passed(&self) -> bool {
        self.fail_count() == 0
    }

    pub fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn fail_count(&self) -> usize {
        self.count(CheckStatus::Fail)
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            println!("  {}", check);
        }

        println!();
        let applicable = self.checks.len() - self.count(CheckStatus::Skip);
        println!("Summary: {}/{} passed", self.count(CheckStatus::Pass), applicable);
        let failed = self.fail_count();
        if failed > 0 {
            println!("         {} FAILED - build will not succeed", failed);
        }
        let warned = self.count(CheckStatus::Warn);
        if warned > 0 {
            println!("         {} warnings", warned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_details() {
        let check = CheckResult::fail("make", "Not found in PATH");
        assert_eq!(check.to_string(), "✗ [FAIL] make: Not found in PATH");
        assert_eq!(CheckResult::pass("cc").to_string(), "✓ [PASS] cc");
    }

    #[test]
    fn test_report_counts() {
        let report = PreflightReport {
            checks: vec![
                CheckResult::pass("a"),
                CheckResult::warn("b", "w"),
                CheckResult::skip("c", "n/a"),
            ],
        };
        assert!(report.all_passed());
        assert_eq!(report.count(CheckStatus::Warn), 1);

        let report = PreflightReport {
            checks: vec![CheckResult::fail("a", "x")],
        };
        assert!(!report.all_passed());
        assert_eq!(report.fail_count(), 1);
    }
}
