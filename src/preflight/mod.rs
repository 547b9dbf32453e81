//! Preflight checks module.

mod catalog;
mod identity;
mod storage;

use crate::models::config::Config;
use colored::Colorize;
use std::fmt;

/// Outcome of one preflight check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed(String),
    Failed { reason: String, hint: String },
}

/// A named preflight check and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
}

impl CheckResult {
    pub fn ok(name: &'static str, detail: &str) -> Self {
        Self {
            name,
            status: CheckStatus::Passed(detail.to_string()),
        }
    }

    pub fn fail(name: &'static str, reason: &str, hint: &str) -> Self {
        Self {
            name,
            status: CheckStatus::Failed {
                reason: reason.to_string(),
                hint: hint.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, CheckStatus::Passed(_))
    }
}

/// One line per check; failures add an indented hint line.
impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            CheckStatus::Passed(detail) => {
                write!(f, "{} {}: {}", "[OK]".green(), self.name.bold(), detail)
            }
            CheckStatus::Failed { reason, hint } => {
                writeln!(f, "{} {}: {}", "[FAIL]".red(), self.name.bold(), reason)?;
                write!(f, "  {} {}", "->".yellow(), hint)
            }
        }
    }
}

/// Run all preflight checks.
pub async fn run_preflight_checks(config: &Config) -> Vec<CheckResult> {
    vec![
        catalog::check(&config.catalog).await,
        identity::check(&config.identity),
        storage::check(&config.storage_dir),
    ]
}

/// Print preflight check results.
pub fn print_results(results: &[CheckResult]) {
    for result in results {
        println!("{}", result);
    }
}

/// Check if all preflight checks passed.
pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(CheckResult::is_ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_passed() {
        let ok = vec![CheckResult::ok("a", "fine")];
        assert!(all_passed(&ok));

        let mixed = vec![
            CheckResult::ok("a", "fine"),
            CheckResult::fail("b", "broken", "fix it"),
        ];
        assert!(!all_passed(&mixed));
    }

    #[test]
    fn test_display_includes_hint_only_on_failure() {
        colored::control::set_override(false);

        let ok = CheckResult::ok("Storage", "/tmp/store");
        assert_eq!(ok.to_string(), "[OK] Storage: /tmp/store");

        let failed = CheckResult::fail("Identity", "API key not configured", "Set FIREBASE_API_KEY");
        assert_eq!(
            failed.to_string(),
            "[FAIL] Identity: API key not configured\n  -> Set FIREBASE_API_KEY"
        );
    }
}
