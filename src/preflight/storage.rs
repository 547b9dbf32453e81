//! Storage preflight check.

use super::CheckResult;
use std::path::Path;

/// Check that the storage directory is writable.
pub fn check(dir: &Path) -> CheckResult {
    let probe = dir.join(".write_test");
    let result = std::fs::create_dir_all(dir)
        .and_then(|_| std::fs::write(&probe, b"ok"))
        .and_then(|_| std::fs::remove_file(&probe));

    match result {
        Ok(()) => CheckResult::ok("Storage", &dir.display().to_string()),
        Err(e) => CheckResult::fail(
            "Storage",
            &format!("{} is not writable: {}", dir.display(), e),
            "Set storage_dir in config.toml to a writable directory",
        ),
    }
}
