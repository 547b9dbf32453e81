//! Release version bumping.
//!
//! The app version lives in a `.env` file as `APP_VERSION=major.minor.patch`.

use crate::Result;
use std::fs;
use std::path::Path;

const VERSION_KEY: &str = "APP_VERSION";
const DEFAULT_VERSION: &str = "1.0.0";

/// Increment the patch number of a `major.minor.patch` version.
pub fn increment_version(version: &str) -> Result<String> {
    let parts: Vec<u64> = version
        .trim()
        .split('.')
        .map(|n| n.parse::<u64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| crate::Error::InvalidVersion(version.to_string()))?;

    match parts.as_slice() {
        [major, minor, patch] => Ok(format!("{}.{}.{}", major, minor, patch + 1)),
        _ => Err(crate::Error::InvalidVersion(version.to_string())),
    }
}

/// Rewrite env file content with the next version.
///
/// Returns the new content and the new version. Other lines are kept as-is;
/// the version line is appended when missing.
pub fn bump_env_content(content: &str) -> Result<(String, String)> {
    let prefix = format!("{}=", VERSION_KEY);

    let current = content
        .lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .map(|v| v.trim().trim_matches('"'))
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_VERSION);
    let next = increment_version(current)?;

    let mut lines: Vec<String> = content
        .split('\n')
        .map(|line| {
            if line.starts_with(&prefix) {
                format!("{}{}", prefix, next)
            } else {
                line.to_string()
            }
        })
        .collect();

    if !lines.iter().any(|line| line.starts_with(&prefix)) {
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.push(format!("{}{}", prefix, next));
    }

    Ok((lines.join("\n"), next))
}

/// Bump the version stored in an env file. A missing file is created.
pub fn bump_env_file(path: &Path) -> Result<String> {
    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let (updated, next) = bump_env_content(&content)?;
    fs::write(path, updated)?;

    tracing::info!("Version bumped to {}", next);
    Ok(next)
}
