//! Release automation commands.

use crate::utils::version;
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// Bump the patch version in an env file.
pub async fn bump_version(env_file: &Path) -> Result<()> {
    let next = version::bump_env_file(env_file)?;
    println!("{} {}", "Version bumped to".green(), next.bold());
    Ok(())
}
