//! Identity service preflight check.

use super::CheckResult;
use crate::models::config::FirebaseConfig;

/// Check that the identity service is configured.
pub fn check(config: &FirebaseConfig) -> CheckResult {
    match (&config.api_key, &config.database_url) {
        (Some(_), Some(db)) => CheckResult::ok("Identity", &format!("configured (database: {})", db)),
        (Some(_), None) => CheckResult::fail(
            "Identity",
            "no database URL",
            "Set FIREBASE_DATABASE_URL to enable chat",
        ),
        (None, _) => CheckResult::fail(
            "Identity",
            "API key not configured",
            "Set FIREBASE_API_KEY environment variable",
        ),
    }
}
