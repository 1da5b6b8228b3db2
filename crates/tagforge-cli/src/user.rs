//! Actor identity resolution for CLI commands.
//!
//! The resolution chain: `--user` flag > `TAGFORGE_USER` env > user config >
//! `USER` env. Mutating commands require an identity (it lands in tag
//! history); read-only commands work without one.

use std::env;

/// Errors from identity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserResolutionError {
    /// Human-readable description.
    pub message: String,
    /// Machine error code.
    pub code: &'static str,
}

impl std::fmt::Display for UserResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UserResolutionError {}

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
}

struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }
}

fn resolve_user_with(
    cli_flag: Option<&str>,
    config_user: Option<&str>,
    env: &dyn EnvReader,
) -> Option<String> {
    if let Some(user) = cli_flag {
        if !user.is_empty() {
            return Some(user.to_string());
        }
    }

    if let Some(val) = env.get("TAGFORGE_USER") {
        return Some(val);
    }

    if let Some(user) = config_user {
        if !user.is_empty() {
            return Some(user.to_string());
        }
    }

    env.get("USER")
}

/// Resolve the acting user, if any source provides one.
#[must_use]
pub fn resolve_user(cli_flag: Option<&str>, config_user: Option<&str>) -> Option<String> {
    resolve_user_with(cli_flag, config_user, &RealEnv)
}

/// Resolve the acting user or explain how to provide one.
///
/// # Errors
///
/// [`UserResolutionError`] when no source yields an identity.
pub fn require_user(
    cli_flag: Option<&str>,
    config_user: Option<&str>,
) -> Result<String, UserResolutionError> {
    resolve_user(cli_flag, config_user).ok_or(UserResolutionError {
        message: "No user identity found. History entries need an author.".to_string(),
        code: "missing_user",
    })
}
