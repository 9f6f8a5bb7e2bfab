//! Readers for the individual session environment variables.
//!
//! Each reader returns the parsed value, or applies the build-mode policy when
//! the variable is absent or malformed: debug builds log and fall back,
//! release builds fail.

use actix_web::cookie::SameSite;
use actix_web::cookie::time::Duration;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SessionConfigError};

const TOGGLE_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const TTL_EXPECTED: &str = "a positive number of minutes";

/// Apply the build-mode policy: `Ok(fallback)` with a warning in debug,
/// `Err(error)` in release.
pub(super) fn fallback_or_fail<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "session setting fell back to its development default");
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn invalid(name: &'static str, value: &str, expected: &'static str) -> SessionConfigError {
    SessionConfigError::InvalidEnv {
        name,
        value: value.to_owned(),
        expected,
    }
}

/// A required on/off variable.
pub(super) fn toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    debug_default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(raw) = env.string(name) else {
        return fallback_or_fail(mode, debug_default, SessionConfigError::MissingEnv { name });
    };
    match parse_toggle(&raw) {
        Some(flag) => Ok(flag),
        None => fallback_or_fail(mode, debug_default, invalid(name, &raw, TOGGLE_EXPECTED)),
    }
}

/// The `SameSite` policy. `None` is only accepted alongside `Secure`
/// cookies in release builds.
pub(super) fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(raw) = env.string(name) else {
        return fallback_or_fail(mode, default, SessionConfigError::MissingEnv { name });
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => fallback_or_fail(mode, SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => fallback_or_fail(mode, default, invalid(name, &raw, SAMESITE_EXPECTED)),
    }
}

/// Optional session lifetime in minutes. Absent means `default`.
pub(super) fn ttl_minutes<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: Duration,
) -> Result<Duration, SessionConfigError> {
    let Some(raw) = env.string(name) else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 => Ok(Duration::minutes(minutes)),
        _ => fallback_or_fail(mode, default, invalid(name, &raw, TTL_EXPECTED)),
    }
}

fn parse_toggle(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
