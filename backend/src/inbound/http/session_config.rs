//! Cookie session settings loaded from `SESSION_*` variables.
//!
//! A debug build runs with whatever it can get and says so in the log. A
//! release build refuses to start unless the key file and every toggle are
//! present and sane.

pub mod fingerprint;
mod parsing;

use std::io;
use std::path::{Path, PathBuf};

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::{info, warn};
use zeroize::Zeroizing;

use self::fingerprint::key_fingerprint;
use self::parsing::{same_site, toggle, ttl_minutes};

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const TTL_MINUTES_ENV: &str = "SESSION_TTL_MINUTES";

const SESSION_KEY_DEFAULT_PATH: &str = "instance/session_key";
/// Release builds reject key files shorter than this.
const SESSION_KEY_MIN_LEN: usize = 64;
const SESSION_TTL_DEFAULT_MINUTES: i64 = 120;

/// Whether configuration problems are tolerated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or malformed values fall back with a warning.
    Debug,
    /// Missing or malformed values abort startup.
    Release,
}

impl BuildMode {
    /// `Debug` when compiled with debug assertions.
    ///
    /// ```rust
    /// use blog::inbound::http::session_config::BuildMode;
    ///
    /// let expected = if cfg!(debug_assertions) { BuildMode::Debug } else { BuildMode::Release };
    /// assert_eq!(BuildMode::from_debug_assertions(), expected);
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        self == Self::Debug
    }
}

/// Everything the session middleware needs.
#[derive(Clone)]
pub struct SessionSettings {
    /// Key for the private (encrypted) session cookie.
    pub key: Key,
    /// Send the cookie over HTTPS only.
    pub cookie_secure: bool,
    /// `SameSite` attribute of the cookie.
    pub same_site: SameSite,
    /// How long a login lasts.
    pub ttl: Duration,
}

impl SessionSettings {
    /// Log the effective configuration. The key appears only as its
    /// fingerprint.
    pub fn log_summary(&self) {
        info!(
            key_fingerprint = %key_fingerprint(&self.key),
            cookie_secure = self.cookie_secure,
            same_site = ?self.same_site,
            ttl_minutes = self.ttl.whole_minutes(),
            "session configuration loaded"
        );
    }
}

/// Why the session configuration was rejected.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A variable required in release builds is unset.
    #[error("{name} is not set")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is set to something unparseable.
    #[error("{name} has unusable value {value:?} (expected {expected})")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Value as found.
        value: String,
        /// Accepted spellings.
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("cannot read session key file {path}")]
    KeyRead {
        /// Key file location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The key file is too short to derive a key from.
    #[error("session key file {path} holds {length} bytes; at least {min_len} are required")]
    KeyTooShort {
        /// Key file location.
        path: PathBuf,
        /// Bytes found.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
    /// `SameSite=None` without `Secure`.
    #[error("SESSION_SAMESITE=None is only allowed with SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Temporary keys were requested in a release build.
    #[error("SESSION_ALLOW_EPHEMERAL is not honoured by release builds")]
    EphemeralNotAllowed,
}

/// Read and validate the session settings.
///
/// `SESSION_KEY_FILE` defaults to `instance/session_key` and
/// `SESSION_TTL_MINUTES` to two hours. The remaining toggles are required in
/// release builds.
///
/// ```rust
/// use blog::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_file = tempfile::NamedTempFile::new()?;
/// std::fs::write(key_file.path(), [0x5a_u8; 64])?;
/// let key_file = key_file.path().display().to_string();
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| {
///     let value = match name {
///         "SESSION_KEY_FILE" => key_file.as_str(),
///         "SESSION_COOKIE_SECURE" => "yes",
///         "SESSION_SAMESITE" => "lax",
///         "SESSION_ALLOW_EPHEMERAL" => "no",
///         _ => return None,
///     };
///     Some(value.to_owned())
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release)?;
/// assert_eq!(settings.ttl.whole_minutes(), 120);
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = toggle(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site(env, mode, SAMESITE_ENV, cookie_secure)?;
    let allow_ephemeral = toggle(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let ttl = ttl_minutes(
        env,
        mode,
        TTL_MINUTES_ENV,
        Duration::minutes(SESSION_TTL_DEFAULT_MINUTES),
    )?;
    let key = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl,
    })
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = env
        .string(KEY_FILE_ENV)
        .map_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH), PathBuf::from);

    match std::fs::read(&path).map(Zeroizing::new) {
        Ok(material) => key_from_material(&path, &material, mode),
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "session key unreadable; sessions will not survive a restart"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn key_from_material(
    path: &Path,
    material: &[u8],
    mode: BuildMode,
) -> Result<Key, SessionConfigError> {
    if material.len() >= SESSION_KEY_MIN_LEN {
        return Ok(Key::derive_from(material));
    }
    let error = SessionConfigError::KeyTooShort {
        path: path.to_path_buf(),
        length: material.len(),
        min_len: SESSION_KEY_MIN_LEN,
    };
    if !mode.is_debug() {
        return Err(error);
    }
    warn!(%error, "using a temporary session key instead");
    Ok(Key::generate())
}
