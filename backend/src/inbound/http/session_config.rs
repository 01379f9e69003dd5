//! Session cookie settings and their validation.
//!
//! Raw toggles arrive through the server settings layer. Debug builds fall
//! back to permissive defaults with a warning; release builds reject missing
//! or malformed values.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

/// Key file read when none is configured.
pub const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key file length accepted by release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;

const COOKIE_SECURE: &str = "session_cookie_secure";
const SAME_SITE: &str = "session_same_site";
const ALLOW_EPHEMERAL: &str = "session_allow_ephemeral";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAME_SITE_EXPECTED: &str = "Strict|Lax|None";
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Unvalidated session toggles as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToggles {
    pub key_file: Option<PathBuf>,
    pub cookie_secure: Option<String>,
    pub same_site: Option<String>,
    pub allow_ephemeral: Option<String>,
}

/// Validated session settings.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("session_same_site=None requires session_cookie_secure=1")]
    InsecureSameSiteNone,
    #[error("session_allow_ephemeral must be 0 in release builds")]
    EphemeralNotAllowed,
}

impl SessionToggles {
    /// Validate the toggles and load the session key.
    ///
    /// ```rust
    /// use noteshare::inbound::http::session_config::{BuildMode, SessionToggles};
    ///
    /// let settings = SessionToggles::default()
    ///     .resolve(BuildMode::Debug)
    ///     .expect("debug builds tolerate missing toggles");
    /// assert!(settings.cookie_secure);
    /// ```
    pub fn resolve(&self, mode: BuildMode) -> Result<SessionSettings, SessionConfigError> {
        let cookie_secure = resolve_bool(COOKIE_SECURE, self.cookie_secure.as_deref(), true, mode)?;
        let same_site = self.resolve_same_site(mode, cookie_secure)?;
        let allow_ephemeral =
            resolve_bool(ALLOW_EPHEMERAL, self.allow_ephemeral.as_deref(), false, mode)?;
        if allow_ephemeral && !mode.is_debug() {
            return Err(SessionConfigError::EphemeralNotAllowed);
        }
        let path = self
            .key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));
        let key = load_key(&path, mode, allow_ephemeral)?;
        Ok(SessionSettings {
            key,
            cookie_secure,
            same_site,
        })
    }

    fn resolve_same_site(
        &self,
        mode: BuildMode,
        cookie_secure: bool,
    ) -> Result<SameSite, SessionConfigError> {
        let fallback = if mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        };
        let Some(raw) = self.same_site.as_deref() else {
            return lenient(mode, fallback, SessionConfigError::Missing { name: SAME_SITE });
        };
        match raw.to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" if cookie_secure => Ok(SameSite::None),
            "none" if mode.is_debug() => {
                warn!("SameSite=None without a secure cookie; browsers may drop it");
                Ok(SameSite::None)
            }
            "none" => Err(SessionConfigError::InsecureSameSiteNone),
            _ => lenient(
                mode,
                fallback,
                SessionConfigError::Invalid {
                    name: SAME_SITE,
                    value: raw.to_owned(),
                    expected: SAME_SITE_EXPECTED,
                },
            ),
        }
    }
}

/// In debug builds log `error` and use `fallback`; in release builds fail.
fn lenient<T: std::fmt::Debug>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, ?fallback, "using default session setting");
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn resolve_bool(
    name: &'static str,
    raw: Option<&str>,
    fallback: bool,
    mode: BuildMode,
) -> Result<bool, SessionConfigError> {
    let Some(raw) = raw else {
        return lenient(mode, fallback, SessionConfigError::Missing { name });
    };
    match parse_bool(raw) {
        Some(flag) => Ok(flag),
        None => lenient(
            mode,
            fallback,
            SessionConfigError::Invalid {
                name,
                value: raw.to_owned(),
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn load_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Truncated SHA-256 of the signing key, safe to log.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
