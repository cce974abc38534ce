//! Session cookie configuration and validation.
//!
//! Turns the session toggles from [`crate::settings::AppSettings`] into a
//! signing key and cookie policy, applying stricter rules to release builds.

use actix_web::cookie::{Key, SameSite};
use std::path::{Path, PathBuf};
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings.
    Debug,
    /// Release builds require a real key and a coherent cookie policy.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use opsdesk::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles as configured.
#[derive(Debug, Clone, Copy)]
pub struct SessionInputs<'a> {
    pub key_file: Option<&'a Path>,
    pub cookie_secure: bool,
    pub same_site: Option<&'a str>,
    pub allow_ephemeral: bool,
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
    #[error("invalid session same-site policy '{value}'; expected {expected}")]
    InvalidSameSite {
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
    #[error("same-site None requires secure session cookies")]
    InsecureSameSiteNone,
    #[error("ephemeral session keys are not allowed in release builds")]
    EphemeralNotAllowed,
}

/// Validate session toggles for `mode`.
///
/// # Examples
///
/// ```rust
/// use opsdesk::inbound::http::session_config::{BuildMode, SessionInputs, session_settings};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("opsdesk_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let settings = session_settings(
///     &SessionInputs {
///         key_file: Some(&key_path),
///         cookie_secure: true,
///         same_site: Some("Strict"),
///         allow_ephemeral: false,
///     },
///     BuildMode::Release,
/// )?;
/// assert!(settings.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    inputs: &SessionInputs<'_>,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if inputs.allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let same_site = same_site(inputs.same_site, mode, inputs.cookie_secure)?;
    let key = session_key(inputs.key_file, mode, inputs.allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure: inputs.cookie_secure,
        same_site,
    })
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = value else {
        return Ok(if mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            if !cookie_secure {
                if mode.is_debug() {
                    warn!("same-site None without secure cookies; browsers may reject them");
                } else {
                    return Err(SessionConfigError::InsecureSameSiteNone);
                }
            }
            Ok(SameSite::None)
        }
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn session_key(
    key_file: Option<&Path>,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = key_file.map_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH), Path::to_path_buf);

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SessionConfigError::KeyRead {
                    path,
                    source: error,
                })
            }
        }
    }
}
