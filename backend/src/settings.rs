//! Application settings loaded via OrthoConfig.
//!
//! Values come from `OPSDESK_*` environment variables, matching CLI flags,
//! or a configuration file, with the defaults below.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Duration as TtlDuration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_MIN_IDLE: u32 = 2;
const DEFAULT_POOL_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INVITATION_TTL_HOURS: i64 = 168;
const DEFAULT_SESSION_COOKIE_SECURE: bool = true;
const DEFAULT_RUN_MIGRATIONS: bool = true;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("invitation TTL must be positive, got {0} hours")]
    InvitationTtl(i64),
}

/// Runtime configuration for the `opsdesk` server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "OPSDESK")]
pub struct AppSettings {
    /// PostgreSQL connection URL. Release builds refuse to start without it.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    pub pool_max_size: Option<u32>,
    pub pool_min_idle: Option<u32>,
    pub pool_connection_timeout_secs: Option<u64>,
    /// File holding the session signing key (at least 64 bytes).
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`. Defaults to `true`.
    pub session_cookie_secure: Option<bool>,
    /// `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Permit a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    pub invitation_ttl_hours: Option<i64>,
    /// Apply pending migrations at startup. Defaults to `true`.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Whether the session cookie carries the `Secure` attribute.
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
            .unwrap_or(DEFAULT_SESSION_COOKIE_SECURE)
    }

    /// Whether startup applies pending migrations.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(DEFAULT_RUN_MIGRATIONS)
    }

    /// Pool configuration for `database_url`.
    pub fn pool_config(&self, database_url: &str) -> PoolConfig {
        PoolConfig::new(database_url)
            .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
            .with_min_idle(Some(self.pool_min_idle.unwrap_or(DEFAULT_POOL_MIN_IDLE)))
            .with_connection_timeout(Duration::from_secs(
                self.pool_connection_timeout_secs
                    .unwrap_or(DEFAULT_POOL_CONNECTION_TIMEOUT_SECS),
            ))
    }

    /// How long a new invitation stays acceptable.
    pub fn invitation_ttl(&self) -> Result<TtlDuration, SettingsError> {
        let hours = self
            .invitation_ttl_hours
            .unwrap_or(DEFAULT_INVITATION_TTL_HOURS);
        if hours <= 0 {
            return Err(SettingsError::InvitationTtl(hours));
        }
        Ok(TtlDuration::hours(hours))
    }
}
