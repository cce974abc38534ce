//! HTTP server configuration object and helpers.

use actix_web::cookie::{Key, SameSite};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use chrono::Duration;
use opsdesk::outbound::persistence::DbPool;
use std::net::SocketAddr;

const DEFAULT_INVITATION_TTL_HOURS: i64 = 168;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) invitation_ttl: Duration,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            invitation_ttl: Duration::hours(DEFAULT_INVITATION_TTL_HOURS),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, every port is served by its Diesel-backed service;
    /// otherwise the server answers from fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override how long newly issued invitations remain acceptable.
    #[must_use]
    pub fn with_invitation_ttl(mut self, ttl: Duration) -> Self {
        self.invitation_ttl = ttl;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }

    #[cfg(feature = "metrics")]
    /// Return the configured Prometheus middleware, if any.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by metrics bootstrap tests")
    )]
    #[must_use]
    pub fn metrics(&self) -> Option<&PrometheusMetrics> {
        self.prometheus.as_ref()
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by server readiness tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
