//! Backend entry-point: loads settings, prepares persistence and serves the
//! REST API.

mod server;

use std::io;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use opsdesk::inbound::http::health::HealthState;
use opsdesk::inbound::http::session_config::{BuildMode, SessionInputs, session_settings};
use opsdesk::outbound::persistence::{DbPool, run_pending_migrations};
use opsdesk::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os()).map_err(io::Error::other)?;
    let mode = BuildMode::from_debug_assertions();
    let config = build_server_config(&settings, mode)?;
    let config = attach_database(config, &settings, mode).await?;
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(make_metrics));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!("opsdesk listening");
    server.await
}

fn build_server_config(settings: &AppSettings, mode: BuildMode) -> io::Result<ServerConfig> {
    let session = session_settings(
        &SessionInputs {
            key_file: settings.session_key_file.as_deref(),
            cookie_secure: settings.session_cookie_secure(),
            same_site: settings.session_same_site.as_deref(),
            allow_ephemeral: settings.session_allow_ephemeral,
        },
        mode,
    )
    .map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let invitation_ttl = settings.invitation_ttl().map_err(io::Error::other)?;

    Ok(ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_invitation_ttl(invitation_ttl))
}

/// Run migrations and open the pool when a database is configured.
///
/// Debug builds without `OPSDESK_DATABASE_URL` serve fixture data; release
/// builds refuse to start.
async fn attach_database(
    config: ServerConfig,
    settings: &AppSettings,
    mode: BuildMode,
) -> io::Result<ServerConfig> {
    let Some(database_url) = settings.database_url.clone() else {
        if mode.is_debug() {
            warn!("no database configured; serving fixture data (dev only)");
            return Ok(config);
        }
        return Err(io::Error::other(
            "OPSDESK_DATABASE_URL must be set in release builds",
        ));
    };

    if settings.run_migrations() {
        run_pending_migrations(database_url.clone())
            .await
            .map_err(io::Error::other)?;
    }
    let pool = DbPool::new(settings.pool_config(&database_url))
        .await
        .map_err(io::Error::other)?;
    Ok(config.with_db_pool(pool))
}

/// Build the Prometheus registry and `/metrics` endpoint.
#[cfg(feature = "metrics")]
fn make_metrics() -> Result<PrometheusMetrics, Box<dyn std::error::Error + Send + Sync>> {
    PrometheusMetricsBuilder::new("opsdesk")
        .registry(prometheus::Registry::new())
        .endpoint("/metrics")
        .build()
}

/// Run `build`, logging and discarding the error so the server still starts
/// without metrics.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "Prometheus metrics disabled");
            None
        }
    }
}
