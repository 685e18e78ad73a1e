// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use anyhow::{bail, Context};
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tracing::{info, warn};

use classroom_server::api::router;
use classroom_server::auth::{AuthConfig, JwksManager};
use classroom_server::config::AppConfig;
use classroom_server::identity::{ClerkClient, IdentityDirectory, InMemoryDirectory};
use classroom_server::logging::init_tracing;
use classroom_server::state::AppState;
use classroom_server::storage::Database;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);

    let auth_config = build_auth_config(&config)?;
    let identity = build_identity(&config)?;

    let db = Database::open(&config.database_path).with_context(|| {
        format!("failed to open database at {}", config.database_path.display())
    })?;
    info!(path = %config.database_path.display(), "Database ready");

    let state = AppState::new(db, identity).with_auth_config(auth_config);
    let app = router(state);
    let addr = config.bind_addr()?;

    let handle = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    match &config.tls {
        Some(tls) => {
            // Must happen before any TLS config is built.
            if rustls::crypto::ring::default_provider()
                .install_default()
                .is_err()
            {
                warn!("rustls crypto provider was already installed");
            }
            let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .context("failed to load TLS certificate or key")?;

            info!("Classroom server listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        }
        None => {
            info!("Classroom server listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")?;
        }
    }

    info!("Server stopped");
    Ok(())
}

fn build_auth_config(config: &AppConfig) -> anyhow::Result<AuthConfig> {
    let clerk = &config.clerk;
    match &clerk.jwks_url {
        Some(jwks_url) => {
            let jwks =
                JwksManager::new(jwks_url.clone()).context("failed to create JWKS client")?;
            info!(jwks_url = %jwks_url, "JWT verification enabled");
            Ok(AuthConfig::production(jwks)
                .with_issuer(clerk.issuer.clone())
                .with_audience(clerk.audience.clone()))
        }
        None if cfg!(feature = "dev") => {
            warn!("CLERK_JWKS_URL not set: JWT signatures are NOT verified (dev build)");
            Ok(AuthConfig::development())
        }
        None => bail!("CLERK_JWKS_URL must be set (build with --features dev to skip verification)"),
    }
}

fn build_identity(config: &AppConfig) -> anyhow::Result<IdentityDirectory> {
    let clerk = &config.clerk;
    match &clerk.secret_key {
        Some(secret_key) => {
            let client = ClerkClient::new(&clerk.api_url, secret_key)
                .context("failed to create Clerk client")?;
            info!(api_url = %clerk.api_url, "Using Clerk identity directory");
            Ok(IdentityDirectory::Clerk(client))
        }
        None => {
            warn!("CLERK_SECRET_KEY not set: teacher profiles are kept in memory");
            Ok(IdentityDirectory::InMemory(InMemoryDirectory::new()))
        }
    }
}

async fn shutdown_on_ctrl_c(handle: Handle<std::net::SocketAddr>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
