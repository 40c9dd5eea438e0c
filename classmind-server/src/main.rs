use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use classmind_auth::authenticator::Authenticator;
use classmind_server::{
    app,
    config::Settings,
    cors_layer, logging,
    routines::SupabaseRoutineStore,
    supabase::SupabaseClient,
    AppState,
};
use log::{error, info};
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    logging::init(&settings.log_level);

    let mut auth_builder = Authenticator::builder()
        .jwks_url(settings.clerk_jwks_url.as_str())
        .jwks_cache_ttl(settings.jwks_cache_ttl());
    if let Some(issuer) = &settings.clerk_issuer {
        auth_builder = auth_builder.issuer(issuer);
    }
    let authenticator = auth_builder
        .build()
        .context("Failed to configure token verification")?;

    let supabase = SupabaseClient::builder()
        .build(&settings.supabase_url, &settings.supabase_service_role_key)
        .context("Failed to configure Supabase client")?;
    let state = AppState {
        routines: Arc::new(SupabaseRoutineStore::new(supabase)),
    };

    let origins = settings.cors_origins();
    info!("CORS origins: {:?}", origins);
    let app = app(state, &authenticator, cors_layer(&origins));

    let listener = tokio::net::TcpListener::bind(settings.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_address))?;
    info!("ClassMind backend listening on {}", settings.bind_address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
