use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use url::Url;

/// Server settings, read from flags or the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "classmind-server")]
#[command(about = "ClassMind backend API")]
pub struct Settings {
    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Url,

    /// Supabase anon key
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub supabase_key: String,

    /// Supabase service role key, used for every table call
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub supabase_service_role_key: String,

    /// Clerk JWKS endpoint
    #[arg(long, env = "CLERK_JWKS_URL")]
    pub clerk_jwks_url: Url,

    /// Expected token issuer; unchecked when unset
    #[arg(long, env = "CLERK_ISSUER")]
    pub clerk_issuer: Option<String>,

    /// Comma separated list of CORS origins
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        default_value = "http://localhost:3000,http://127.0.0.1:3000"
    )]
    pub allowed_origins: String,

    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:8000")]
    pub bind_address: SocketAddr,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// How long a fetched JWK set is trusted
    #[arg(long, env = "JWKS_CACHE_TTL_SECS", default_value_t = 12 * 3600)]
    pub jwks_cache_ttl_secs: u64,
}

impl Settings {
    pub fn cors_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }
}
